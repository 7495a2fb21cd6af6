//! Plain-text rendering of a [`Dashboard`].

use std::fmt;

use crate::processor::{
    Value,
    aggregate::{GroupedAggregate, TopGroup},
    query_builder::Dashboard,
};

const UNDEFINED: &str = "n/a";

/// Text layout of a dashboard; format it with `{}` or call [`render_text`].
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    pub dashboard: &'a Dashboard,
    /// Prefix for money amounts
    pub currency: &'a str,
}

pub fn render_text(dashboard: &Dashboard, currency: &str) -> String {
    TextReport {
        dashboard,
        currency,
    }
    .to_string()
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashboard = self.dashboard;
        let kpis = &dashboard.kpis;
        let currency = self.currency;

        writeln!(f, "Key Metrics ({} posts)", kpis.record_count)?;
        writeln!(f, "  Total Engagement     {:.0}", kpis.total_engagement)?;
        writeln!(
            f,
            "  Avg Engagement Rate  {}",
            fmt_opt(kpis.avg_engagement_rate, |v| format!("{v:.2}%"))
        )?;
        writeln!(f, "  Ad Spend             {currency}{:.2}", kpis.total_ad_spend)?;
        writeln!(f, "  Revenue Generated    {currency}{:.2}", kpis.total_revenue)?;
        writeln!(
            f,
            "  Avg ROI              {}",
            fmt_opt(kpis.avg_roi, |v| format!("{v:.2}"))
        )?;

        section(f, "Engagement rate by platform", &dashboard.platform_engagement)?;
        line(f, "Best platform", dashboard.best_platform.as_ref(), |k| {
            k.to_string()
        })?;

        section(f, "Engagement by content type", &dashboard.content_engagement)?;
        section(f, "Campaign revenue and ROI", &dashboard.campaign_performance)?;

        section(f, "Engagement by posting hour", &dashboard.hourly_engagement)?;
        line(f, "Best time to post", dashboard.best_hour.as_ref(), |k| match k {
            Value::Int(h) => format!("{h:02}:00"),
            other => other.to_string(),
        })
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str, table: &GroupedAggregate) -> fmt::Result {
    writeln!(f, "\n{title}")?;
    if table.is_empty() {
        return writeln!(f, "  (no data)");
    }

    let header: Vec<String> = table.measures().iter().map(ToString::to_string).collect();
    writeln!(f, "  {:<20} {}", table.dimension().name(), header.join("  "))?;
    for (key, values) in table.iter() {
        let cells: Vec<String> = values.iter().map(|v| format!("{v:>12.2}")).collect();
        writeln!(f, "  {:<20} {}", key.to_string(), cells.join("  "))?;
    }
    Ok(())
}

fn line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    top: Option<&TopGroup>,
    key: impl Fn(&Value) -> String,
) -> fmt::Result {
    match top {
        Some(top) => writeln!(f, "  {label}: {} ({:.2})", key(&top.key), top.value),
        None => writeln!(f, "  {label}: {UNDEFINED}"),
    }
}

fn fmt_opt(value: Option<f64>, f: impl Fn(f64) -> String) -> String {
    value.map(f).unwrap_or_else(|| UNDEFINED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{dataset::Dataset, record::RawRecord, selection::FilterSelection};

    fn dataset() -> Dataset {
        Dataset::from_records([RawRecord {
            platform: "Instagram".into(),
            content_type: "reel".into(),
            year: 2024,
            post_hour: 7,
            campaign_name: Some("Diwali".into()),
            engagement: 1200.0,
            engagement_rate: 4.5,
            ad_spend: 300.0,
            roi: 0.5,
            date: None,
        }])
    }

    #[test]
    fn test_render_full_dashboard() {
        let data = dataset();
        let dashboard = Dashboard::compute(&data, &FilterSelection::all(&data));
        let text = render_text(&dashboard, "$");

        assert!(text.contains("Total Engagement     1200"));
        assert!(text.contains("Avg Engagement Rate  4.50%"));
        assert!(text.contains("Revenue Generated    $450.00"));
        assert!(text.contains("Best platform: Instagram (4.50)"));
        assert!(text.contains("Best time to post: 07:00"));
        assert!(text.contains("Diwali"));
    }

    #[test]
    fn test_render_empty_dashboard() {
        let data = dataset();
        let dashboard = Dashboard::compute(&data, &FilterSelection::none());
        let text = render_text(&dashboard, "$");

        assert!(text.contains("Avg ROI              n/a"));
        assert!(text.contains("(no data)"));
        assert!(text.contains("Best time to post: n/a"));
    }

    #[test]
    fn test_report_formats_into_any_writer() {
        use std::fmt::Write;

        let data = dataset();
        let dashboard = Dashboard::compute(&data, &FilterSelection::all(&data));
        let report = TextReport {
            dashboard: &dashboard,
            currency: "$",
        };
        let mut out = String::from(">> ");
        write!(out, "{report}").unwrap();
        assert_eq!(&out[3..], render_text(&dashboard, "$"));
        assert!(out.ends_with("Best time to post: 07:00 (1200.00)\n"));
    }
}
