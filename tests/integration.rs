use std::io::Write;
use std::rc::Rc;

use engagement_analytics::processor::aggregate::{
    apply_filters, argmax, compute_kpis, group_mean, group_mean_multi,
};
use engagement_analytics::{
    Dataset, DashboardCache, Dimension, FilterSelection, Metric, PipelineError, Value,
};
use tempfile::NamedTempFile;

const CSV: &str = "\
post_id,date,platform,content_type,year,post_hour,campaign_name,engagement,engagement_rate,ad_spend,roi
1,2023-04-02,Instagram,video,2023,9,Spring Launch,1200,4.5,300,0.5
2,2023-06-11,TikTok,video,2023,20,Spring Launch,5400,9.0,800,1.25
3,2024-01-15,Instagram,image,2024,12,,800,3.0,0,0
4,2024-02-20,LinkedIn,text,2024,9,Hiring,150,1.5,120,-0.25
5,2024-03-03,TikTok,carousel,2024,20,,3000,7.5,450,0.8
";

fn load(csv: &str) -> Rc<Dataset> {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", csv).unwrap();
    let (dataset, summary) = Dataset::load_csv(tmp.path()).unwrap();
    assert!(summary.errors.is_empty(), "{:?}", summary.errors);
    Rc::new(dataset)
}

#[test]
fn test_load_and_kpis() {
    let dataset = load(CSV);
    assert_eq!(dataset.len(), 5);

    let kpis = compute_kpis(&dataset.full_view());
    assert_eq!(kpis.record_count, 5);
    assert_eq!(kpis.total_engagement, 10_550.0);
    assert_eq!(kpis.total_ad_spend, 1_670.0);
    // 450 + 1800 + 0 + 90 + 810
    assert!((kpis.total_revenue - 3_150.0).abs() < 1e-9);
    assert!((kpis.avg_engagement_rate.unwrap() - 5.1).abs() < 1e-9);
}

#[test]
fn test_two_record_scenario() {
    let csv = "platform,content_type,year,post_hour,engagement,engagement_rate,ad_spend,roi\n\
               A,video,2023,9,10,5,100,0.5\n\
               B,video,2023,9,20,15,200,1.0\n";
    let dataset = load(csv);
    let view = dataset.full_view();

    let kpis = compute_kpis(&view);
    assert_eq!(kpis.total_engagement, 30.0);
    assert_eq!(kpis.avg_engagement_rate, Some(10.0));
    assert_eq!(kpis.total_revenue, 550.0);

    let by_platform = group_mean(&view, Dimension::Platform, Metric::EngagementRate);
    let best = argmax(&by_platform).unwrap();
    assert_eq!(best.key, Value::from("B"));
    assert_eq!(best.value, 15.0);
}

#[test]
fn test_filters_then_groups() {
    let dataset = load(CSV);
    let selection = FilterSelection::all(&dataset)
        .with_platforms(["Instagram", "TikTok"])
        .with_years([2023]);
    let view = apply_filters(&dataset, &selection);
    assert_eq!(view.rows(), &[0, 1]);

    let campaigns = group_mean_multi(
        &view,
        Dimension::CampaignName,
        &[Metric::RevenueGenerated, Metric::Roi],
    );
    assert_eq!(campaigns.len(), 1);
    let key = Value::from("Spring Launch");
    assert_eq!(campaigns.value(&key, Metric::RevenueGenerated), Some(1_125.0));
    assert_eq!(campaigns.value(&key, Metric::Roi), Some(0.875));
}

#[test]
fn test_hourly_tie_goes_to_earlier_hour() {
    let csv = "platform,content_type,year,post_hour,engagement,engagement_rate,ad_spend,roi\n\
               A,video,2023,21,500,1,0,0\n\
               A,video,2023,8,500,1,0,0\n\
               A,video,2023,14,100,1,0,0\n";
    let dataset = load(csv);
    let hourly = group_mean(&dataset.full_view(), Dimension::PostHour, Metric::Engagement);
    let best = hourly.argmax().unwrap();
    assert_eq!(best.key, Value::Int(8));
}

#[test]
fn test_empty_selection() {
    let dataset = load(CSV);
    let selection = FilterSelection::all(&dataset).with_platforms(Vec::<String>::new());
    let view = apply_filters(&dataset, &selection);
    assert!(view.is_empty());

    let kpis = compute_kpis(&view);
    assert_eq!(kpis.total_engagement, 0.0);
    assert_eq!(kpis.avg_engagement_rate, None);
    assert_eq!(kpis.avg_roi, None);

    let hourly = group_mean(&view, Dimension::PostHour, Metric::Engagement);
    assert!(matches!(argmax(&hourly), Err(PipelineError::EmptyInput(_))));
}

#[test]
fn test_cached_dashboard() {
    let dataset = load(CSV);
    let cache = Rc::new(DashboardCache::new());

    let first = dataset
        .query_with_cache(&cache)
        .content_types(["video"])
        .execute();
    let second = dataset
        .query_with_cache(&cache)
        .content_types(["video"])
        .execute(); // from cache
    assert_eq!(cache.len(), 1);
    assert_eq!(first, second);
    assert_eq!(first.kpis.record_count, 2);
    assert_eq!(
        first.best_platform.map(|b| b.key),
        Some(Value::from("TikTok"))
    );
    assert_eq!(first.best_hour.map(|b| b.key), Some(Value::Int(20)));
}

#[test]
fn test_missing_file() {
    let err = Dataset::load_csv("/definitely/not/here.csv".as_ref()).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}
