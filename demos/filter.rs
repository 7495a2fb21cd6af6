use crate::utils::sample_csv_path;
use engagement_analytics::{Dataset, FilterSelection};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();
    let (dataset, summary) = Dataset::load_csv(path.as_path())?;
    println!(
        "Loaded {} rows ({} rejected)",
        summary.rows_processed,
        summary.errors.len()
    );

    // Instagram and TikTok video posts from 2024
    let selection = FilterSelection::all(&dataset)
        .with_platforms(["Instagram", "TikTok"])
        .with_content_types(["video"])
        .with_years([2024]);
    let view = dataset.filter(&selection);

    println!("{} matching posts", view.len());
    for record in view.iter().take(5) {
        println!(
            "  {} {} {}h engagement={} revenue={:.2}",
            record.platform,
            record.content_type,
            record.post_hour,
            record.engagement,
            record.revenue_generated()
        );
    }
    Ok(())
}
