use crate::utils::sample_csv_path;
use engagement_analytics::processor::aggregate::{group_by, group_mean};
use engagement_analytics::{AggregateOp, Dataset, Dimension, Measure, Metric};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();
    let (dataset, _) = Dataset::load_csv(path.as_path())?;
    let view = dataset.full_view();

    // Average engagement rate per platform
    let by_platform = group_mean(&view, Dimension::Platform, Metric::EngagementRate);
    for (platform, rate) in by_platform.series(Metric::EngagementRate) {
        println!("Platform {} => {:.2}%", platform, rate);
    }
    let best = by_platform.argmax()?;
    println!("Best platform: {} ({:.2}%)", best.key, best.value);

    // Several reductions per content type
    let measures = [
        Measure::new(Metric::Engagement, AggregateOp::Sum),
        Measure::new(Metric::Engagement, AggregateOp::Count),
        Measure::new(Metric::AdSpend, AggregateOp::Max),
    ];
    let by_content = group_by(&view, Dimension::ContentType, &measures);
    for (content, values) in by_content.iter() {
        println!("Content {} => {:?}", content, values);
    }

    Ok(())
}
