use std::rc::Rc;
use std::time::Instant;

use crate::utils::sample_csv_path;
use engagement_analytics::{Dataset, DashboardCache, report::render_text};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();
    let (dataset, _) = Dataset::load_csv(path.as_path())?;
    let dataset = Rc::new(dataset);
    let cache = Rc::new(DashboardCache::new());

    // First run (filter + aggregation)
    let start = Instant::now();
    let dashboard = dataset
        .query_with_cache(&cache)
        .platforms(["Instagram"])
        .execute();
    println!("First run elapsed: {:?}", start.elapsed());

    // Second run (should be cached)
    let start = Instant::now();
    let cached = dataset
        .query_with_cache(&cache)
        .platforms(["Instagram"])
        .execute();
    println!("Cached run elapsed: {:?}", start.elapsed());
    assert_eq!(dashboard, cached);

    print!("{}", render_text(&cached, "₹ "));
    Ok(())
}
