use crate::utils::sample_csv_path;
use engagement_analytics::processor::aggregate::compute_kpis;
use engagement_analytics::{Dataset, FilterSelection};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();
    let (dataset, _) = Dataset::load_csv(path.as_path())?;

    for year in dataset.distinct(engagement_analytics::Dimension::Year) {
        let Some(year) = year.as_int() else { continue };
        let selection = FilterSelection::all(&dataset).with_years([year as i32]);
        let kpis = compute_kpis(&dataset.filter(&selection));
        println!("{year}: {}", serde_json::to_string(&kpis)?);
    }
    Ok(())
}
