use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};

const PLATFORMS: [&str; 5] = ["Instagram", "Facebook", "Twitter", "LinkedIn", "TikTok"];
const CONTENT_TYPES: [&str; 4] = ["image", "video", "carousel", "text"];
const CAMPAIGNS: [&str; 4] = ["Summer Sale", "Festive Push", "Brand Awareness", "Launch"];

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let rows: usize = match args.next() {
        Some(n) => n.parse()?,
        None => 10_000,
    };
    let path = args
        .next()
        .unwrap_or_else(|| "social_media_engagement.csv".to_string());

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "post_id,date,platform,content_type,year,post_hour,campaign_name,engagement,engagement_rate,ad_spend,roi"
    )?;

    let mut rng = rand::rng();
    for i in 0..rows {
        let year = rng.random_range(2022..=2024);
        let month = rng.random_range(1..=12);
        let day = rng.random_range(1..=28);
        let platform = PLATFORMS[rng.random_range(0..PLATFORMS.len())];
        let content = CONTENT_TYPES[rng.random_range(0..CONTENT_TYPES.len())];
        // roughly a third of posts run outside any campaign
        let campaign = if rng.random_bool(0.35) {
            ""
        } else {
            CAMPAIGNS[rng.random_range(0..CAMPAIGNS.len())]
        };
        let engagement = rng.random_range(10..50_000);
        let rate: f64 = rng.random_range(0.5..15.0);
        let spend: f64 = rng.random_range(0.0..5_000.0);
        let roi: f64 = rng.random_range(-0.8..3.0);

        writeln!(
            writer,
            "{},{:04}-{:02}-{:02},{},{},{},{},{},{},{:.2},{:.2},{:.3}",
            i,
            year,
            month,
            day,
            platform,
            content,
            year,
            rng.random_range(0..24),
            campaign,
            engagement,
            rate,
            spend,
            roi
        )?;
    }
    writer.flush()?;

    println!("Sample CSV generated: {} ({} rows)", path, rows);
    Ok(())
}
