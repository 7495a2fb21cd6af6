use std::path::PathBuf;

/// Returns the path to the sample CSV, honouring `ENGAGEMENT_CSV` when set.
///
/// Generate one with `cargo run --bin data_generator -- 10000 data/social_media_engagement.csv`.
pub fn sample_csv_path() -> PathBuf {
    if let Some(path) = std::env::var_os("ENGAGEMENT_CSV") {
        return PathBuf::from(path);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("social_media_engagement.csv")
}
