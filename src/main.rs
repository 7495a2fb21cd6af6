use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use engagement_analytics::{
    Dataset,
    config::{DashboardConfig, OutputFormat},
    report::render_text,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "engagement-dashboard")]
#[command(about = "Social media engagement KPIs and breakdowns for a filter selection")]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engagement CSV; overrides `data.csv_path`
    #[arg(long, env = "ENGAGEMENT_CSV")]
    csv: Option<PathBuf>,

    /// Keep only these platforms (repeatable). Defaults to all.
    #[arg(long = "platform")]
    platforms: Vec<String>,

    /// Keep only these content types (repeatable). Defaults to all.
    #[arg(long = "content-type")]
    content_types: Vec<String>,

    /// Keep only these years (repeatable). Defaults to all.
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Output format; overrides `output.format`
    #[arg(long, value_enum)]
    format: Option<Format>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(csv) = cli.csv {
        config.data.csv_path = csv;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }

    let (dataset, summary) = Dataset::load_csv(&config.data.csv_path)
        .with_context(|| format!("loading {}", config.data.csv_path.display()))?;
    if !summary.errors.is_empty() {
        tracing::warn!(
            rejected = summary.errors.len(),
            first_line = summary.errors[0].line,
            "some rows could not be parsed and were skipped"
        );
    }

    let dataset = Rc::new(dataset);
    let mut query = dataset.query();
    if !cli.platforms.is_empty() {
        query = query.platforms(cli.platforms);
    }
    if !cli.content_types.is_empty() {
        query = query.content_types(cli.content_types);
    }
    if !cli.years.is_empty() {
        query = query.years(cli.years);
    }
    let dashboard = query.execute();

    match config.output.format {
        OutputFormat::Text => print!("{}", render_text(&dashboard, &config.output.currency)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
    }

    Ok(())
}
