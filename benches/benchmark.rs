use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use engagement_analytics::processor::aggregate::{compute_kpis, group_mean_multi};
use engagement_analytics::{Dataset, DashboardCache, Dimension, FilterSelection, Metric};
use rand::Rng;
use std::io::{BufWriter, Write};
use std::rc::Rc;
use tempfile::NamedTempFile;

const ROWS: usize = 200_000;

const PLATFORMS: [&str; 5] = ["Instagram", "Facebook", "Twitter", "LinkedIn", "TikTok"];
const CONTENT_TYPES: [&str; 4] = ["image", "video", "carousel", "text"];
const CAMPAIGNS: [&str; 4] = ["Summer Sale", "Festive Push", "Brand Awareness", ""];

fn synthetic_csv(rows: usize) -> NamedTempFile {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = BufWriter::new(tmp.reopen().unwrap());
    writeln!(
        w,
        "platform,content_type,year,post_hour,campaign_name,engagement,engagement_rate,ad_spend,roi"
    )
    .unwrap();

    let mut rng = rand::rng();
    for _ in 0..rows {
        writeln!(
            w,
            "{},{},{},{},{},{},{:.2},{:.2},{:.3}",
            PLATFORMS[rng.random_range(0..PLATFORMS.len())],
            CONTENT_TYPES[rng.random_range(0..CONTENT_TYPES.len())],
            rng.random_range(2022..=2024),
            rng.random_range(0..24),
            CAMPAIGNS[rng.random_range(0..CAMPAIGNS.len())],
            rng.random_range(10..50_000),
            rng.random_range(0.5..15.0),
            rng.random_range(0.0..5_000.0),
            rng.random_range(-0.8..3.0),
        )
        .unwrap();
    }
    w.flush().unwrap();
    tmp
}

fn pipeline(c: &mut Criterion) {
    let csv = synthetic_csv(ROWS);

    let mut group = c.benchmark_group("EngagementPipeline");
    group.sample_size(10);
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function("load_csv", |b| {
        b.iter(|| Dataset::load_csv(csv.path()).unwrap())
    });

    let (dataset, _) = Dataset::load_csv(csv.path()).unwrap();
    let dataset = Rc::new(dataset);
    let narrowed = FilterSelection::all(&dataset)
        .with_platforms(["Instagram", "TikTok"])
        .with_years([2024]);

    group.bench_function("apply_filters", |b| {
        b.iter(|| dataset.filter(&narrowed).len())
    });

    group.bench_function("compute_kpis", |b| {
        let view = dataset.full_view();
        b.iter(|| compute_kpis(&view))
    });

    group.bench_function("campaign_group_mean_multi", |b| {
        let view = dataset.full_view();
        b.iter(|| {
            group_mean_multi(
                &view,
                Dimension::CampaignName,
                &[Metric::RevenueGenerated, Metric::Roi],
            )
        })
    });

    group.bench_function("dashboard_uncached", |b| {
        b.iter(|| dataset.query().selection(narrowed.clone()).execute())
    });

    // Benchmark the same dashboard served from the LRU
    group.bench_function("dashboard_cached", |b| {
        let cache = Rc::new(DashboardCache::new());
        b.iter(|| {
            dataset
                .query_with_cache(&cache)
                .selection(narrowed.clone())
                .execute()
        })
    });

    group.finish();
}

criterion_group!(benches, pipeline);
criterion_main!(benches);
