use criterion::{Criterion, criterion_group, criterion_main};
use engagement_analytics::Dataset;
use engagement_analytics::processor::aggregate::compute_kpis;
use rand::Rng;
use rayon::ThreadPoolBuilder;
use std::io::{BufWriter, Write};
use tempfile::NamedTempFile;

fn synthetic_csv(rows: usize) -> NamedTempFile {
    let tmp = NamedTempFile::new().unwrap();
    let mut w = BufWriter::new(tmp.reopen().unwrap());
    writeln!(
        w,
        "platform,content_type,year,post_hour,engagement,engagement_rate,ad_spend,roi"
    )
    .unwrap();

    let mut rng = rand::rng();
    for _ in 0..rows {
        writeln!(
            w,
            "P{},C{},{},{},{},{:.2},{:.2},{:.3}",
            rng.random_range(0..5),
            rng.random_range(0..4),
            rng.random_range(2022..=2024),
            rng.random_range(0..24),
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

fn bench_scalability(c: &mut Criterion) {
    let sizes = [100_000usize, 1_000_000];

    for &rows in &sizes {
        let csv = synthetic_csv(rows);

        for threads in [1, 8] {
            let id = format!("kpis_{}rows_{}threads", rows, threads);
            let pool = ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap();
            c.bench_function(&id, |b| {
                pool.install(|| {
                    b.iter(|| {
                        let (dataset, _) = Dataset::load_csv(csv.path()).unwrap();
                        compute_kpis(&dataset.full_view())
                    })
                })
            });
        }
    }
}

criterion_group!(benches, bench_scalability);
criterion_main!(benches);
