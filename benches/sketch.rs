use criterion::measurement::WallTime;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion, Throughput,
};
use loglog_sketch::Sketch;
use pprof::criterion::{Output, PProfProfiler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tabled::settings::{Settings, Style};
use tabled::{Table, Tabled};

/// Insert and estimate operations are benchmarked against cardinalities ranging from 0 to
/// `DEFAULT_MAX_CARDINALITY` or environment variable `N` (if defined) with cardinality doubled
/// with every iteration as [0, 1, 2, ..., N].
const DEFAULT_MAX_CARDINALITY: usize = 1 << 16;

/// Error rates every operation is benchmarked with
const ERROR_RATES: [f64; 3] = [0.05, 0.02, 0.01];

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Protobuf));
    targets = benchmark
}
criterion_main!(benches);

fn benchmark(c: &mut Criterion) {
    let bench_results_path =
        std::env::var("BENCH_RESULTS_PATH").unwrap_or_else(|_| "target".to_string());
    let max_cardinality = std::env::var("N")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CARDINALITY);

    let cardinalities: Vec<usize> = std::iter::once(0)
        .chain((0..).map(|c| 1 << c))
        .take_while(|&c| c <= max_cardinality)
        .collect();

    let mut group = c.benchmark_group("insert");
    for &cardinality in &cardinalities {
        group.throughput(Throughput::Elements(cardinality.max(1) as u64));
        for error_rate in ERROR_RATES {
            bench_insert(&mut group, error_rate, cardinality);
        }
    }
    group.finish();

    let mut group = c.benchmark_group("estimate");
    group.throughput(Throughput::Elements(1));
    for &cardinality in &cardinalities {
        for error_rate in ERROR_RATES {
            bench_estimate(&mut group, error_rate, cardinality);
        }
    }
    group.finish();

    let results: Vec<StatRecord> = cardinalities
        .iter()
        .map(|&cardinality| StatRecord {
            cardinality,
            error_rate_5: measure_error(0.05, cardinality),
            error_rate_2: measure_error(0.02, cardinality),
            error_rate_1: measure_error(0.01, cardinality),
        })
        .collect();

    let table_config = Settings::default().with(Style::markdown());
    std::fs::write(
        format!("{}/relative_error.md", bench_results_path),
        Table::new(results).with(table_config).to_string(),
    )
    .unwrap();
}

fn bench_insert(group: &mut BenchmarkGroup<WallTime>, error_rate: f64, cardinality: usize) {
    group.bench_with_input(
        BenchmarkId::new(format!("error_rate={}", error_rate), cardinality),
        &cardinality,
        |b, &cardinality| {
            b.iter(|| {
                let mut sketch = Sketch::new(error_rate).unwrap();
                for i in 0..black_box(cardinality) {
                    sketch.insert(black_box(&i));
                }
            });
        },
    );
}

fn bench_estimate(group: &mut BenchmarkGroup<WallTime>, error_rate: f64, cardinality: usize) {
    group.bench_with_input(
        BenchmarkId::new(format!("error_rate={}", error_rate), cardinality),
        &cardinality,
        |b, &cardinality| {
            let mut sketch = Sketch::new(error_rate).unwrap();
            for i in 0..black_box(cardinality) {
                sketch.insert(black_box(&i));
            }
            b.iter(|| sketch.estimate());
        },
    );
}

fn measure_error(error_rate: f64, cardinality: usize) -> String {
    let n = 100;
    let mut total_relative_error: f64 = 0.0;
    let mut rng = StdRng::seed_from_u64(12345);
    for _ in 0..n {
        let mut sketch = Sketch::new(error_rate).unwrap();
        for _ in 0..cardinality {
            sketch.insert(&rng.gen::<u64>());
        }
        let relative_error = if cardinality == 0 {
            0.0
        } else {
            (sketch.estimate() - cardinality as f64).abs() / cardinality as f64
        };
        total_relative_error += relative_error;
    }
    let avg_relative_error = total_relative_error / f64::from(n);

    if avg_relative_error < 1.0 {
        format!("{:.4}", avg_relative_error)
    } else {
        format!("{:.2e}", avg_relative_error)
    }
}

#[derive(Tabled)]
struct StatRecord {
    cardinality: usize,
    #[tabled(rename = "ε = 0.05")]
    error_rate_5: String,
    #[tabled(rename = "ε = 0.02")]
    error_rate_2: String,
    #[tabled(rename = "ε = 0.01")]
    error_rate_1: String,
}
