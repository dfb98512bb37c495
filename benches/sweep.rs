//! Benchmarks for price lookups and interval sweeps

use avg_backtest::backtest::{horizon_years, BacktestDriver, DateRange, SweepSettings};
use avg_backtest::series::{PricePoint, PriceSeries};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn series(days: i64) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(1995, 1, 3, 0, 0, 0).unwrap();
    (0..days)
        .map(|d| PricePoint::new(start + Duration::days(d), 100.0 + (d as f64 / 45.0).sin() * 25.0))
        .collect()
}

fn benchmark_price_lookup(c: &mut Criterion) {
    let series = series(365 * 25);
    let target = Utc.with_ymd_and_hms(2010, 6, 15, 12, 0, 0).unwrap();
    series.points();

    c.bench_function("price_at", |b| {
        b.iter(|| series.price_at(black_box(target), Duration::hours(24)))
    });
}

fn benchmark_fixed_range(c: &mut Criterion) {
    let series = series(365 * 25);
    let range = DateRange::of_series(&series, 0).unwrap();
    let driver = BacktestDriver::new(SweepSettings::default());

    c.bench_function("sweep_range", |b| {
        b.iter(|| driver.run_range(&series, black_box(&range)))
    });
}

fn benchmark_sliding(c: &mut Criterion) {
    let series = series(365 * 12);
    let range = DateRange::of_series(&series, 0).unwrap();
    let parallel = BacktestDriver::new(SweepSettings::default());
    let sequential = BacktestDriver::new(SweepSettings {
        parallel: false,
        ..SweepSettings::default()
    });

    let mut group = c.benchmark_group("sweep_sliding");
    group.sample_size(10);
    group.bench_function("parallel", |b| {
        b.iter(|| parallel.sweep_sliding(&series, range, horizon_years(5)))
    });
    group.bench_function("sequential", |b| {
        b.iter(|| sequential.sweep_sliding(&series, range, horizon_years(5)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_price_lookup,
    benchmark_fixed_range,
    benchmark_sliding
);
criterion_main!(benches);
