//! Price series lookup properties

use avg_backtest::series::{PricePoint, PriceSeries};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

/// Hour offsets paired with prices, unique per offset
fn samples() -> impl Strategy<Value = Vec<(i64, f64)>> {
    prop::collection::btree_map(0i64..10_000, 1.0f64..1_000.0, 1..60)
        .prop_map(|m| m.into_iter().collect())
}

fn series_from(samples: &[(i64, f64)]) -> PriceSeries {
    samples
        .iter()
        .map(|&(h, p)| PricePoint::new(origin() + Duration::hours(h), p))
        .collect()
}

/// First sample in time order inside the window, then the leading sample
fn linear_lookup(samples: &[(i64, f64)], target: i64, tolerance: i64) -> Option<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|&(h, _)| h);
    sorted
        .iter()
        .find(|&&(h, _)| h <= target && target - h <= tolerance)
        .or_else(|| {
            sorted
                .first()
                .filter(|&&(h, _)| h >= target && h - target <= tolerance)
        })
        .map(|&(_, p)| p)
}

proptest! {
    #[test]
    fn lookup_ignores_load_order(
        samples in samples(),
        target in -100i64..10_100,
        tolerance in 0i64..500,
    ) {
        let mut reversed = samples.clone();
        reversed.reverse();

        let target_time = origin() + Duration::hours(target);
        let tol = Duration::hours(tolerance);
        let a = series_from(&samples).price_at(target_time, tol);
        let b = series_from(&reversed).price_at(target_time, tol);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn lookup_matches_linear_scan(
        samples in samples(),
        target in -100i64..10_100,
        tolerance in 0i64..500,
    ) {
        let series = series_from(&samples);
        let found = series
            .price_at(origin() + Duration::hours(target), Duration::hours(tolerance))
            .ok();
        prop_assert_eq!(found, linear_lookup(&samples, target, tolerance));
    }

    #[test]
    fn boundaries_are_min_and_max(samples in samples()) {
        let series = series_from(&samples);
        let min = samples.iter().map(|&(h, _)| h).min().unwrap();
        let max = samples.iter().map(|&(h, _)| h).max().unwrap();
        prop_assert_eq!(series.oldest(), Some(origin() + Duration::hours(min)));
        prop_assert_eq!(series.newest(), Some(origin() + Duration::hours(max)));
        prop_assert!(series.points().windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
