//! Fixtures shared by the workspace integration tests.

use chrono::{Duration, TimeZone, Utc};
use shared_models::{InflectionPoint, PointKind, PricePoint, SeriesIndex};

/// Daily bars starting 2024-01-01 whose high/low hug the close by 1%.
pub fn series_from_closes(closes: &[f64]) -> Vec<PricePoint> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: base + Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: Some(10_000.0),
        })
        .collect()
}

pub fn turning_point(index: usize, kind: PointKind, high: f64, low: f64) -> InflectionPoint {
    InflectionPoint {
        index: SeriesIndex(index),
        date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(index as i64),
        price: (high + low) / 2.0,
        high,
        low,
        kind,
    }
}

/// Doubles off 10 by bar 5 and tops at 25, then flags 25 -> 20 -> 24 -> 19 -> 23.
pub fn high_tight_flag() -> Vec<PricePoint> {
    series_from_closes(&[
        11.0, 10.0, 12.0, 15.0, 19.0, 22.0, 25.0, 24.0, 22.0, 20.0, 21.0, 22.5, 24.0, 23.0,
        21.0, 19.0, 20.5, 22.0, 23.0, 22.0, 21.5,
    ])
}
