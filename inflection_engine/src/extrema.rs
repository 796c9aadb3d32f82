use shared_models::{InflectionPoint, PointKind, PricePoint, SeriesIndex};
use tracing::debug;

/// Classifies every bar whose full `±window_size` neighbourhood fits inside
/// the series, starting no earlier than `start`.
///
/// A peak's high is strictly above every neighbour's high; a trough's low is
/// strictly below every neighbour's low. A bar that satisfies both is reported
/// as a peak. Output is in ascending index order and unfiltered.
pub fn scan_extrema(
    series: &[PricePoint],
    start: SeriesIndex,
    window_size: usize,
) -> Vec<InflectionPoint> {
    debug_assert!(window_size >= 1, "window_size must be >= 1");

    let begin = start.get().max(window_size);
    let end = series.len().saturating_sub(window_size);

    let points: Vec<InflectionPoint> = (begin..end)
        .filter_map(|i| {
            classify(series, i, window_size).map(|kind| {
                let bar = &series[i];
                InflectionPoint {
                    index: SeriesIndex(i),
                    date: bar.date,
                    price: bar.close,
                    high: bar.high,
                    low: bar.low,
                    kind,
                }
            })
        })
        .collect();

    debug!(
        start = start.get(),
        window_size,
        bars = series.len(),
        candidates = points.len(),
        "Extremum scan complete"
    );

    points
}

fn classify(series: &[PricePoint], i: usize, k: usize) -> Option<PointKind> {
    let bar = &series[i];
    let left = &series[i - k..i];
    let right = &series[i + 1..=i + k];

    if left.iter().chain(right).all(|p| p.high < bar.high) {
        Some(PointKind::Peak)
    } else if left.iter().chain(right).all(|p| p.low > bar.low) {
        Some(PointKind::Trough)
    } else {
        None
    }
}
