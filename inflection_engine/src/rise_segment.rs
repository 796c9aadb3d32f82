use shared_models::{PricePoint, RiseSegment, SeriesIndex};
use tracing::debug;

/// Close-to-close rise, in percent over the running minimum, that qualifies a segment.
pub const RISE_THRESHOLD_PCT: f64 = 100.0;

/// Finds the first span whose close has doubled off the running minimum close.
///
/// Single forward pass with early exit: a lower close moves the anchor, so a
/// rise is always measured from the lowest close seen so far. The first
/// qualifying bar wins even if a steeper rise follows later.
pub fn locate_rise_segment(series: &[PricePoint]) -> Option<RiseSegment> {
    let mut min_price = f64::INFINITY;
    let mut min_index = 0usize;

    for (i, point) in series.iter().enumerate() {
        if point.close < min_price {
            min_price = point.close;
            min_index = i;
        }

        let rise_pct = (point.close - min_price) / min_price * 100.0;
        if rise_pct >= RISE_THRESHOLD_PCT {
            let anchor = &series[min_index];
            debug!(
                start_index = min_index,
                end_index = i,
                min_price,
                peak_price = point.close,
                rise_pct = format!("{:.2}%", rise_pct),
                "Rise segment located"
            );
            return Some(RiseSegment {
                start_index: SeriesIndex(min_index),
                end_index: SeriesIndex(i),
                start_date: anchor.date,
                end_date: point.date,
                min_price,
                peak_price: point.close,
                rise_percentage: rise_pct,
            });
        }
    }

    None
}
