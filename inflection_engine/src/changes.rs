use shared_models::{Direction, InflectionPoint, PercentageChange};

/// Signed percent move from `from` to `to`.
pub fn percent_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}

/// One record per consecutive pair of turning points, priced on highs for
/// peaks and lows for troughs. No thresholding happens here.
pub fn compute_changes(points: &[InflectionPoint]) -> Vec<PercentageChange> {
    points
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            let from_price = prev.defining_price();
            let to_price = curr.defining_price();
            let change_percent = percent_change(from_price, to_price);

            PercentageChange {
                from_index: prev.index,
                to_index: curr.index,
                from_date: prev.date,
                to_date: curr.date,
                from_price,
                to_price,
                change_percent,
                direction: if change_percent > 0.0 {
                    Direction::Up
                } else {
                    Direction::Down
                },
                magnitude: change_percent.abs(),
            }
        })
        .collect()
}
