use crate::changes::percent_change;
use shared_models::InflectionPoint;
use tracing::debug;

/// Keeps a strictly alternating peak/trough subsequence in which each kept
/// point moved at least `min_change_percent` from the previously kept one.
///
/// The first candidate is always kept. A candidate of the same kind as the
/// last kept point is skipped outright, even when it is more extreme. A
/// differently-kinded candidate that moves too little is dropped and the
/// last kept point stays the baseline.
pub fn filter_alternating(
    points: &[InflectionPoint],
    min_change_percent: f64,
) -> Vec<InflectionPoint> {
    let mut kept: Vec<InflectionPoint> = Vec::with_capacity(points.len());

    for candidate in points {
        let Some(last) = kept.last() else {
            kept.push(candidate.clone());
            continue;
        };
        if candidate.kind == last.kind {
            continue;
        }

        let moved = percent_change(last.defining_price(), candidate.defining_price()).abs();
        if moved >= min_change_percent {
            kept.push(candidate.clone());
        }
    }

    debug!(
        candidates = points.len(),
        kept = kept.len(),
        min_change_percent,
        "Alternation filter applied"
    );

    kept
}
