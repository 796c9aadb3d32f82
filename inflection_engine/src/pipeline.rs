use crate::alternation::filter_alternating;
use crate::changes::compute_changes;
use crate::data_validation::validate_analysis_inputs;
use crate::extrema::scan_extrema;
use crate::rise_segment::locate_rise_segment;
use shared_models::error::Result;
use shared_models::{
    AnalysisOptions, AnalysisResult, AnalysisSummary, PercentageChange, PricePoint, SeriesIndex,
};
use tracing::{debug, warn};

/// Runs the full inflection-point pipeline.
///
/// `Ok(None)` means no actionable pattern: an empty series, no 100% rise
/// segment while that gate is enabled, or no turning point surviving the
/// alternation filter. Invalid options, or a bar whose close, high or low the
/// analysis cannot price, are `Err`. Dates are taken as given.
pub fn try_analyze(
    series: &[PricePoint],
    options: &AnalysisOptions,
) -> Result<Option<AnalysisResult>> {
    let options = options.validate()?;

    if series.is_empty() {
        debug!("Empty series, nothing to analyze");
        return Ok(None);
    }
    validate_analysis_inputs(series)?;

    let rise_segment = if options.enable_100_percent_rise {
        match locate_rise_segment(series) {
            Some(segment) => Some(segment),
            None => {
                debug!(bars = series.len(), "No 100% rise segment, no signal");
                return Ok(None);
            }
        }
    } else {
        None
    };

    let scan_start = rise_segment
        .as_ref()
        .map(|segment| segment.end_index)
        .unwrap_or(SeriesIndex(0));

    let candidates = scan_extrema(series, scan_start, options.window_size);
    let inflection_points = filter_alternating(&candidates, options.min_change_percent);
    if inflection_points.is_empty() {
        debug!(
            scan_start = scan_start.get(),
            candidates = candidates.len(),
            "No inflection points survived filtering, no signal"
        );
        return Ok(None);
    }

    debug_assert!(inflection_points
        .windows(2)
        .all(|pair| pair[0].kind != pair[1].kind && pair[0].index < pair[1].index));

    let percentage_changes = compute_changes(&inflection_points);
    let summary = AnalysisSummary {
        rise_segment_exists: rise_segment.is_some(),
        inflection_point_count: inflection_points.len(),
        average_change: average_magnitude(&percentage_changes),
    };

    debug!(
        rise_segment = summary.rise_segment_exists,
        points = summary.inflection_point_count,
        average_change = summary.average_change,
        "Inflection analysis complete"
    );

    Ok(Some(AnalysisResult {
        rise_segment,
        inflection_points,
        percentage_changes,
        summary,
    }))
}

/// Fail-soft entry point: every error becomes `None`, same as "no signal".
pub fn analyze(series: &[PricePoint], options: &AnalysisOptions) -> Option<AnalysisResult> {
    try_analyze(series, options).unwrap_or_else(|e| {
        warn!(error = %e, bars = series.len(), "Inflection analysis failed");
        None
    })
}

fn average_magnitude(changes: &[PercentageChange]) -> f64 {
    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().map(|c| c.magnitude).sum::<f64>() / changes.len() as f64
}
