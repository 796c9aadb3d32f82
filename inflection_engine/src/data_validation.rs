use shared_models::error::{ModelError, Result};
use shared_models::PricePoint;
use tracing::warn;

/// Validates a single bar's prices and volume
pub fn validate_price_point(index: usize, point: &PricePoint) -> Result<()> {
    let prices = [
        ("open", point.open),
        ("high", point.high),
        ("low", point.low),
        ("close", point.close),
    ];
    for (field, value) in prices {
        if value <= 0.0 || !value.is_finite() {
            warn!(index, field, value, "Invalid price value, rejecting series");
            return Err(ModelError::InvalidSeries(format!(
                "bar {}: invalid {} value: {}",
                index, field, value
            )));
        }
    }

    if point.high < point.low {
        return Err(ModelError::InvalidSeries(format!(
            "bar {}: high {} below low {}",
            index, point.high, point.low
        )));
    }

    if let Some(volume) = point.volume {
        if volume < 0.0 || !volume.is_finite() {
            return Err(ModelError::InvalidSeries(format!(
                "bar {}: invalid volume value: {}",
                index, volume
            )));
        }
    }

    Ok(())
}

/// Rejects input whose dates go backwards. Callers sort; nothing here does.
pub fn validate_ordering(series: &[PricePoint]) -> Result<()> {
    for (i, pair) in series.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            warn!(
                index = i + 1,
                previous = %pair[0].date,
                current = %pair[1].date,
                "Series is not sorted by date"
            );
            return Err(ModelError::InvalidSeries(format!(
                "bar {} dated {} precedes bar {} dated {}",
                i + 1,
                pair[1].date,
                i,
                pair[0].date
            )));
        }
    }
    Ok(())
}

/// Checks only the fields the analysis reads: a finite, positive close and
/// finite high/low. Dates, open and volume are left to the caller.
pub fn validate_analysis_inputs(series: &[PricePoint]) -> Result<()> {
    for (index, point) in series.iter().enumerate() {
        if point.close <= 0.0 || !point.close.is_finite() {
            warn!(index, close = point.close, "Invalid close, rejecting series");
            return Err(ModelError::InvalidSeries(format!(
                "bar {}: invalid close value: {}",
                index, point.close
            )));
        }
        if !point.high.is_finite() || !point.low.is_finite() {
            warn!(index, high = point.high, low = point.low, "Non-finite range, rejecting series");
            return Err(ModelError::InvalidSeries(format!(
                "bar {}: non-finite high/low: {}/{}",
                index, point.high, point.low
            )));
        }
    }
    Ok(())
}

/// Comprehensive validation for an OHLCV series read from disk
pub fn validate_series(series: &[PricePoint]) -> Result<()> {
    for (i, point) in series.iter().enumerate() {
        validate_price_point(i, point)?;
    }
    validate_ordering(series)
}
