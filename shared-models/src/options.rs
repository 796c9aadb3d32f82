use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Knobs for one inflection-point analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Bars compared on each side of a candidate extremum.
    pub window_size: usize,
    /// Smallest move, in percent, between two kept turning points.
    pub min_change_percent: f64,
    /// Gate the scan on a 100%+ rise segment and start scanning at its end.
    #[serde(rename = "enable100PercentRise")]
    pub enable_100_percent_rise: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            min_change_percent: default_min_change_percent(),
            enable_100_percent_rise: true,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(self) -> Result<Self> {
        macro_rules! ensure {
            ($cond:expr, $msg:literal) => {
                if !$cond {
                    return Err(ModelError::Config($msg.into()));
                }
            };
        }

        ensure!(self.window_size >= 1, "window_size must be >= 1");
        ensure!(
            self.min_change_percent.is_finite(),
            "min_change_percent must be finite"
        );
        ensure!(
            self.min_change_percent >= 0.0,
            "min_change_percent must be >= 0"
        );

        Ok(self)
    }
}

fn default_window_size() -> usize {
    5
}
fn default_min_change_percent() -> f64 {
    3.0
}
