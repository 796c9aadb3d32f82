use shared_models::error::{ModelError, Result};
use shared_models::AnalysisOptions;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Runtime configuration for the `htf_screener` binary.
#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    pub options: AnalysisOptions,
    pub max_concurrency: usize,
    pub output: Option<PathBuf>,
    pub log_json: bool,
}

impl ScreenerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup. Unset keys take their defaults;
    /// keys that are set but unparsable are errors.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = AnalysisOptions::default();
        Ok(ScreenerConfig {
            options: AnalysisOptions {
                window_size: parse_var(&lookup, "HTF_WINDOW_SIZE", defaults.window_size)?,
                min_change_percent: parse_var(
                    &lookup,
                    "HTF_MIN_CHANGE_PERCENT",
                    defaults.min_change_percent,
                )?,
                enable_100_percent_rise: parse_flag(
                    &lookup,
                    "HTF_ENABLE_RISE",
                    defaults.enable_100_percent_rise,
                )?,
            },
            max_concurrency: parse_var(&lookup, "HTF_MAX_CONCURRENCY", num_cpus::get())?,
            output: lookup("HTF_OUTPUT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_json: parse_flag(&lookup, "HTF_LOG_JSON", false)?,
        })
    }

    pub fn validate(self) -> Result<Self> {
        macro_rules! ensure {
            ($cond:expr, $msg:literal) => {
                if !$cond {
                    return Err(ModelError::Config($msg.into()));
                }
            };
        }

        ensure!(self.max_concurrency > 0, "max_concurrency must be > 0");
        let options = self.options.validate()?;

        Ok(Self { options, ..self })
    }
}

fn parse_var<L, T>(lookup: &L, name: &str, default: T) -> Result<T>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| ModelError::Config(format!("{} = {:?}: {}", name, raw, e))),
        _ => Ok(default),
    }
}

fn parse_flag<L>(lookup: &L, name: &str, default: bool) -> Result<bool>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) if v == "1" || v == "true" || v == "yes" => Ok(true),
        Some(v) if v == "0" || v == "false" || v == "no" => Ok(false),
        Some(v) => Err(ModelError::Config(format!(
            "{} must be a boolean, got {:?}",
            name, v
        ))),
    }
}

use once_cell::sync::OnceCell;

static CONFIG_CELL: OnceCell<ScreenerConfig> = OnceCell::new();

pub fn get_config() -> Result<&'static ScreenerConfig> {
    CONFIG_CELL.get_or_try_init(|| ScreenerConfig::from_env().and_then(|config| config.validate()))
}
