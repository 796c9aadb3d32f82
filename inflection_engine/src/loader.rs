use crate::data_validation::validate_series;
use serde::Deserialize;
use shared_models::error::{ModelError, Result};
use shared_models::{parse_date, PricePoint};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One symbol's OHLCV history as handed to the screener.
#[derive(Debug, Clone)]
pub struct SymbolSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

/// Symbol name for a series file: its stem, e.g. `data/NVDA.csv` -> `NVDA`.
pub fn symbol_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Loads a `.json` (array of bars) or `.csv` (`date,open,high,low,close[,volume]`) file.
/// Files with unsorted dates or malformed bars are rejected here, before analysis.
pub fn load_series(path: &Path) -> Result<SymbolSeries> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let points = match extension.as_deref() {
        Some("json") => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<Vec<PricePoint>>(&raw)?
        }
        Some("csv") => read_csv(path)?,
        _ => {
            return Err(ModelError::Load(format!(
                "unsupported series file: {}",
                path.display()
            )))
        }
    };

    validate_series(&points)?;
    debug!(path = %path.display(), bars = points.len(), "Series loaded");

    Ok(SymbolSeries {
        symbol: symbol_for(path),
        points,
    })
}

fn read_csv(path: &Path) -> Result<Vec<PricePoint>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ModelError::Load(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut points = Vec::new();
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| {
            ModelError::Load(format!("{} row {}: {}", path.display(), line + 1, e))
        })?;
        let date = parse_date(&row.date).ok_or_else(|| {
            ModelError::Load(format!(
                "{} row {}: unrecognized date {}",
                path.display(),
                line + 1,
                row.date
            ))
        })?;
        points.push(PricePoint {
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(points)
}

/// Expands the given paths into series files. Directories contribute their
/// `.json` and `.csv` entries in name order; plain files pass through as given.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_series_file(p))
                .collect();
            entries.sort();
            inputs.extend(entries);
        } else {
            inputs.push(path.to_path_buf());
        }
    }
    Ok(inputs)
}

fn is_series_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("json") | Some("csv")
    )
}
