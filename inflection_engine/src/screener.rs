use crate::loader::{load_series, symbol_for, SymbolSeries};
use crate::pipeline::try_analyze;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_models::error::{ModelError, Result};
use shared_models::{AnalysisOptions, AnalysisResult, PricePoint};
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ScreenHit {
    pub symbol: String,
    pub result: AnalysisResult,
}

/// Outcome of one screening pass over many symbols.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenReport {
    pub generated_at: DateTime<Utc>,
    pub options: AnalysisOptions,
    /// Ranked by rise percentage, steepest first.
    pub hits: Vec<ScreenHit>,
    pub no_signal: Vec<String>,
    pub failed: Vec<String>,
}

enum Outcome {
    Hit(ScreenHit),
    NoSignal(String),
    Failed(String),
}

/// Screens in-memory series; each symbol is analyzed independently on the
/// blocking pool with at most `max_concurrency` analyses in flight.
pub async fn screen(
    series: Vec<SymbolSeries>,
    options: AnalysisOptions,
    max_concurrency: usize,
) -> Result<ScreenReport> {
    let jobs = series
        .into_iter()
        .map(|s| {
            let points = s.points;
            (s.symbol, move || -> Result<Vec<PricePoint>> { Ok(points) })
        })
        .collect();
    run(jobs, options, max_concurrency).await
}

/// Same as [`screen`] but loads every file inside its blocking task. Files
/// that fail to load land in `failed`.
pub async fn screen_paths(
    paths: Vec<PathBuf>,
    options: AnalysisOptions,
    max_concurrency: usize,
) -> Result<ScreenReport> {
    let jobs = paths
        .into_iter()
        .map(|path| {
            let symbol = symbol_for(&path);
            (symbol, move || load_series(&path).map(|s| s.points))
        })
        .collect();
    run(jobs, options, max_concurrency).await
}

async fn run<F>(
    jobs: Vec<(String, F)>,
    options: AnalysisOptions,
    max_concurrency: usize,
) -> Result<ScreenReport>
where
    F: FnOnce() -> Result<Vec<PricePoint>> + Send + 'static,
{
    let options = options.validate()?;
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let total = jobs.len();
    let mut tasks = JoinSet::new();

    for (symbol, fetch) in jobs {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| ModelError::Analysis(format!("Screener semaphore closed: {}", e)))?;

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let name = symbol.clone();
            // a panicking loader or analysis still reports its symbol
            panic::catch_unwind(AssertUnwindSafe(|| evaluate(symbol, fetch, &options)))
                .unwrap_or_else(|_| {
                    error!(symbol = %name, "Screening task panicked");
                    Outcome::Failed(name)
                })
        });
    }

    let mut hits = Vec::new();
    let mut no_signal = Vec::new();
    let mut failed = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Outcome::Hit(hit)) => hits.push(hit),
            Ok(Outcome::NoSignal(symbol)) => no_signal.push(symbol),
            Ok(Outcome::Failed(symbol)) => failed.push(symbol),
            Err(e) => error!(error = %e, "Screening task aborted"),
        }
    }

    hits.sort_by(rank_hits);
    no_signal.sort();
    failed.sort();

    info!(
        symbols = total,
        hits = hits.len(),
        no_signal = no_signal.len(),
        failed = failed.len(),
        "Screening pass complete"
    );

    Ok(ScreenReport {
        generated_at: Utc::now(),
        options,
        hits,
        no_signal,
        failed,
    })
}

fn evaluate<F>(symbol: String, fetch: F, options: &AnalysisOptions) -> Outcome
where
    F: FnOnce() -> Result<Vec<PricePoint>>,
{
    let points = match fetch() {
        Ok(points) => points,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "Failed to load series");
            return Outcome::Failed(symbol);
        }
    };

    match try_analyze(&points, options) {
        Ok(Some(result)) => {
            debug!(
                symbol = %symbol,
                points = result.summary.inflection_point_count,
                average_change = result.summary.average_change,
                largest_change = result.largest_change().map(|c| c.magnitude),
                "Pattern found"
            );
            Outcome::Hit(ScreenHit { symbol, result })
        }
        Ok(None) => Outcome::NoSignal(symbol),
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "Analysis rejected series");
            Outcome::Failed(symbol)
        }
    }
}

fn rank_hits(a: &ScreenHit, b: &ScreenHit) -> Ordering {
    let rise = |hit: &ScreenHit| hit.result.rise_segment.as_ref().map(|s| s.rise_percentage);
    match (rise(a), rise(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.symbol.cmp(&b.symbol))
}
