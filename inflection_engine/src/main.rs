use anyhow::{bail, Context, Result};
use inflection_engine::{collect_inputs, config::get_config, screen_paths};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let config = get_config()?;

    // Logs go to stderr; stdout carries the report
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: htf_screener <series-file-or-dir>...");
    }

    let inputs = collect_inputs(&args).context("Failed to collect series inputs")?;
    info!(
        files = inputs.len(),
        window_size = config.options.window_size,
        min_change_percent = config.options.min_change_percent,
        rise_gate = config.options.enable_100_percent_rise,
        max_concurrency = config.max_concurrency,
        "Starting HTF screen"
    );

    let report = screen_paths(inputs, config.options, config.max_concurrency).await?;

    for hit in &report.hits {
        info!(
            symbol = %hit.symbol,
            rise_pct = hit.result.rise_segment.as_ref().map(|s| s.rise_percentage),
            points = hit.result.summary.inflection_point_count,
            last_turn = ?hit.result.last_point().map(|p| p.kind),
            average_change = format!("{:.2}%", hit.result.summary.average_change),
            "HTF candidate"
        );
    }

    let json = serde_json::to_string_pretty(&report)?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
