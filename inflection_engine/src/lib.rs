//! High-tight-flag inflection analysis over OHLCV series.
//!
//! The pipeline runs rise-segment location, windowed extremum scanning,
//! alternation filtering and percentage-change computation in that order.
//! [`analyze`] is the fail-soft entry point; [`try_analyze`] surfaces errors.

pub mod alternation;
pub mod changes;
pub mod config;
pub mod data_validation;
pub mod extrema;
pub mod loader;
pub mod pipeline;
pub mod rise_segment;
pub mod screener;


pub use alternation::filter_alternating;
pub use changes::compute_changes;
pub use extrema::scan_extrema;
pub use loader::{collect_inputs, load_series, SymbolSeries};
pub use pipeline::{analyze, try_analyze};
pub use rise_segment::locate_rise_segment;
pub use screener::{screen, screen_paths, ScreenHit, ScreenReport};
