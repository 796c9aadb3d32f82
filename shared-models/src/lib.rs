use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod error;
pub mod options;

pub use options::AnalysisOptions;

// Series Addressing

/// Position of a bar in the caller's original input series.
///
/// Filtered and intermediate collections have their own positions; only
/// values of this type may be handed back to a renderer as x-axis addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesIndex(pub usize);

impl SeriesIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for SeriesIndex {
    fn from(index: usize) -> Self {
        SeriesIndex(index)
    }
}

impl fmt::Display for SeriesIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Input Types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Text(String),
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDate::deserialize(deserializer)? {
        RawDate::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("epoch millis out of range: {ms}"))),
        RawDate::Text(text) => parse_date(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date: {text}"))),
    }
}

/// Parses the date shapes a chart feed hands over: RFC 3339, `YYYY-MM-DD HH:MM:SS`
/// or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// Analysis Types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiseSegment {
    pub start_index: SeriesIndex,
    pub end_index: SeriesIndex,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_price: f64,
    pub peak_price: f64,
    pub rise_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Peak,
    Trough,
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointKind::Peak => write!(f, "peak"),
            PointKind::Trough => write!(f, "trough"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflectionPoint {
    pub index: SeriesIndex,
    pub date: DateTime<Utc>,
    /// Close of the bar.
    pub price: f64,
    pub high: f64,
    pub low: f64,
    #[serde(rename = "type")]
    pub kind: PointKind,
}

impl InflectionPoint {
    /// High for peaks, low for troughs. Every percentage between turning
    /// points is measured on this price.
    pub fn defining_price(&self) -> f64 {
        match self.kind {
            PointKind::Peak => self.high,
            PointKind::Trough => self.low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageChange {
    pub from_index: SeriesIndex,
    pub to_index: SeriesIndex,
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub from_price: f64,
    pub to_price: f64,
    pub change_percent: f64,
    pub direction: Direction,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub rise_segment_exists: bool,
    pub inflection_point_count: usize,
    pub average_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub rise_segment: Option<RiseSegment>,
    pub inflection_points: Vec<InflectionPoint>,
    pub percentage_changes: Vec<PercentageChange>,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    pub fn last_point(&self) -> Option<&InflectionPoint> {
        self.inflection_points.last()
    }

    pub fn largest_change(&self) -> Option<&PercentageChange> {
        self.percentage_changes
            .iter()
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }
}
