//! Run configuration.
//!
//! [`RunConfig`] is the raw, serde-facing form (JSON file or CLI flags).
//! [`RunConfig::resolve`] validates every field up front and produces a
//! [`ResolvedRun`]; nothing downstream re-validates user input.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::aggregate::{BucketAnchor, BucketWidth};
use crate::distribution::{REFERENCE_DAY_WEIGHTS, REFERENCE_HOUR_WEIGHTS};
use crate::error::{ConfigError, TimeshapeError};
use crate::generator::{ShapeConfig, UniformConfig};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse `YYYY-MM-DD`, optionally followed by a `T` or space separated time.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, ConfigError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(NaiveDateTime::new(date, NaiveTime::MIN));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| ConfigError::MalformedDate(s.to_string()))
}

/// Raw run parameters. Missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of events to generate
    pub events: u64,

    pub start: String,

    /// Window end date; defaults depend on the event source
    pub end: Option<String>,

    pub weeks: i64,

    /// Bucket width specifier, e.g. "1H" or "30min"
    pub group: String,

    pub seed: Option<u64>,

    pub day_weights: Option<Vec<f64>>,

    pub hour_weights: Option<Vec<f64>>,

    pub anchor: BucketAnchor,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            events: 5000,
            start: "2023-01-01".to_string(),
            end: None,
            weeks: 4,
            group: "1H".to_string(),
            seed: None,
            day_weights: None,
            hour_weights: None,
            anchor: BucketAnchor::RangeStart,
        }
    }
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self, TimeshapeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate everything. `fallback_seed` is used when no seed was given.
    pub fn resolve(&self, fallback_seed: u64) -> Result<ResolvedRun, ConfigError> {
        if self.weeks <= 0 {
            return Err(ConfigError::NonPositiveWeeks(self.weeks));
        }
        let weeks = u32::try_from(self.weeks).map_err(|_| ConfigError::InvalidRange {
            field: "weeks",
            start: "1".to_string(),
            end: self.weeks.to_string(),
        })?;

        let start = parse_datetime(&self.start)?;
        let end = self.end.as_deref().map(parse_datetime).transpose()?;
        let width: BucketWidth = self.group.parse()?;

        Ok(ResolvedRun {
            events: self.events,
            start,
            end,
            weeks,
            width,
            seed: self.seed.unwrap_or(fallback_seed),
            day_weights: self
                .day_weights
                .clone()
                .unwrap_or_else(|| REFERENCE_DAY_WEIGHTS.to_vec()),
            hour_weights: self
                .hour_weights
                .clone()
                .unwrap_or_else(|| REFERENCE_HOUR_WEIGHTS.to_vec()),
            anchor: self.anchor,
        })
    }
}

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub events: u64,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub weeks: u32,
    pub width: BucketWidth,
    pub seed: u64,
    pub day_weights: Vec<f64>,
    pub hour_weights: Vec<f64>,
    pub anchor: BucketAnchor,
}

impl ResolvedRun {
    pub fn shape_config(&self) -> ShapeConfig {
        ShapeConfig {
            start: self.start.date(),
            weeks: self.weeks,
            total_events: self.events,
            day_weights: self.day_weights.clone(),
            hour_weights: self.hour_weights.clone(),
            seed: self.seed,
        }
    }

    /// Uniform config over `[start, end)`; `end` is required here.
    pub fn uniform_config(&self) -> Result<UniformConfig, ConfigError> {
        let end = self.end.ok_or(ConfigError::MissingParameter("end"))?;
        Ok(UniformConfig {
            start: self.start,
            end,
            count: self.events,
            seed: self.seed,
        })
    }
}
