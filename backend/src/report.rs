//! Renderer-facing output.
//!
//! A [`Report`] is the per-window bucket series plus enough metadata
//! (source, seed, width) to replay the run. [`canonical_digest`] hashes any
//! serializable output so two runs can be compared byte for byte.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::aggregate::{BucketAnchor, BucketWidth};
use crate::error::{ConfigError, TimeshapeError};
use crate::generator::EventSource;
use crate::window::{slice_and_aggregate_anchored, WindowSeries};

/// `(bucket start, count)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketPoint {
    pub start: NaiveDateTime,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowReport {
    pub index: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
    pub event_count: u64,
    pub buckets: Vec<BucketPoint>,
}

impl From<WindowSeries> for WindowReport {
    fn from(series: WindowSeries) -> Self {
        Self {
            index: series.index,
            start: series.start,
            end: series.end,
            label: series.label(),
            event_count: series.event_count,
            buckets: series
                .buckets
                .into_iter()
                .map(|b| BucketPoint {
                    start: b.start,
                    count: b.count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub source: String,
    pub seed: u64,
    pub width: BucketWidth,
    pub anchor: BucketAnchor,
    pub total_events: u64,
    pub windows: Vec<WindowReport>,
}

impl Report {
    /// Generate from `source`, then slice and aggregate `weeks` windows
    /// ending at `end`.
    pub fn generate(
        source: &dyn EventSource,
        end: NaiveDateTime,
        weeks: u32,
        width: BucketWidth,
        anchor: BucketAnchor,
    ) -> Result<Self, ConfigError> {
        let log = source.collect_log();
        let series = slice_and_aggregate_anchored(&log, end, weeks, width, anchor)?;
        Ok(Self {
            source: source.name().to_string(),
            seed: source.seed(),
            width,
            anchor,
            total_events: log.len() as u64,
            windows: series.into_iter().map(WindowReport::from).collect(),
        })
    }

    pub fn to_json(&self) -> Result<String, TimeshapeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 of the canonical JSON form
    pub fn digest(&self) -> Result<String, TimeshapeError> {
        canonical_digest(self)
    }
}

/// Hex SHA-256 of `value` serialized as JSON with object keys sorted.
///
/// Going through `Value` sorts keys because `serde_json::Map` is a
/// `BTreeMap` without the `preserve_order` feature.
pub fn canonical_digest<T: Serialize>(value: &T) -> Result<String, TimeshapeError> {
    let json = serde_json::to_string(&serde_json::to_value(value)?)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{ShapeConfig, ShapedEventGenerator};
    use chrono::NaiveDate;

    fn generator(seed: u64) -> ShapedEventGenerator {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        ShapedEventGenerator::new(ShapeConfig::with_reference_weights(start, 2, 200, seed)).unwrap()
    }

    #[test]
    fn test_report_counts_every_event() {
        let g = generator(1);
        let report = Report::generate(
            &g,
            g.end(),
            2,
            BucketWidth::hours(1).unwrap(),
            BucketAnchor::RangeStart,
        )
        .unwrap();

        assert_eq!(report.source, "shaped");
        assert_eq!(report.total_events, 200);
        let counted: u64 = report
            .windows
            .iter()
            .flat_map(|w| &w.buckets)
            .map(|b| b.count)
            .sum();
        assert_eq!(counted, 200);
    }

    #[test]
    fn test_digest_stable_and_seed_sensitive() {
        let width = BucketWidth::hours(1).unwrap();
        let build = |seed| {
            let g = generator(seed);
            Report::generate(&g, g.end(), 2, width, BucketAnchor::RangeStart).unwrap()
        };

        assert_eq!(build(5).digest().unwrap(), build(5).digest().unwrap());
        assert_ne!(build(5).digest().unwrap(), build(6).digest().unwrap());
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = canonical_digest(&vec![1, 2, 3]).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_ignores_field_order() {
        #[derive(Serialize)]
        struct Forward {
            alpha: u32,
            beta: &'static str,
        }
        #[derive(Serialize)]
        struct Reversed {
            beta: &'static str,
            alpha: u32,
        }

        let forward = canonical_digest(&Forward { alpha: 1, beta: "x" }).unwrap();
        let reversed = canonical_digest(&Reversed { beta: "x", alpha: 1 }).unwrap();
        assert_eq!(forward, reversed);
    }
}
