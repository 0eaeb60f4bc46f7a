//! Time-bucket aggregation.
//!
//! The bucket sequence is enumerated from the range and width first, then
//! counts are accumulated into it. Every bucket between the range bounds is
//! present exactly once, including buckets no event landed in.
//!
//! # Membership
//!
//! An event at `t` belongs to the bucket with `start <= t < end`. The final
//! bucket also takes `t == range_end`, so every event in
//! `[range_start, range_end]` is counted exactly once.

mod grid;
mod width;

pub use grid::{DayHourGrid, DAY_NAMES};
pub use width::{BucketWidth, TimeUnit};

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ConfigError;

/// Where bucket boundaries are anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketAnchor {
    /// Boundaries at `range_start + k * width`
    #[default]
    RangeStart,

    /// Boundaries at `1970-01-05T00:00 + k * width` (a Monday midnight), so
    /// buckets of the same width line up across runs with different ranges
    Calendar,
}

/// One counted interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub count: u64,
}

/// Count timestamps into buckets anchored at `range_start`.
///
/// ```
/// use chrono::NaiveDate;
/// use timeshape_core::aggregate::{aggregate, BucketWidth};
///
/// let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let start = day.and_hms_opt(0, 0, 0).unwrap();
/// let end = day.and_hms_opt(3, 0, 0).unwrap();
///
/// let buckets = aggregate(std::iter::empty(), BucketWidth::hours(1).unwrap(), start, end).unwrap();
/// assert_eq!(buckets.len(), 3);
/// assert!(buckets.iter().all(|b| b.count == 0));
/// ```
pub fn aggregate<I>(
    timestamps: I,
    width: BucketWidth,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> Result<Vec<TimeBucket>, ConfigError>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    aggregate_anchored(
        timestamps,
        width,
        range_start,
        range_end,
        BucketAnchor::RangeStart,
    )
}

/// Count timestamps into buckets with an explicit anchor.
///
/// Runs in one pass over the timestamps plus one over the buckets; input
/// order does not matter.
pub fn aggregate_anchored<I>(
    timestamps: I,
    width: BucketWidth,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    anchor: BucketAnchor,
) -> Result<Vec<TimeBucket>, ConfigError>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let invalid = || ConfigError::InvalidRange {
        field: "aggregation",
        start: range_start.to_string(),
        end: range_end.to_string(),
    };
    if range_end < range_start {
        return Err(invalid());
    }

    let width_us = width.as_micros();
    let first_start = match anchor {
        BucketAnchor::RangeStart => range_start,
        BucketAnchor::Calendar => {
            let offset_us = micros_between(calendar_origin(), range_start).ok_or_else(invalid)?;
            let floored_us = offset_us
                .div_euclid(width_us)
                .checked_mul(width_us)
                .ok_or_else(invalid)?;
            calendar_origin()
                .checked_add_signed(TimeDelta::microseconds(floored_us))
                .ok_or_else(invalid)?
        }
    };

    let span_us = micros_between(first_start, range_end).ok_or_else(invalid)?;
    let count = if span_us == 0 {
        1
    } else {
        span_us / width_us + i64::from(span_us % width_us != 0)
    };
    let count = count as u64;
    if count > MAX_BUCKETS {
        return Err(ConfigError::TooManyBuckets {
            count,
            limit: MAX_BUCKETS,
        });
    }
    let bucket_count = count as usize;
    trace!(bucket_count, %width, %range_start, %range_end, "enumerating buckets");

    let step = width.duration();
    let mut buckets: Vec<TimeBucket> = Vec::with_capacity(bucket_count);
    let mut start = first_start;
    for _ in 0..bucket_count {
        let end = start.checked_add_signed(step).ok_or_else(invalid)?;
        buckets.push(TimeBucket {
            start,
            end,
            count: 0,
        });
        start = end;
    }

    for t in timestamps {
        if t < range_start || t > range_end {
            continue;
        }
        let Some(offset_us) = micros_between(first_start, t) else {
            continue;
        };
        let idx = ((offset_us / width_us) as usize).min(bucket_count - 1);
        buckets[idx].count += 1;
    }

    Ok(buckets)
}

/// Upper bound on the buckets one aggregation may enumerate (a year of
/// one-minute buckets fits).
pub const MAX_BUCKETS: u64 = 1 << 20;

/// Sum of all bucket counts.
pub fn total_count(buckets: &[TimeBucket]) -> u64 {
    buckets.iter().map(|b| b.count).sum()
}

/// Monday 1970-01-05 00:00
fn calendar_origin() -> NaiveDateTime {
    NaiveDateTime::default() + TimeDelta::days(4)
}

fn micros_between(from: NaiveDateTime, to: NaiveDateTime) -> Option<i64> {
    (to - from).num_microseconds()
}
