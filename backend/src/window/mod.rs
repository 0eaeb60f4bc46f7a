//! Week-long windows stepping backward from an end date.
//!
//! `Window[w]` covers `(end - (w+1) weeks, end - w weeks]`. Window 0 is the
//! most recent and windows are returned most-recent-first. Consecutive
//! windows share a boundary instant that belongs to the later one only, so
//! together they partition `(end - weeks, end]` with no gap or overlap.

use chrono::{NaiveDateTime, TimeDelta};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::{aggregate_anchored, BucketAnchor, BucketWidth, TimeBucket};
use crate::error::ConfigError;
use crate::models::{Event, EventLog};

/// One week of the log. `events` borrows a sorted subslice of the log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window<'a> {
    /// Weeks back from the end date (0 = most recent)
    pub index: u32,
    /// Exclusive lower bound
    pub start: NaiveDateTime,
    /// Inclusive upper bound
    pub end: NaiveDateTime,
    pub events: &'a [Event],
}

impl Window<'_> {
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start < t && t <= self.end
    }

    pub fn label(&self) -> String {
        window_label(self.start, self.end)
    }

    /// Aggregate this window's events over `[start, end]`
    pub fn aggregate(
        &self,
        width: BucketWidth,
        anchor: BucketAnchor,
    ) -> Result<WindowSeries, ConfigError> {
        let buckets = aggregate_anchored(
            self.events.iter().map(|e| e.timestamp),
            width,
            self.start,
            self.end,
            anchor,
        )?;
        Ok(WindowSeries {
            index: self.index,
            start: self.start,
            end: self.end,
            event_count: self.events.len() as u64,
            buckets,
        })
    }
}

/// Bucketed counts for one window, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSeries {
    pub index: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub event_count: u64,
    pub buckets: Vec<TimeBucket>,
}

impl WindowSeries {
    pub fn label(&self) -> String {
        window_label(self.start, self.end)
    }
}

fn window_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!("From {} to {}", start, end)
}

/// `(start, end)` bounds of `weeks` windows ending at `end`, most recent first.
pub fn window_bounds(
    end: NaiveDateTime,
    weeks: u32,
) -> Result<Vec<(NaiveDateTime, NaiveDateTime)>, ConfigError> {
    if weeks == 0 {
        return Err(ConfigError::NonPositiveWeeks(0));
    }

    let back = |w: u32| {
        end.checked_sub_signed(TimeDelta::weeks(w as i64))
            .ok_or_else(|| ConfigError::InvalidRange {
                field: "window",
                start: format!("{} - {} weeks", end, w),
                end: end.to_string(),
            })
    };

    (0..weeks)
        .map(|w| -> Result<_, ConfigError> { Ok((back(w + 1)?, back(w)?)) })
        .collect()
}

/// Split the log into `weeks` windows ending at `end`.
pub fn slice(log: &EventLog, end: NaiveDateTime, weeks: u32) -> Result<Vec<Window<'_>>, ConfigError> {
    let bounds = window_bounds(end, weeks)?;
    Ok(bounds
        .into_iter()
        .zip(0..)
        .map(|((start, end), index)| Window {
            index,
            start,
            end,
            events: log.between(start, end),
        })
        .collect())
}

/// Slice the log and aggregate every window with `width`, buckets anchored
/// at each window's start.
pub fn slice_and_aggregate(
    log: &EventLog,
    end: NaiveDateTime,
    weeks: u32,
    width: BucketWidth,
) -> Result<Vec<WindowSeries>, ConfigError> {
    slice_and_aggregate_anchored(log, end, weeks, width, BucketAnchor::RangeStart)
}

/// Windows are independent read-only views, so they are aggregated on the
/// rayon pool; the result keeps window order.
pub fn slice_and_aggregate_anchored(
    log: &EventLog,
    end: NaiveDateTime,
    weeks: u32,
    width: BucketWidth,
    anchor: BucketAnchor,
) -> Result<Vec<WindowSeries>, ConfigError> {
    let windows = slice(log, end, weeks)?;
    for window in &windows {
        info!(
            events = window.events.len(),
            "window {}: {} to {}", window.index, window.start, window.end
        );
    }

    windows.par_iter().map(|w| w.aggregate(width, anchor)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Colour, Size};
    use chrono::NaiveDate;

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn log_of(times: &[NaiveDateTime]) -> EventLog {
        times
            .iter()
            .map(|&t| Event::new(t, Colour::Green, Size::Small))
            .collect()
    }

    #[test]
    fn test_zero_weeks_rejected() {
        assert_eq!(
            slice(&EventLog::new(), at(1, 29), 0).unwrap_err(),
            ConfigError::NonPositiveWeeks(0)
        );
    }

    #[test]
    fn test_bounds_step_backwards() {
        let bounds = window_bounds(at(1, 29), 3).unwrap();
        assert_eq!(bounds[0], (at(1, 22), at(1, 29)));
        assert_eq!(bounds[1], (at(1, 15), at(1, 22)));
        assert_eq!(bounds[2], (at(1, 8), at(1, 15)));
    }

    #[test]
    fn test_boundary_event_belongs_to_later_window() {
        let log = log_of(&[at(1, 22)]);
        let windows = slice(&log, at(1, 29), 2).unwrap();
        assert!(windows[0].events.is_empty());
        assert_eq!(windows[1].events.len(), 1);
    }

    #[test]
    fn test_end_instant_included() {
        let log = log_of(&[at(1, 29)]);
        let windows = slice(&log, at(1, 29), 1).unwrap();
        assert_eq!(windows[0].events.len(), 1);
        assert!(windows[0].contains(at(1, 29)));
        assert!(!windows[0].contains(at(1, 22)));
    }

    #[test]
    fn test_empty_window_still_has_buckets() {
        let series = slice_and_aggregate(&EventLog::new(), at(1, 29), 2, BucketWidth::days(1).unwrap())
            .unwrap();
        assert_eq!(series.len(), 2);
        for s in series {
            assert_eq!(s.buckets.len(), 7);
            assert_eq!(s.event_count, 0);
        }
    }

    #[test]
    fn test_label() {
        let log = EventLog::new();
        let windows = slice(&log, at(1, 29), 1).unwrap();
        assert_eq!(
            windows[0].label(),
            "From 2023-01-22 12:00:00 to 2023-01-29 12:00:00"
        );
    }
}
