//! Shaped event generation.
//!
//! Each event's day-of-week and hour-of-day come from weighted distributions;
//! minute, second and microsecond are uniform. Weeks always start on a Monday.
//!
//! # Truncation
//!
//! Every week gets `total_events / weeks` events (integer division). A
//! remainder is dropped, not spread over the weeks, so the sequence can be
//! shorter than `total_events`.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::EventSource;
use crate::distribution::{
    WeightedDistribution, DAYS_PER_WEEK, REFERENCE_DAY_WEIGHTS, REFERENCE_HOUR_WEIGHTS,
};
use crate::error::ConfigError;
use crate::models::{Colour, Event, Size};
use crate::rng::RngManager;

const MINUTES_PER_HOUR: u64 = 60;
const SECONDS_PER_MINUTE: u64 = 60;
const MICROS_PER_SECOND: u64 = 1_000_000;

/// Parameters for a shaped run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Any date; generation starts on the first Monday on or after it
    pub start: NaiveDate,

    /// Number of weeks to generate
    pub weeks: u32,

    /// Total event budget, split evenly across weeks
    pub total_events: u64,

    /// Day-of-week weights, Monday first (7 entries)
    pub day_weights: Vec<f64>,

    /// Hour-of-day weights, midnight first (24 entries)
    pub hour_weights: Vec<f64>,

    pub seed: u64,
}

impl ShapeConfig {
    /// Config using the reference day and hour weights.
    pub fn with_reference_weights(start: NaiveDate, weeks: u32, total_events: u64, seed: u64) -> Self {
        Self {
            start,
            weeks,
            total_events,
            day_weights: REFERENCE_DAY_WEIGHTS.to_vec(),
            hour_weights: REFERENCE_HOUR_WEIGHTS.to_vec(),
            seed,
        }
    }
}

/// First Monday on or after `date`. `None` only at the end of the calendar.
///
/// ```
/// use chrono::{Datelike, NaiveDate, Weekday};
/// use timeshape_core::generator::align_to_monday;
///
/// let sunday = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let aligned = align_to_monday(sunday).unwrap();
/// assert_eq!(aligned, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
/// assert_eq!(aligned.weekday(), Weekday::Mon);
/// ```
pub fn align_to_monday(date: NaiveDate) -> Option<NaiveDate> {
    let weekday = date.weekday().num_days_from_monday() as u64;
    let offset = (DAYS_PER_WEEK as u64 - weekday) % DAYS_PER_WEEK as u64;
    date.checked_add_days(Days::new(offset))
}

/// Validated shaped generator.
#[derive(Debug, Clone)]
pub struct ShapedEventGenerator {
    aligned_start: NaiveDate,
    weeks: u32,
    per_week: u64,
    days: WeightedDistribution,
    hours: WeightedDistribution,
    seed: u64,
}

impl ShapedEventGenerator {
    /// Validate the config. Nothing is sampled here.
    pub fn new(config: ShapeConfig) -> Result<Self, ConfigError> {
        if config.weeks == 0 {
            return Err(ConfigError::NonPositiveWeeks(0));
        }

        let days = WeightedDistribution::day_of_week(&config.day_weights)?;
        let hours = WeightedDistribution::hour_of_day(&config.hour_weights)?;

        let out_of_range = || ConfigError::InvalidRange {
            field: "start",
            start: config.start.to_string(),
            end: format!("+{} weeks", config.weeks),
        };
        let aligned_start = align_to_monday(config.start).ok_or_else(out_of_range)?;
        aligned_start
            .checked_add_days(Days::new(config.weeks as u64 * DAYS_PER_WEEK as u64))
            .ok_or_else(out_of_range)?;

        debug!(
            "Start date {} is a {} (i.e. number {})",
            config.start,
            config.start.weekday(),
            config.start.weekday().num_days_from_monday()
        );
        debug!("Start date is now {} ({})", aligned_start, aligned_start.weekday());

        let weeks = config.weeks as u64;
        let per_week = config.total_events / weeks;
        let remainder = config.total_events % weeks;
        if per_week == 0 {
            warn!(
                total_events = config.total_events,
                weeks, "fewer events than weeks; every week will be empty"
            );
        } else if remainder > 0 {
            warn!(
                dropped = remainder,
                per_week, "event count does not divide evenly by weeks; dropping remainder"
            );
        }

        Ok(Self {
            aligned_start,
            weeks: config.weeks,
            per_week,
            days,
            hours,
            seed: config.seed,
        })
    }

    /// Monday the first generated week starts on
    pub fn aligned_start(&self) -> NaiveDate {
        self.aligned_start
    }

    /// Midnight after the last generated day
    pub fn end(&self) -> NaiveDateTime {
        let days = self.weeks as u64 * DAYS_PER_WEEK as u64;
        NaiveDateTime::new(self.aligned_start + Days::new(days), NaiveTime::MIN)
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    pub fn events_per_week(&self) -> u64 {
        self.per_week
    }

    /// `weeks * floor(total_events / weeks)`
    pub fn total_len(&self) -> u64 {
        self.weeks as u64 * self.per_week
    }

    /// Start a fresh pass from the configured seed
    pub fn events(&self) -> ShapedEvents<'_> {
        ShapedEvents {
            generator: self,
            rng: RngManager::new(self.seed),
            week: 0,
            in_week: 0,
        }
    }
}

impl EventSource for ShapedEventGenerator {
    fn name(&self) -> &'static str {
        "shaped"
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn events(&self) -> Box<dyn Iterator<Item = Event> + '_> {
        Box::new(ShapedEventGenerator::events(self))
    }
}

/// Lazy pass over a shaped run, in generation (not timestamp) order.
#[derive(Debug, Clone)]
pub struct ShapedEvents<'a> {
    generator: &'a ShapedEventGenerator,
    rng: RngManager,
    week: u64,
    in_week: u64,
}

impl ShapedEvents<'_> {
    fn remaining(&self) -> u64 {
        let g = self.generator;
        if g.per_week == 0 || self.week >= g.weeks as u64 {
            return 0;
        }
        (g.weeks as u64 - self.week) * g.per_week - self.in_week
    }
}

impl Iterator for ShapedEvents<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let g = self.generator;
        if self.remaining() == 0 {
            return None;
        }
        if self.in_week == 0 {
            debug!("Generating week {}", self.week);
        }

        let day = g.days.sample(&mut self.rng) as u64;
        let hour = g.hours.sample(&mut self.rng) as i64;
        let minute = self.rng.below(MINUTES_PER_HOUR) as i64;
        let second = self.rng.below(SECONDS_PER_MINUTE) as i64;
        let micros = self.rng.below(MICROS_PER_SECOND) as i64;
        let colour = *self.rng.pick(&Colour::SHAPED_PALETTE);
        let size = *self.rng.pick(&Size::ALL);

        // Bounded by the range check in ShapedEventGenerator::new
        let date = g.aligned_start + Days::new(self.week * DAYS_PER_WEEK as u64 + day);
        let time_of_day = TimeDelta::hours(hour)
            + TimeDelta::minutes(minute)
            + TimeDelta::seconds(second)
            + TimeDelta::microseconds(micros);
        let timestamp = NaiveDateTime::new(date, NaiveTime::MIN) + time_of_day;

        self.in_week += 1;
        if self.in_week == g.per_week {
            self.in_week = 0;
            self.week += 1;
        }

        Some(Event::new(timestamp, colour, size))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ShapedEvents<'_> {}
