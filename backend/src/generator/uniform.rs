//! Uniform event generation over a date range.
//!
//! Timestamps are spread uniformly over `[start, end)` at microsecond
//! resolution with no day or hour shaping. Used as the baseline against
//! which shaped runs are compared.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::EventSource;
use crate::error::ConfigError;
use crate::models::{Colour, Event, Size};
use crate::rng::RngManager;

/// Parameters for a uniform run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformConfig {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub count: u64,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct UniformEventGenerator {
    start: NaiveDateTime,
    span_micros: u64,
    count: u64,
    seed: u64,
}

impl UniformEventGenerator {
    pub fn new(config: UniformConfig) -> Result<Self, ConfigError> {
        let span_micros = (config.end - config.start)
            .num_microseconds()
            .filter(|&us| us > 0)
            .ok_or_else(|| ConfigError::InvalidRange {
                field: "uniform",
                start: config.start.to_string(),
                end: config.end.to_string(),
            })?;

        Ok(Self {
            start: config.start,
            span_micros: span_micros as u64,
            count: config.count,
            seed: config.seed,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + TimeDelta::microseconds(self.span_micros as i64)
    }

    pub fn events(&self) -> UniformEvents<'_> {
        UniformEvents {
            generator: self,
            rng: RngManager::new(self.seed),
            emitted: 0,
        }
    }
}

impl EventSource for UniformEventGenerator {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn events(&self) -> Box<dyn Iterator<Item = Event> + '_> {
        Box::new(UniformEventGenerator::events(self))
    }
}

/// Lazy pass over a uniform run. Output is unsorted.
#[derive(Debug, Clone)]
pub struct UniformEvents<'a> {
    generator: &'a UniformEventGenerator,
    rng: RngManager,
    emitted: u64,
}

impl Iterator for UniformEvents<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let g = self.generator;
        if self.emitted >= g.count {
            return None;
        }
        self.emitted += 1;

        let offset = self.rng.below(g.span_micros) as i64;
        let colour = *self.rng.pick(&Colour::SCATTER_PALETTE);
        let size = *self.rng.pick(&Size::ALL);
        Some(Event::new(
            g.start + TimeDelta::microseconds(offset),
            colour,
            size,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.generator.count - self.emitted) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for UniformEvents<'_> {}
