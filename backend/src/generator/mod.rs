//! Event generators.
//!
//! Two sources feed the same downstream pipeline:
//!
//! - [`ShapedEventGenerator`]: day-of-week and hour-of-day drawn from weighted
//!   distributions, anchored to Monday-aligned weeks.
//! - [`UniformEventGenerator`]: timestamps uniform over a date range.
//!
//! Both are lazy and restartable: every call to `events()` starts a fresh
//! iterator from the configured seed, so the same config always yields the
//! same sequence.

mod shaped;
mod uniform;

pub use shaped::{align_to_monday, ShapeConfig, ShapedEventGenerator, ShapedEvents};
pub use uniform::{UniformConfig, UniformEventGenerator, UniformEvents};

use crate::models::{Event, EventLog};

/// A seeded, restartable producer of events.
pub trait EventSource {
    /// Short name used in reports ("shaped", "uniform").
    fn name(&self) -> &'static str;

    /// Seed every `events()` call starts from.
    fn seed(&self) -> u64;

    /// Fresh forward-only pass over the events.
    fn events(&self) -> Box<dyn Iterator<Item = Event> + '_>;

    /// Generate everything and sort it into a log.
    fn collect_log(&self) -> EventLog {
        self.events().collect()
    }
}
