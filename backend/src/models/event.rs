//! Generated events and the sorted log that holds them.
//!
//! An [`Event`] is a timestamp plus two opaque tags (colour and size) drawn
//! independently of the timestamp. Renderers use the tags for marker styling;
//! nothing in the core looks at them.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use timeshape_core::models::{Colour, Event, EventLog, Size};
//!
//! let at = |h| NaiveDate::from_ymd_opt(2023, 1, 2).unwrap().and_hms_opt(h, 0, 0).unwrap();
//! let log = EventLog::from_events(vec![
//!     Event::new(at(10), Colour::Red, Size::Small),
//!     Event::new(at(9), Colour::Blue, Size::Large),
//! ]);
//!
//! assert_eq!(log.events()[0].timestamp, at(9));
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Marker colour tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Pink,
    Brown,
    Black,
    White,
    Cyan,
    Magenta,
}

impl Colour {
    /// Ten-colour palette used for shaped (heatmap) runs.
    pub const SHAPED_PALETTE: [Colour; 10] = [
        Colour::Red,
        Colour::Green,
        Colour::Blue,
        Colour::Yellow,
        Colour::Orange,
        Colour::Purple,
        Colour::Pink,
        Colour::Brown,
        Colour::Black,
        Colour::White,
    ];

    /// Six-colour palette used for uniform (scatter) runs.
    pub const SCATTER_PALETTE: [Colour; 6] = [
        Colour::Red,
        Colour::Green,
        Colour::Blue,
        Colour::Cyan,
        Colour::Magenta,
        Colour::Yellow,
    ];
}

/// Marker size tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];
}

/// A single generated event. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub colour: Colour,
    pub size: Size,
}

impl Event {
    pub fn new(timestamp: NaiveDateTime, colour: Colour, size: Size) -> Self {
        Self {
            timestamp,
            colour,
            size,
        }
    }
}

/// Events sorted by timestamp.
///
/// Built once from a generator's output and only read afterwards. Sorting is
/// stable, so events with equal timestamps keep their generation order and
/// downstream output stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Sort `events` by timestamp and take ownership of them
    pub fn from_events(mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in ascending timestamp order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.events.iter().map(|e| e.timestamp)
    }

    /// Earliest and latest timestamp, `None` when empty
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    /// Events with `after < t <= until`, located by binary search.
    pub fn between(&self, after: NaiveDateTime, until: NaiveDateTime) -> &[Event] {
        let lo = self.events.partition_point(|e| e.timestamp <= after);
        let hi = self.events.partition_point(|e| e.timestamp <= until);
        if lo >= hi {
            return &[];
        }
        &self.events[lo..hi]
    }
}

impl From<Vec<Event>> for EventLog {
    fn from(events: Vec<Event>) -> Self {
        Self::from_events(events)
    }
}

impl FromIterator<Event> for EventLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self::from_events(iter.into_iter().collect())
    }
}
