//! Domain models for generated events

pub mod event;

// Re-exports
pub use event::{Colour, Event, EventLog, Size};
