//! Timeshape Core - shaped event generation and time-bucket aggregation
//!
//! Generates synthetic event timestamps whose day-of-week and hour-of-day
//! follow configurable weighted distributions, then slices them into
//! week-long windows and counts them into fixed-width buckets for plotting.
//!
//! # Architecture
//!
//! - **rng**: Deterministic random number generation
//! - **distribution**: Weighted choice over days and hours
//! - **generator**: Shaped and uniform event sources
//! - **models**: Event types and the sorted event log
//! - **aggregate**: Bucket widths, bucket counting, day/hour grids
//! - **window**: Week windows stepping back from an end date
//! - **config**: Run configuration and validation
//! - **report**: Serializable output and digests
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (explicit seeded RNG)
//! 2. Zero-weight categories are never sampled
//! 3. Every bucket in a range is emitted, including empty ones
//! 4. All validation happens before the first random draw

pub mod aggregate;
pub mod config;
pub mod distribution;
pub mod error;
pub mod generator;
pub mod models;
pub mod report;
pub mod rng;
pub mod window;

// Re-exports for convenience
pub use aggregate::{
    aggregate, aggregate_anchored, BucketAnchor, BucketWidth, DayHourGrid, TimeBucket, TimeUnit,
    MAX_BUCKETS,
};
pub use config::{parse_datetime, ResolvedRun, RunConfig};
pub use distribution::{WeightedDistribution, REFERENCE_DAY_WEIGHTS, REFERENCE_HOUR_WEIGHTS};
pub use error::{ConfigError, TimeshapeError};
pub use generator::{
    align_to_monday, EventSource, ShapeConfig, ShapedEventGenerator, UniformConfig,
    UniformEventGenerator,
};
pub use models::{Colour, Event, EventLog, Size};
pub use report::{canonical_digest, Report};
pub use rng::RngManager;
pub use window::{slice, slice_and_aggregate, slice_and_aggregate_anchored, Window, WindowSeries};
