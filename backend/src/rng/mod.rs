//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. Every random draw in the crate goes
//! through an explicit [`RngManager`] passed by `&mut`, so a run is fully
//! determined by its seed.

mod xorshift;

pub use xorshift::RngManager;
