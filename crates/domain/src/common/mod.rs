//! Common utility functions shared across the Fabula crates.
//!
//! Pure functions only: no side effects, no I/O.

pub mod datetime;

pub use datetime::{parse_datetime, parse_stored_timestamp};
