//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Storage access (in-memory today, relational store in the web app)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::{ChapterRepo, MessageRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use repos::{MockChapterRepo, MockMessageRepo};
#[cfg(test)]
pub use testing::MockClockPort;
