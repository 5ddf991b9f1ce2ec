//! Fabula engine library.
//!
//! Serves chapters and their message threads to individual readers, hiding
//! mention-restricted content from anyone not mentioned.
//!
//! ## Structure
//!
//! - `use_cases/` - Reader-facing operations (chapter views, interactions, feeds)
//! - `infrastructure/` - Ports and their adapters (in-memory storage, clock, snapshots)
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
