//! Core types for the notical service.
//!
//! This crate provides everything below the HTTP layer:
//! - `Event` and the upcoming-event ordering logic
//! - `ics` module for parsing/generating the shared calendar document
//! - `CalendarStore` for whole-file load/save of that document
//! - timestamp normalization into the configured timezone

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod store;
pub mod time;

// Re-export the types the server works with at crate root for convenience
pub use config::NoticalConfig;
pub use error::{NoticalError, NoticalResult};
pub use event::{Event, Reminder};
pub use store::CalendarStore;
