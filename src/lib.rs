//! HTTP layer for notical.
//!
//! Exposed as a library so integration tests can drive the router in-process
//! with a scripted extractor.

pub mod extract;
pub mod routes;
pub mod singleton;
pub mod state;
