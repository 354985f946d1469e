//! Shared utilities for the sesame pipeline.
//!
//! This crate holds the pieces every other crate leans on: epoch/TTL time
//! arithmetic for event timestamps and `tracing` subscriber setup.

pub mod logging;
pub mod time;

pub use time::TimeError;
