//! # tasker-core
//!
//! Shared plumbing for the Tasker crates:
//!
//! - **Logging**: [`logging::init_subscriber`] installs the stderr `tracing` subscriber
//! - **Test capture**: [`logging::capture_logs`] records tracing events in memory for assertions

#![deny(unsafe_code)]

pub mod logging;
