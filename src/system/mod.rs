//! System-level modules
//!
//! Logging initialization and other process-level plumbing.

pub mod logging;
