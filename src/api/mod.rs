//! HTTP API
//!
//! Thin actix-web wrappers over the service layer. Handlers hop onto the
//! blocking pool for store-facing work and translate service errors into
//! the unified response envelope.

pub mod constants;
pub mod services;

pub use services::{api_routes, health_routes, AppStartTime};
