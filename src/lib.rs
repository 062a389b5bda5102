//! Votelinker - publish widget-design previews, collect ranked votes
//!
//! This library provides the core functionality for the Votelinker service:
//! it publishes per-client chat-widget design previews into an external
//! workspace/record store and collects ranked ballots through stable
//! slug-based vote links.
//!
//! # Architecture
//! - `store`: typed record store access (HTTP backend + in-memory backend)
//! - `services`: slug resolution, vote reading, publish/upsert, ballots,
//!   community tally, screenshot/favicon/example collaborators
//! - `api`: HTTP services and response envelope
//! - `config`: environment-backed configuration
//! - `system`: logging and process-level plumbing
//! - `labels`: localized table labels and the offered design variants

pub mod api;
pub mod config;
pub mod errors;
pub mod labels;
pub mod services;
pub mod store;
pub mod system;
pub mod utils;
