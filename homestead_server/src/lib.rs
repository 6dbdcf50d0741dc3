//! # Homestead server
//! This crate hosts the HTTP server for the Homestead retail operations platform. It is responsible for:
//! * The order, support ticket and invoice endpoints.
//! * Running the order progression worker on its timer, and exposing its controls (start/stop, manual trigger,
//!   runtime settings override) over HTTP.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
pub mod activity_log;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod progression_worker;
pub mod routes;
pub mod server;
pub mod worker_state;

#[cfg(test)]
mod endpoint_tests;
