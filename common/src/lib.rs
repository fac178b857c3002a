//! Shared building blocks for the graph query service.
//!
//! - `config`: environment-driven configuration
//! - `errors`: error taxonomy and HTTP mapping
//! - `response`: unified response envelope
//! - `middleware`: request id tracing
//! - `models`: graph query parameters and results

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
