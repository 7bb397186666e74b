//! HTTP client for the Black Forest Labs FLUX Kontext API.
//!
//! Provides the stateless remote job client (submit, poll, asset download)
//! and typed poll-response parsing with terminal-state classification.
//! Retry policy is deliberately absent here -- it belongs to the
//! orchestrator in `fluxdeck-pipeline`.

pub mod client;
pub mod messages;
