//! Core domain types for the fluxdeck generation platform.
//!
//! Everything here is transport-agnostic: the generation request/response
//! model, the shared [`error::CoreError`] taxonomy, credential handling,
//! and the moderation guidance tables. Crates higher in the stack (client,
//! storage, pipeline, api) all build on these types.

pub mod credentials;
pub mod error;
pub mod image;
pub mod moderation;
pub mod request;
pub mod types;
