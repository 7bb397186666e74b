//! Generation orchestration: the submit -> poll -> materialize -> persist
//! protocol.
//!
//! [`runner::GenerationRunner`] drives a single job from submission to a
//! terminal outcome, owning the attempt budget, fixed poll interval,
//! transient-failure absorption, cancellation, and the one-active-job
//! guard. [`materialize`] resolves a ready result into bytes (or degrades
//! to a bare reference), and [`events::GenerationEvent`] is the broadcast
//! progress stream consumers can subscribe to.

pub mod events;
pub mod materialize;
pub mod runner;
