//! Lifecycle events emitted while a generation job runs.
//!
//! Produced by the runner and broadcast via [`tokio::sync::broadcast`];
//! call `GenerationRunner::subscribe` to receive them. Lagging receivers
//! miss events rather than blocking the runner (broadcast semantics).

use serde::Serialize;

/// One step in a generation job's lifecycle.
#[derive(Debug, Clone, Serialize)]
pub enum GenerationEvent {
    /// The provider accepted the job.
    Submitted { job_id: String },

    /// A non-terminal poll completed.
    Progress {
        attempt: u32,
        max_attempts: u32,
        /// Rounded completion percentage when the provider reported a
        /// progress fraction.
        percent: Option<u8>,
    },

    /// The finished asset is being downloaded from its delivery URL.
    Downloading { url: String },

    /// The materialized image is being persisted.
    Saving { image_id: String },

    /// Terminal success; the image is stored and listable.
    Completed { image_id: String },

    /// Terminal failure (errored, failed, moderated, or timed out).
    Failed { error: String },
}
