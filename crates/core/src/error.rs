//! Shared error taxonomy.
//!
//! Transport-level poll failures are absorbed and retried by the generation
//! runner up to its attempt budget; every other failure propagates to the
//! caller as a single human-readable message. Storage failures degrade
//! (durable -> ephemeral) inside the persistence router and only surface
//! here when both tiers fail.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Bad caller input (400-equivalent).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid upstream credential.
    #[error("{0}")]
    Auth(String),

    /// Non-2xx response from the generation provider, status preserved.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Failed to download a generated asset. Status 0 means the request
    /// never reached the remote host.
    #[error("Image download failed ({status}): {message}")]
    Download { status: u16, message: String },

    /// An actual I/O failure in both storage tiers (not a not-found).
    #[error("Storage error: {0}")]
    Storage(String),

    /// The provider reported the job itself failed (terminal `failed` or
    /// `Task not found` status); carries the provider's error text.
    #[error("{0}")]
    Generation(String),

    /// The provider rejected the request via content moderation.
    #[error("Request was moderated: {}. Please try a different prompt that doesn't include copyrighted material or inappropriate content.", .reasons.join(", "))]
    Moderation { reasons: Vec<String> },

    /// A request or poll loop exceeded its deadline or attempt budget.
    #[error("{0}")]
    Timeout(String),

    /// Another generation is already in flight for this runner.
    #[error("{0}")]
    Conflict(String),

    /// The caller cancelled the operation via its cancellation handle.
    #[error("Generation cancelled")]
    Cancelled,

    /// Unexpected internal failure. The message is logged, never shown raw.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether a poll-loop failure may be swallowed and retried.
    ///
    /// Only transport-shaped failures qualify; auth and validation errors
    /// will not heal by retrying.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoreError::Timeout(_) | CoreError::Upstream { .. } | CoreError::Download { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moderation_message_lists_reasons() {
        let err = CoreError::Moderation {
            reasons: vec!["Derivative Works Filter".into(), "NSFW Filter".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Derivative Works Filter, NSFW Filter"));
        assert!(msg.starts_with("Request was moderated"));
    }

    #[test]
    fn upstream_message_preserves_status() {
        let err = CoreError::Upstream {
            status: 503,
            message: "service unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "Upstream error (503): service unavailable"
        );
    }

    #[test]
    fn transient_classification() {
        assert!(CoreError::Timeout("t".into()).is_transient());
        assert!(CoreError::Upstream {
            status: 500,
            message: "x".into()
        }
        .is_transient());
        assert!(!CoreError::Auth("no key".into()).is_transient());
        assert!(!CoreError::Validation("bad".into()).is_transient());
        assert!(!CoreError::Cancelled.is_transient());
    }
}
