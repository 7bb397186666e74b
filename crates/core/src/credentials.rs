//! Upstream API credential handling.
//!
//! There is no ambient key state anywhere in the workspace: callers resolve
//! a [`Credential`] once (explicit per-request key, falling back to the
//! process-level default) and pass it into the client constructor.

use crate::error::CoreError;

/// A validated, non-blank upstream API key.
///
/// `Debug` prints only a masked hint so credentials never leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key, rejecting blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key.trim().to_string()))
        }
    }

    /// Resolve the effective credential: the explicit per-request key wins,
    /// then the process-level default.
    pub fn resolve(explicit: Option<&str>, fallback: Option<&str>) -> Result<Self, CoreError> {
        explicit
            .and_then(Credential::new)
            .or_else(|| fallback.and_then(Credential::new))
            .ok_or_else(|| CoreError::Auth("API key is required".to_string()))
    }

    /// The raw key, for request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked form showing only the last four characters, for logging.
    pub fn hint(&self) -> String {
        if self.0.len() >= 4 {
            format!("...{}", &self.0[self.0.len() - 4..])
        } else {
            "****".to_string()
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({})", self.hint())
    }
}
