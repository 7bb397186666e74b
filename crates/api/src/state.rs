use std::sync::Arc;

use fluxdeck_bfl::client::FluxClient;
use fluxdeck_core::credentials::Credential;
use fluxdeck_core::error::CoreError;
use fluxdeck_pipeline::runner::GenerationRunner;
use fluxdeck_storage::router::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, including the process-level default API key.
    pub config: Arc<ServerConfig>,
    /// Shared upstream connection pool (redirects already capped).
    pub http: reqwest::Client,
    /// Two-tier persistence router -- the sole writer of image records.
    pub store: Arc<ImageStore>,
    /// Single-job generation orchestrator for the one-shot endpoint.
    pub runner: Arc<GenerationRunner>,
}

impl AppState {
    /// Resolve the effective credential for a request: the explicit
    /// `apiKey` field wins, then the configured default.
    pub fn resolve_credential(&self, explicit: Option<&str>) -> Result<Credential, CoreError> {
        Credential::resolve(explicit, self.config.bfl_api_key.as_deref())
    }

    /// Build a [`FluxClient`] over the shared pool for one request.
    pub fn flux_client(&self, credential: Option<Credential>) -> FluxClient {
        FluxClient::with_client(
            self.http.clone(),
            self.config.bfl_api_base.as_str(),
            credential,
        )
    }
}
