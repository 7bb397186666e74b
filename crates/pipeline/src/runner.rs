//! Single-job generation orchestrator.
//!
//! [`GenerationRunner`] owns the whole submit -> poll -> materialize ->
//! persist protocol for one job at a time:
//!
//! - submission failures surface verbatim;
//! - polling runs on a fixed interval with a hard attempt budget (no
//!   exponential backoff -- the provider expects a steady cheap poll);
//! - transient poll failures are swallowed and retried inside the budget;
//! - a [`CancellationToken`] is honored at every await point;
//! - a busy guard rejects a second concurrent generation instead of
//!   relying on caller discipline.
//!
//! Terminal outcomes: a persisted [`GeneratedImage`] on success, or a
//! classified [`CoreError`] (moderated / failed / timed out / errored /
//! cancelled). No image record is ever persisted for a non-ready outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;

use fluxdeck_bfl::client::FluxClient;
use fluxdeck_bfl::messages::{GenerationResult, PollDisposition};
use fluxdeck_core::credentials::Credential;
use fluxdeck_core::error::CoreError;
use fluxdeck_core::image::GeneratedImage;
use fluxdeck_core::request::GenerationRequest;
use fluxdeck_core::types::FluxModel;
use fluxdeck_storage::router::ImageStore;

use crate::events::GenerationEvent;
use crate::materialize::materialize;

/// Broadcast channel capacity for generation events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Tunable parameters for the poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Hard budget of poll attempts before the job is declared timed out.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_millis(2000),
        }
    }
}

/// Orchestrates one generation job at a time against one upstream base URL.
///
/// Cheap to share behind an `Arc`; the busy guard serializes jobs.
pub struct GenerationRunner {
    http: reqwest::Client,
    base_url: String,
    store: Arc<ImageStore>,
    config: PollConfig,
    event_tx: broadcast::Sender<GenerationEvent>,
    /// One-active-job guard; `try_lock` failure means a job is in flight.
    busy: Mutex<()>,
}

impl GenerationRunner {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<ImageStore>,
        config: PollConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http,
            base_url: base_url.into(),
            store,
            config,
            event_tx,
            busy: Mutex::new(()),
        }
    }

    /// Subscribe to lifecycle events for jobs run by this runner.
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.event_tx.subscribe()
    }

    /// Run one generation job to a terminal outcome.
    ///
    /// The credential is passed explicitly per call; there is no ambient
    /// key state. Fails fast with `Conflict` when another job is already
    /// in flight.
    pub async fn run(
        &self,
        credential: Credential,
        model: FluxModel,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GeneratedImage, CoreError> {
        let _guard = self.busy.try_lock().map_err(|_| {
            CoreError::Conflict("A generation is already in progress".to_string())
        })?;

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }

        request.validate()?;
        let client =
            FluxClient::with_client(self.http.clone(), self.base_url.as_str(), Some(credential));

        // Preparing -> Submitted. Failures surface verbatim.
        let submitted = match client.submit(model, &request).await {
            Ok(response) => response,
            Err(e) => {
                let _ = self.event_tx.send(GenerationEvent::Failed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        tracing::info!(job_id = %submitted.id, model = %model, "Generation job submitted");
        let _ = self.event_tx.send(GenerationEvent::Submitted {
            job_id: submitted.id.clone(),
        });

        // Submitted -> Polling -> terminal classification.
        let ready = match self
            .poll_until_terminal(&client, &submitted.polling_url, cancel)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let _ = self.event_tx.send(GenerationEvent::Failed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        // Ready -> materialize -> persist.
        let materialized = materialize(
            &client,
            &submitted.id,
            model,
            &request,
            &ready,
            &self.event_tx,
        )
        .await;

        let _ = self.event_tx.send(GenerationEvent::Saving {
            image_id: materialized.image.id.clone(),
        });

        let url = self
            .store
            .save(&materialized.image, &materialized.payload)
            .await?;

        let mut image = materialized.image;
        image.url = url;

        tracing::info!(image_id = %image.id, url = %image.url, "Generation complete");
        let _ = self.event_tx.send(GenerationEvent::Completed {
            image_id: image.id.clone(),
        });

        Ok(image)
    }

    // ---- private helpers ----

    /// Poll until a terminal classification or the attempt budget runs out.
    ///
    /// Transient failures (timeouts, transport errors, upstream 5xx) are
    /// absorbed and retried on the same fixed cadence; non-transient
    /// failures propagate immediately.
    async fn poll_until_terminal(
        &self,
        client: &FluxClient,
        polling_url: &str,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult, CoreError> {
        for attempt in 1..=self.config.max_attempts {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return Err(CoreError::Cancelled),
                result = client.poll(polling_url) => result,
            };

            match outcome {
                Ok(response) => match response.disposition() {
                    PollDisposition::Ready(result) => {
                        tracing::info!(attempt, "Generation ready");
                        return Ok(result);
                    }
                    PollDisposition::Moderated(reasons) => {
                        tracing::warn!(attempt, ?reasons, "Generation moderated");
                        return Err(CoreError::Moderation { reasons });
                    }
                    PollDisposition::Failed(message) => {
                        tracing::warn!(attempt, error = %message, "Generation failed");
                        return Err(CoreError::Generation(message));
                    }
                    PollDisposition::Pending { progress } => {
                        let percent = progress.map(|p| (p * 100.0).round() as u8);
                        tracing::debug!(
                            attempt,
                            max_attempts = self.config.max_attempts,
                            percent,
                            "Generation pending",
                        );
                        let _ = self.event_tx.send(GenerationEvent::Progress {
                            attempt,
                            max_attempts: self.config.max_attempts,
                            percent,
                        });
                    }
                },
                Err(e) if e.is_transient() => {
                    tracing::warn!(attempt, error = %e, "Transient poll failure, will retry");
                    if attempt == self.config.max_attempts {
                        return Err(CoreError::Timeout(
                            "Polling failed after maximum attempts".to_string(),
                        ));
                    }
                }
                Err(e) => return Err(e),
            }

            // Fixed delay before the next attempt, yielding to the runtime
            // and honoring cancellation.
            tokio::select! {
                _ = cancel.cancelled() => return Err(CoreError::Cancelled),
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        Err(CoreError::Timeout("Generation timed out".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_config_defaults_match_protocol() {
        let config = PollConfig::default();
        assert_eq!(config.max_attempts, 60);
        assert_eq!(config.interval, Duration::from_millis(2000));
    }
}
