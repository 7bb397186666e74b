//! REST client for the FLUX Kontext generation endpoints.
//!
//! [`FluxClient`] wraps the three upstream calls (submit, poll, asset
//! download) using [`reqwest`]. Each call carries its own deadline: 30 s
//! for submission and downloads, 10 s for the cheap status poll. The
//! client never retries -- transient-failure policy lives in the
//! orchestrator.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};

use fluxdeck_core::credentials::Credential;
use fluxdeck_core::error::CoreError;
use fluxdeck_core::request::GenerationRequest;
use fluxdeck_core::types::FluxModel;

use crate::messages::{PollResponse, SubmitResponse};

/// Header carrying the upstream API key.
pub const API_KEY_HEADER: &str = "x-key";

/// Deadline for job submission.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for a single status poll -- deliberately short, it is a cheap
/// check issued up to 60 times per job.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for downloading a generated asset.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Redirect hop cap for asset downloads (delivery URLs bounce through CDNs).
pub const MAX_REDIRECTS: usize = 5;

/// Generic browser user-agent sent on asset downloads; some asset hosts
/// reject requests without one.
pub const DOWNLOAD_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Build the standard pooled HTTP client shared across [`FluxClient`]
/// instances: redirects capped at [`MAX_REDIRECTS`], no default timeout
/// (every call sets its own deadline).
pub fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .expect("default reqwest client must build")
}

/// A downloaded asset: raw bytes plus the reported content type.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// HTTP client for one upstream endpoint + credential pair.
///
/// The credential is injected at construction; there is no ambient key
/// state. A client built without a credential can still download assets
/// but fails submit/poll with an auth error.
pub struct FluxClient {
    client: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
}

impl FluxClient {
    /// Create a client with its own connection pool.
    ///
    /// * `base_url` - upstream base, e.g. `https://api.bfl.ai`.
    pub fn new(base_url: impl Into<String>, credential: Option<Credential>) -> Self {
        Self::with_client(default_http_client(), base_url, credential)
    }

    /// Create a client reusing an existing [`reqwest::Client`] (connection
    /// pooling across requests; the shared client must already cap
    /// redirects).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        credential: Option<Credential>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            credential,
        }
    }

    /// Submit a generation job.
    ///
    /// `POST {base}/v1/{model}` with the request body serialized verbatim.
    /// Returns the provider-assigned job id and polling URL.
    pub async fn submit(
        &self,
        model: FluxModel,
        request: &GenerationRequest,
    ) -> Result<SubmitResponse, CoreError> {
        request.validate()?;
        let credential = self.require_credential()?;

        let url = format!("{}/v1/{}", self.base_url, model.as_str());
        tracing::debug!(model = %model, url = %url, key = %credential.hint(), "Submitting generation job");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, credential.expose())
            .json(request)
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await
            .map_err(|e| classify_transport(e, "Generation request"))?;

        parse_response(response).await
    }

    /// Poll a job's status via its polling handle.
    pub async fn poll(&self, polling_url: &str) -> Result<PollResponse, CoreError> {
        if polling_url.trim().is_empty() {
            return Err(CoreError::Validation(
                "Polling URL is required".to_string(),
            ));
        }
        let credential = self.require_credential()?;

        let response = self
            .client
            .get(polling_url)
            .header(API_KEY_HEADER, credential.expose())
            .timeout(POLL_TIMEOUT)
            .send()
            .await
            .map_err(|e| classify_transport(e, "Polling request"))?;

        parse_response(response).await
    }

    /// Download a generated asset from an arbitrary external URL.
    ///
    /// Sends a generic browser user-agent and `Accept: image/*`, follows up
    /// to [`MAX_REDIRECTS`] redirects, and gives up after
    /// [`DOWNLOAD_TIMEOUT`]. No credential is attached -- delivery URLs are
    /// pre-signed.
    pub async fn fetch_asset(&self, url: &str) -> Result<FetchedAsset, CoreError> {
        if url.trim().is_empty() {
            return Err(CoreError::Validation("Image URL is required".to_string()));
        }

        tracing::debug!(url = %url, "Downloading generated asset");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, DOWNLOAD_USER_AGENT)
            .header(ACCEPT, "image/*")
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoreError::Timeout("Image download timed out".to_string())
                } else {
                    CoreError::Download {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            return Err(CoreError::Download {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let bytes = response.bytes().await.map_err(|e| CoreError::Download {
            status: 0,
            message: e.to_string(),
        })?;

        tracing::debug!(size = bytes.len(), content_type = %content_type, "Asset downloaded");

        Ok(FetchedAsset {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    // ---- private helpers ----

    fn require_credential(&self) -> Result<&Credential, CoreError> {
        self.credential
            .as_ref()
            .ok_or_else(|| CoreError::Auth("API key is required".to_string()))
    }
}

/// Map a reqwest transport failure to the shared taxonomy.
fn classify_transport(err: reqwest::Error, what: &str) -> CoreError {
    if err.is_timeout() {
        CoreError::Timeout(format!("{what} timed out"))
    } else {
        CoreError::Upstream {
            status: 0,
            message: err.to_string(),
        }
    }
}

/// Parse a successful JSON response body into the expected type; non-2xx
/// responses become [`CoreError::Upstream`] with status and message
/// preserved.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CoreError> {
    let status = response.status();
    if !status.is_success() {
        let message = read_error_message(response).await;
        return Err(CoreError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    response.json::<T>().await.map_err(|e| CoreError::Upstream {
        status: status.as_u16(),
        message: format!("Malformed upstream response: {e}"),
    })
}

/// Pull a human-readable message out of an error body: the `error` field of
/// a JSON object when present, else the raw body text.
async fn read_error_message(response: reqwest::Response) -> String {
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => json
            .get("error")
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .unwrap_or(body),
        Err(_) => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn submit_without_credential_is_auth_error() {
        let client = FluxClient::new("https://api.bfl.ai", None);
        let request = GenerationRequest::new("a red ball");
        let err = client
            .submit(FluxModel::KontextPro, &request)
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Auth(_));
        assert_eq!(err.to_string(), "API key is required");
    }

    #[tokio::test]
    async fn submit_validates_before_sending() {
        let client = FluxClient::new(
            "https://api.bfl.ai",
            Credential::new("test-key"),
        );
        let request = GenerationRequest::new("   ");
        let err = client
            .submit(FluxModel::KontextPro, &request)
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[tokio::test]
    async fn poll_rejects_empty_polling_url() {
        let client = FluxClient::new(
            "https://api.bfl.ai",
            Credential::new("test-key"),
        );
        let err = client.poll("  ").await.unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(err.to_string(), "Polling URL is required");
    }

    #[tokio::test]
    async fn fetch_asset_rejects_empty_url() {
        let client = FluxClient::new("https://api.bfl.ai", None);
        let err = client.fetch_asset("").await.unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn base_url_trailing_slash_normalized() {
        let client = FluxClient::new("https://api.bfl.ai/", None);
        assert_eq!(client.base_url, "https://api.bfl.ai");
    }
}
