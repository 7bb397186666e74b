//! Handlers for the upstream proxy endpoints.
//!
//! These are thin passthroughs: they resolve the effective credential,
//! validate the fields the upstream cannot check for us, and forward the
//! call through [`FluxClient`]. Upstream failures propagate with their
//! status and message preserved.

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use fluxdeck_bfl::messages::{PollResponse, SubmitResponse};
use fluxdeck_core::request::{GenerationRequest, DEFAULT_SAFETY_TOLERANCE};
use fluxdeck_core::types::{AspectRatio, FluxModel, OutputFormat};

use crate::error::{AppError, AppResult};
use crate::response::DownloadResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/flux/generate
// ---------------------------------------------------------------------------

/// Request body for the generation proxy. Everything except the prompt is
/// optional; the credential may come from server configuration instead.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub model: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    pub prompt: Option<String>,
    pub input_image: Option<String>,
    pub seed: Option<i64>,
    pub aspect_ratio: Option<AspectRatio>,
    pub output_format: Option<OutputFormat>,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    #[serde(default)]
    pub prompt_upsampling: bool,
    pub safety_tolerance: Option<u8>,
}

/// Submit a generation job upstream and return `{id, polling_url}`.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> AppResult<Json<SubmitResponse>> {
    let credential = state.resolve_credential(body.api_key.as_deref())?;
    let model = FluxModel::parse(body.model.as_deref().unwrap_or_default())?;

    let request = GenerationRequest {
        prompt: body.prompt.unwrap_or_default(),
        input_image: body.input_image,
        seed: body.seed,
        aspect_ratio: body.aspect_ratio,
        output_format: Some(body.output_format.unwrap_or_default()),
        webhook_url: body.webhook_url,
        webhook_secret: body.webhook_secret,
        prompt_upsampling: body.prompt_upsampling,
        safety_tolerance: body.safety_tolerance.unwrap_or(DEFAULT_SAFETY_TOLERANCE),
    };

    let client = state.flux_client(Some(credential));
    let response = client.submit(model, &request).await?;

    tracing::info!(job_id = %response.id, "Generation job proxied upstream");
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// POST /api/flux/poll
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PollBody {
    #[serde(rename = "pollingUrl")]
    pub polling_url: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Poll a job's status upstream and return the provider body verbatim.
pub async fn poll(
    State(state): State<AppState>,
    Json(body): Json<PollBody>,
) -> AppResult<Json<PollResponse>> {
    let credential = state.resolve_credential(body.api_key.as_deref())?;
    let polling_url = body
        .polling_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Polling URL is required".to_string()))?;

    let client = state.flux_client(Some(credential));
    let response = client.poll(&polling_url).await?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// POST /api/flux/download
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DownloadBody {
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Proxy-download an external asset and return it base64-encoded.
///
/// No credential is needed -- delivery URLs are pre-signed.
pub async fn download(
    State(state): State<AppState>,
    Json(body): Json<DownloadBody>,
) -> AppResult<Json<DownloadResponse>> {
    let image_url = body
        .image_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Image URL is required".to_string()))?;

    let client = state.flux_client(None);
    let asset = client.fetch_asset(&image_url).await?;

    Ok(Json(DownloadResponse {
        base64: BASE64.encode(&asset.bytes),
        content_type: asset.content_type,
    }))
}
