//! One-shot server-side generation.
//!
//! Runs the full submit -> poll -> materialize -> persist protocol inside
//! a single request and returns the stored image record. Only one
//! generation can be in flight at a time; concurrent calls get a 409.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use fluxdeck_core::image::GeneratedImage;
use fluxdeck_core::request::GenerationRequest;
use fluxdeck_core::types::{AspectRatio, FluxModel};

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunGenerationBody {
    pub model: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    pub prompt: Option<String>,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: Option<AspectRatio>,
    /// Optional base64-encoded reference image.
    #[serde(rename = "inputImage")]
    pub input_image: Option<String>,
    pub seed: Option<i64>,
}

/// Generate an image and persist it, returning the stored record.
pub async fn run_generation(
    State(state): State<AppState>,
    Json(body): Json<RunGenerationBody>,
) -> AppResult<Json<GeneratedImage>> {
    let credential = state.resolve_credential(body.api_key.as_deref())?;
    let model = FluxModel::parse(body.model.as_deref().unwrap_or_default())?;

    let mut request = GenerationRequest::new(body.prompt.unwrap_or_default());
    request.aspect_ratio = body.aspect_ratio;
    request.input_image = body.input_image;
    request.seed = body.seed;

    // The request's lifetime is the cancellation scope: dropping the
    // connection does not abort the job, but the poll loop's attempt
    // budget still bounds it.
    let cancel = CancellationToken::new();
    let image = state.runner.run(credential, model, request, &cancel).await?;

    Ok(Json(image))
}
