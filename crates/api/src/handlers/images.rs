//! Handlers for the image persistence endpoints.
//!
//! All writes go through the [`ImageStore`] router so the durable-first /
//! ephemeral-fallback discipline applies uniformly, whether an image
//! arrives via the one-shot pipeline or this endpoint.

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use fluxdeck_core::image::{AssetPayload, ImageMetadata};
use fluxdeck_storage::durable::validate_image_id;

use crate::error::{AppError, AppResult};
use crate::response::{ClearResponse, DeleteResponse, ListResponse, StoreResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/images/store
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StoreBody {
    #[serde(rename = "imageId")]
    pub image_id: Option<String>,
    #[serde(rename = "base64Data")]
    pub base64_data: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

/// Persist an image supplied as base64 plus its metadata document.
pub async fn store(
    State(state): State<AppState>,
    Json(body): Json<StoreBody>,
) -> AppResult<Json<StoreResponse>> {
    let (Some(image_id), Some(base64_data)) = (
        body.image_id.filter(|id| !id.trim().is_empty()),
        body.base64_data.filter(|data| !data.trim().is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Image ID and base64 data are required".to_string(),
        ));
    };
    validate_image_id(&image_id)?;

    let mut metadata = body
        .metadata
        .ok_or_else(|| AppError::BadRequest("Image metadata is required".to_string()))?;
    // The id field is authoritative; keep the metadata document in sync.
    metadata.id = image_id.clone();

    let bytes = BASE64
        .decode(base64_data.trim())
        .map_err(|_| AppError::BadRequest("base64Data is not valid base64".to_string()))?;

    let image = metadata.into_image(String::new());
    let image_url = state
        .store
        .save(&image, &AssetPayload::Bytes(bytes))
        .await?;

    Ok(Json(StoreResponse {
        success: true,
        image_url,
        image_id,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/images/list
// ---------------------------------------------------------------------------

/// All stored images, newest first. Fails soft: a broken durable tier
/// yields the ephemeral snapshot, never an error.
pub async fn list(State(state): State<AppState>) -> Json<ListResponse> {
    Json(ListResponse {
        images: state.store.list().await,
    })
}

// ---------------------------------------------------------------------------
// DELETE /api/images/delete
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
    #[serde(rename = "imageId")]
    pub image_id: Option<String>,
}

/// Remove one image from both storage tiers. Deleting an id that does not
/// exist succeeds.
pub async fn delete(
    State(state): State<AppState>,
    Json(body): Json<DeleteBody>,
) -> AppResult<Json<DeleteResponse>> {
    let image_id = body
        .image_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Image ID is required".to_string()))?;

    state.store.delete(&image_id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        image_id,
    }))
}

// ---------------------------------------------------------------------------
// DELETE /api/images/clear
// ---------------------------------------------------------------------------

/// Delete every stored image. Per-image deletes are dispatched
/// concurrently; partial failure is surfaced by the next list.
pub async fn clear(State(state): State<AppState>) -> Json<ClearResponse> {
    let deleted = state.store.clear_all().await;
    Json(ClearResponse {
        success: true,
        deleted,
    })
}
