//! Typed response bodies for API handlers.
//!
//! Field names keep the wire casing the endpoints are contracted to
//! (`imageUrl`, `imageId`, `contentType`). Use these instead of ad-hoc
//! `serde_json::json!` bodies to get compile-time shape safety.

use serde::Serialize;

use fluxdeck_core::image::GeneratedImage;

/// Body of `POST /api/images/store`.
#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub success: bool,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "imageId")]
    pub image_id: String,
}

/// Body of `GET /api/images/list`.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub images: Vec<GeneratedImage>,
}

/// Body of `DELETE /api/images/delete`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(rename = "imageId")]
    pub image_id: String,
}

/// Body of `DELETE /api/images/clear`.
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    /// Number of durable records removed.
    pub deleted: usize,
}

/// Body of `POST /api/flux/download`.
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub base64: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}
