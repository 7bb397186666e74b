//! Persisted image records and asset payloads.

use serde::{Deserialize, Serialize};

use crate::types::{AspectRatio, FluxModel, Timestamp};

/// A finished generation, the unit of persistence.
///
/// Created only once a job reaches a ready/completed state; the provider
/// job id doubles as the storage key. The persistence router is the sole
/// writer; consumers read snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    /// Resolved reference: a server path, a remote URL, or an inline data
    /// URL depending on which storage tier holds the asset.
    pub url: String,
    pub prompt: String,
    pub model: FluxModel,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: AspectRatio,
    pub timestamp: Timestamp,
}

/// Schema of the per-image metadata document kept alongside the raster
/// file: `{id, prompt, model, aspectRatio, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub id: String,
    pub prompt: String,
    pub model: FluxModel,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: AspectRatio,
    pub timestamp: Timestamp,
}

impl ImageMetadata {
    pub fn from_image(image: &GeneratedImage) -> Self {
        Self {
            id: image.id.clone(),
            prompt: image.prompt.clone(),
            model: image.model,
            aspect_ratio: image.aspect_ratio,
            timestamp: image.timestamp,
        }
    }

    /// Rehydrate a full record given the resolved asset reference.
    pub fn into_image(self, url: String) -> GeneratedImage {
        GeneratedImage {
            id: self.id,
            url,
            prompt: self.prompt,
            model: self.model,
            aspect_ratio: self.aspect_ratio,
            timestamp: self.timestamp,
        }
    }
}

/// What the materializer resolved for a ready result.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetPayload {
    /// Raw image bytes, eligible for durable storage.
    Bytes(Vec<u8>),
    /// A bare remote reference kept after a failed download or an
    /// undecodable inline sample. Persisted ephemeral-only.
    Reference(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_image() -> GeneratedImage {
        GeneratedImage {
            id: "job-1".into(),
            url: "/generated-images/job-1.png".into(),
            prompt: "a red ball".into(),
            model: FluxModel::KontextPro,
            aspect_ratio: AspectRatio::Square,
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn metadata_roundtrip_preserves_fields() {
        let image = sample_image();
        let meta = ImageMetadata::from_image(&image);
        let back = meta.into_image(image.url.clone());
        assert_eq!(back, image);
    }

    #[test]
    fn metadata_serializes_camel_case_aspect_ratio() {
        let meta = ImageMetadata::from_image(&sample_image());
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["aspectRatio"], "1:1");
        assert_eq!(json["model"], "flux-kontext-pro");
        assert!(json.get("aspect_ratio").is_none());
    }

    #[test]
    fn metadata_timestamp_is_iso8601() {
        let meta = ImageMetadata::from_image(&sample_image());
        let json = serde_json::to_value(&meta).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(ts.starts_with("2024-05-01T12:00:00"));
    }
}
