//! Resolve a ready poll result into a persistable image record.
//!
//! The provider's `sample` field is either a delivery URL or inline base64
//! data. URLs are fetched through the client; inline data is decoded
//! locally and never triggers a network request. Materialization never
//! fails: when the bytes cannot be resolved the original reference is kept
//! and persistence degrades to the ephemeral tier.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::sync::broadcast;

use fluxdeck_bfl::client::FluxClient;
use fluxdeck_bfl::messages::GenerationResult;
use fluxdeck_core::image::{AssetPayload, GeneratedImage};
use fluxdeck_core::request::GenerationRequest;
use fluxdeck_core::types::{AspectRatio, FluxModel};

use crate::events::GenerationEvent;

/// A materialized result: the image record (url unset until persisted)
/// plus the resolved payload.
#[derive(Debug, Clone)]
pub struct MaterializedImage {
    pub image: GeneratedImage,
    pub payload: AssetPayload,
}

/// Build the [`GeneratedImage`] record and resolve its asset payload.
///
/// The job id becomes the storage key; prompt, model, and aspect ratio are
/// taken from the originating request (square when the request left the
/// ratio to the provider default).
pub async fn materialize(
    client: &FluxClient,
    job_id: &str,
    model: FluxModel,
    request: &GenerationRequest,
    result: &GenerationResult,
    event_tx: &broadcast::Sender<GenerationEvent>,
) -> MaterializedImage {
    let sample = result.sample.clone().unwrap_or_default();
    let payload = resolve_payload(client, &sample, event_tx).await;

    let image = GeneratedImage {
        id: job_id.to_string(),
        url: String::new(),
        prompt: request.prompt.clone(),
        model,
        aspect_ratio: request.aspect_ratio.unwrap_or(AspectRatio::Square),
        timestamp: chrono::Utc::now(),
    };

    MaterializedImage { image, payload }
}

async fn resolve_payload(
    client: &FluxClient,
    sample: &str,
    event_tx: &broadcast::Sender<GenerationEvent>,
) -> AssetPayload {
    if sample.starts_with("http") {
        let _ = event_tx.send(GenerationEvent::Downloading {
            url: sample.to_string(),
        });
        match client.fetch_asset(sample).await {
            Ok(asset) => AssetPayload::Bytes(asset.bytes),
            Err(e) => {
                tracing::warn!(
                    url = %sample,
                    error = %e,
                    "Asset download failed, keeping remote reference",
                );
                AssetPayload::Reference(sample.to_string())
            }
        }
    } else {
        match decode_inline(sample) {
            Ok(bytes) => AssetPayload::Bytes(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "Inline sample is not valid base64, keeping raw reference");
                AssetPayload::Reference(sample.to_string())
            }
        }
    }
}

/// Decode an inline sample, tolerating a `data:...;base64,` prefix.
fn decode_inline(sample: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let encoded = match sample.split_once("base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => sample,
    };
    BASE64.decode(encoded.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_raw_base64() {
        let encoded = BASE64.encode(b"png-bytes");
        assert_eq!(decode_inline(&encoded).unwrap(), b"png-bytes");
    }

    #[test]
    fn decode_data_url() {
        let encoded = format!("data:image/png;base64,{}", BASE64.encode(b"png-bytes"));
        assert_eq!(decode_inline(&encoded).unwrap(), b"png-bytes");
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(decode_inline("!!not base64!!").is_err());
    }
}
