//! Ephemeral in-memory fallback store.
//!
//! Holds full image records for the lifetime of the process, newest first.
//! When raw bytes are available the stored reference is synthesized as an
//! inline `data:` URL so the record stays renderable without the durable
//! tier; the bytes are kept alongside so the router can later migrate the
//! record into durable storage.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::sync::RwLock;

use fluxdeck_core::image::GeneratedImage;

/// One fallback record: the image plus (when known) its raw bytes.
#[derive(Debug, Clone)]
pub struct EphemeralRecord {
    pub image: GeneratedImage,
    pub bytes: Option<Vec<u8>>,
}

/// Process-local image store, newest first.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<EphemeralRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, replacing any previous record with the same id.
    ///
    /// With bytes present the stored reference becomes an inline data URL;
    /// without bytes the image's existing reference (typically the remote
    /// delivery URL) is kept as-is. Returns the stored reference.
    pub async fn save(&self, image: GeneratedImage, bytes: Option<Vec<u8>>) -> String {
        let mut stored = image;
        if let Some(ref raw) = bytes {
            stored.url = format!("data:image/png;base64,{}", BASE64.encode(raw));
        }
        let url = stored.url.clone();

        let mut records = self.records.write().await;
        records.retain(|record| record.image.id != stored.id);
        records.insert(
            0,
            EphemeralRecord {
                image: stored,
                bytes,
            },
        );
        url
    }

    /// Snapshot of all records, newest first.
    pub async fn list(&self) -> Vec<GeneratedImage> {
        self.records
            .read()
            .await
            .iter()
            .map(|record| record.image.clone())
            .collect()
    }

    pub async fn delete(&self, id: &str) {
        self.records
            .write()
            .await
            .retain(|record| record.image.id != id);
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }

    /// Records that still hold raw bytes and can be migrated to durable
    /// storage. Returns clones; callers delete after a successful
    /// migration.
    pub async fn recoverable(&self) -> Vec<(GeneratedImage, Vec<u8>)> {
        self.records
            .read()
            .await
            .iter()
            .filter_map(|record| {
                record
                    .bytes
                    .as_ref()
                    .map(|bytes| (record.image.clone(), bytes.clone()))
            })
            .collect()
    }
}
