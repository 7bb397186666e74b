//! Durable-first persistence router.
//!
//! Every mutating operation tries the durable tier first and degrades to
//! the ephemeral tier instead of dropping data. Reads fail soft: a durable
//! read error falls back to the ephemeral snapshot rather than
//! propagating. [`ImageStore`] is the sole writer of image records.

use futures::future::join_all;

use fluxdeck_core::error::CoreError;
use fluxdeck_core::image::{AssetPayload, GeneratedImage};

use crate::durable::FileStore;
use crate::ephemeral::MemoryStore;

/// Two-tier image store: durable filesystem + ephemeral in-memory
/// fallback.
pub struct ImageStore {
    durable: FileStore,
    ephemeral: MemoryStore,
}

impl ImageStore {
    pub fn new(durable: FileStore) -> Self {
        Self {
            durable,
            ephemeral: MemoryStore::new(),
        }
    }

    /// The durable tier's raster directory (served statically by the API).
    pub fn durable(&self) -> &FileStore {
        &self.durable
    }

    /// Persist a materialized image; returns the resolved reference URL.
    ///
    /// Byte payloads go durable-first, falling back to the ephemeral tier
    /// (inline data URL) when the durable write fails. Bare-reference
    /// payloads -- the materializer's degraded output -- are ephemeral-only
    /// by design: there are no bytes to write durably. A successful
    /// durable write also triggers a reconciliation pass for records
    /// stranded in the ephemeral tier by an earlier failure.
    pub async fn save(
        &self,
        image: &GeneratedImage,
        payload: &AssetPayload,
    ) -> Result<String, CoreError> {
        match payload {
            AssetPayload::Bytes(bytes) => match self.durable.save(image, bytes).await {
                Ok(url) => {
                    self.reconcile().await;
                    Ok(url)
                }
                Err(durable_err) => {
                    tracing::warn!(
                        image_id = %image.id,
                        error = %durable_err,
                        "Durable save failed, falling back to ephemeral store",
                    );
                    Ok(self.ephemeral.save(image.clone(), Some(bytes.clone())).await)
                }
            },
            AssetPayload::Reference(reference) => {
                let mut record = image.clone();
                record.url = reference.clone();
                Ok(self.ephemeral.save(record, None).await)
            }
        }
    }

    /// All stored images, newest first.
    ///
    /// Durable storage is authoritative; an empty or failing durable tier
    /// falls back to the ephemeral snapshot. Never fails.
    pub async fn list(&self) -> Vec<GeneratedImage> {
        match self.durable.list().await {
            Ok(images) if !images.is_empty() => images,
            Ok(_) => self.ephemeral.list().await,
            Err(e) => {
                tracing::warn!(error = %e, "Durable list failed, serving ephemeral records");
                self.ephemeral.list().await
            }
        }
    }

    /// Remove an image from both tiers. Not-found is success; only a real
    /// I/O failure in the durable tier is an error. The ephemeral record is
    /// removed even when the durable tier errors, so a deleted id can never
    /// resurface through the fallback list.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let durable_result = self.durable.delete(id).await;
        self.ephemeral.delete(id).await;
        durable_result
    }

    /// Delete every stored image.
    ///
    /// Durable deletes are dispatched concurrently and unordered; one
    /// failure does not cancel the rest, and partial failure is left for
    /// the next `list` to surface. If durable enumeration itself fails,
    /// only the ephemeral tier is wiped. Returns the number of durable
    /// records deleted.
    pub async fn clear_all(&self) -> usize {
        let images = match self.durable.list().await {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(error = %e, "Durable enumeration failed, wiping ephemeral tier only");
                self.ephemeral.clear().await;
                return 0;
            }
        };

        let results = join_all(
            images
                .iter()
                .map(|image| self.durable.delete(&image.id)),
        )
        .await;

        let mut deleted = 0;
        for (image, result) in images.iter().zip(results) {
            match result {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!(image_id = %image.id, error = %e, "Failed to delete image");
                }
            }
        }

        self.ephemeral.clear().await;
        deleted
    }

    /// Migrate ephemeral records that still hold raw bytes into durable
    /// storage. Stops at the first durable failure (the tier is evidently
    /// still down). Returns the number of records migrated.
    pub async fn reconcile(&self) -> usize {
        let stranded = self.ephemeral.recoverable().await;
        if stranded.is_empty() {
            return 0;
        }

        let mut migrated = 0;
        for (image, bytes) in stranded {
            match self.durable.save(&image, &bytes).await {
                Ok(_) => {
                    self.ephemeral.delete(&image.id).await;
                    migrated += 1;
                }
                Err(e) => {
                    tracing::debug!(image_id = %image.id, error = %e, "Reconciliation halted, durable tier still unavailable");
                    break;
                }
            }
        }

        if migrated > 0 {
            tracing::info!(migrated, "Migrated ephemeral records to durable storage");
        }
        migrated
    }
}
