//! Two-tier persistence for generated images.
//!
//! The durable tier ([`durable::FileStore`]) keeps one raster file plus one
//! JSON metadata document per image on disk. The ephemeral tier
//! ([`ephemeral::MemoryStore`]) is a process-local fallback with inline
//! data-URL references. [`router::ImageStore`] routes every operation
//! durable-first with ephemeral fallback and is the sole writer of image
//! records.

pub mod durable;
pub mod ephemeral;
pub mod router;
