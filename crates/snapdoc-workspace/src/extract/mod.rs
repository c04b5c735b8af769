// SPDX-License-Identifier: MIT
//
// Text extraction — a provider trait plus the coordinator that runs
// requests against the item store without blocking collection edits.

use std::sync::Arc;

use async_trait::async_trait;
use snapdoc_core::error::SnapdocError;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::store::ItemStore;
use snapdoc_core::types::ItemId;

pub mod remote;

/// A provider that turns an image into its legible text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, image_bytes: &[u8], mime_type: &str) -> Result<String, SnapdocError>;
}

/// Drives extraction requests for items in a shared store.
///
/// Requests run on spawned tasks; the store lock is held only for the state
/// transitions at either end, never across the provider call.
#[derive(Clone)]
pub struct ExtractionCoordinator {
    store: Arc<Mutex<ItemStore>>,
    extractor: Arc<dyn TextExtractor>,
}

impl ExtractionCoordinator {
    pub fn new(store: Arc<Mutex<ItemStore>>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { store, extractor }
    }

    /// Request extraction for one item.
    ///
    /// Returns `true` if a task was spawned; `false` when the id is unknown
    /// or a request is already pending, in which case nothing runs. The
    /// item's text and state are updated when the task completes; if the
    /// item was removed in the meantime the result is discarded.
    #[instrument(skip(self), fields(item = %id))]
    pub async fn request_extraction(&self, id: ItemId) -> bool {
        let Some(job) = self.store.lock().await.begin_extraction(id) else {
            debug!("extraction request not admitted");
            return false;
        };

        let store = Arc::clone(&self.store);
        let extractor = Arc::clone(&self.extractor);
        tokio::spawn(async move {
            let outcome = extractor.extract(&job.bytes, &job.mime_type).await;
            store.lock().await.finish_extraction(job.id, outcome);
        });
        true
    }
}
