// SPDX-License-Identifier: MIT
//
// Central service layer — owns the item store, the extraction coordinator
// and the document settings, and provides async-friendly methods for a
// frontend to call.
//
// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
// passed into closures and async blocks without lifetime issues. The store
// uses the async mutex because extraction tasks lock it from spawned tasks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use snapdoc_core::config::AppConfig;
use snapdoc_core::error::{Result, SnapdocError};
use snapdoc_core::tools::ToolKind;
use snapdoc_core::types::{DocumentSettings, ItemId};
use snapdoc_document::DocumentAssembler;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::extract::{ExtractionCoordinator, TextExtractor};
use crate::store::{ItemStore, PageItem, SourcePayload};

/// Shared workspace services for one editing session.
#[derive(Clone)]
pub struct WorkspaceService {
    store: Arc<Mutex<ItemStore>>,
    coordinator: ExtractionCoordinator,
    settings: Arc<std::sync::Mutex<DocumentSettings>>,
    tool: ToolKind,
    export_in_flight: Arc<AtomicBool>,
}

impl WorkspaceService {
    /// Initialise the service for a tool context with the given extraction
    /// provider.
    pub fn new(config: &AppConfig, tool: ToolKind, extractor: Arc<dyn TextExtractor>) -> Self {
        info!(tool = tool.id(), "initialising workspace");
        let store = Arc::new(Mutex::new(ItemStore::new(config.preview_max_edge)));
        let coordinator = ExtractionCoordinator::new(Arc::clone(&store), extractor);
        Self {
            store,
            coordinator,
            settings: Arc::new(std::sync::Mutex::new(config.default_settings.clone())),
            tool,
            export_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The tool context this workspace was opened under.
    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    // -- Collection ----------------------------------------------------------

    /// Ingest raw payloads, appending them in input order.
    ///
    /// The per-item signature hint is seeded from the tool's capabilities.
    pub async fn add_images(&self, payloads: Vec<SourcePayload>) -> Result<Vec<ItemId>> {
        let signature = self.tool.capabilities().signature_overlay;
        self.store.lock().await.add(payloads, signature)
    }

    /// Remove an item. Unknown ids are a silent no-op.
    pub async fn remove(&self, id: ItemId) {
        self.store.lock().await.remove(id);
    }

    /// Advance an item's rotation by a quarter turn.
    pub async fn rotate(&self, id: ItemId) {
        self.store.lock().await.rotate(id);
    }

    /// Advance an item's filter along its cycle.
    pub async fn cycle_filter(&self, id: ItemId) {
        self.store.lock().await.cycle_filter(id);
    }

    /// Run a closure over the current items, in page order.
    pub async fn with_items<R>(&self, f: impl FnOnce(&[PageItem]) -> R) -> R {
        f(self.store.lock().await.items())
    }

    pub async fn item_count(&self) -> usize {
        self.store.lock().await.len()
    }

    // -- Extraction ----------------------------------------------------------

    /// Request text extraction for an item. Returns `false` when the id is
    /// unknown or a request is already pending.
    pub async fn request_extraction(&self, id: ItemId) -> bool {
        self.coordinator.request_extraction(id).await
    }

    // -- Settings ------------------------------------------------------------

    /// Get a clone of the current document settings.
    pub fn settings(&self) -> DocumentSettings {
        self.settings.lock().expect("settings lock poisoned").clone()
    }

    /// Replace the document settings wholesale.
    pub fn update_settings(&self, settings: DocumentSettings) {
        *self.settings.lock().expect("settings lock poisoned") = settings;
    }

    // -- Export --------------------------------------------------------------

    /// Assemble the current collection into a finished document.
    ///
    /// At most one export runs at a time; a request made while one is in
    /// flight fails with [`SnapdocError::ExportInProgress`] rather than
    /// queueing. The collection is snapshotted up front, so edits made while
    /// assembly runs do not affect the artifact.
    #[instrument(skip(self), fields(tool = self.tool.id()))]
    pub async fn export(&self) -> Result<Vec<u8>> {
        if self
            .export_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("export rejected, another export is in flight");
            return Err(SnapdocError::ExportInProgress);
        }

        let pages = self.store.lock().await.snapshot();
        let settings = self.settings();

        let result = tokio::task::spawn_blocking(move || {
            DocumentAssembler::assemble(&pages, &settings)
        })
        .await
        .map_err(|e| SnapdocError::PdfError(format!("assembly task failed: {e}")));

        self.export_in_flight.store(false, Ordering::SeqCst);

        let bytes = result??;
        info!(bytes = bytes.len(), "export finished");
        Ok(bytes)
    }

    /// Suggested file name for an exported document: the tool id plus a
    /// timestamp, e.g. `snap2pdf-20260830-142501.pdf`.
    pub fn export_file_name(&self) -> String {
        let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        format!("{}-{stamp}.pdf", self.tool.id())
    }
}
