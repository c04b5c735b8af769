// SPDX-License-Identifier: MIT
//
// Item store — the ordered, mutable collection of images being assembled
// into a document. Owns each item's transform state and preview-handle
// lifetime. Insertion order is page order and no operation may perturb it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use snapdoc_core::error::SnapdocError;
use snapdoc_core::types::{ExtractionState, ItemId, PageFilter, Rotation};
use snapdoc_document::PageInput;
use tracing::{debug, info, instrument, warn};

/// Placeholder text written to an item whose extraction failed.
pub const EXTRACTION_FAILED_TEXT: &str = "Failed to extract text.";

/// A raw payload accepted at the ingestion boundary.
///
/// MIME filtering is upstream policy: the store trusts the declared type and
/// only fails if the bytes cannot be decoded for a preview.
#[derive(Debug, Clone)]
pub struct SourcePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One image unit in the assembly pipeline.
#[derive(Debug)]
pub struct PageItem {
    pub id: ItemId,
    /// Immutable source payload; shared with snapshots and extraction tasks.
    source: Arc<Vec<u8>>,
    pub mime_type: String,
    /// SHA-256 of the source bytes, hex-encoded. Diagnostics only.
    pub source_hash: String,
    preview: crate::preview::PreviewHandle,
    pub rotation: Rotation,
    pub filter: PageFilter,
    pub extracted_text: Option<String>,
    pub extraction: ExtractionState,
    /// Display hint seeded from the creating tool context. Never mutated.
    pub signature: bool,
    pub created_at: DateTime<Utc>,
}

impl PageItem {
    /// The item's immutable source bytes.
    pub fn source(&self) -> &Arc<Vec<u8>> {
        &self.source
    }

    /// The item's preview handle.
    pub fn preview(&self) -> &crate::preview::PreviewHandle {
        &self.preview
    }
}

/// Inputs handed to an extraction task when a request is admitted.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub id: ItemId,
    pub bytes: Arc<Vec<u8>>,
    pub mime_type: String,
}

/// Ordered collection of items being assembled.
///
/// Mutations are serialized by the caller (the workspace service wraps the
/// store in a mutex); the store itself is plain single-threaded state.
pub struct ItemStore {
    items: Vec<PageItem>,
    preview_max_edge: u32,
}

impl ItemStore {
    /// Create an empty store deriving previews at the given maximum edge.
    pub fn new(preview_max_edge: u32) -> Self {
        Self {
            items: Vec::new(),
            preview_max_edge,
        }
    }

    // -- Collection mutations -------------------------------------------------

    /// Append new items, in input order, to the end of the collection.
    ///
    /// Each payload gets a fresh id and a freshly derived preview handle;
    /// `signature` seeds the per-item display hint. Fails if any payload
    /// cannot be decoded; in that case no items are added.
    #[instrument(skip(self, payloads), fields(count = payloads.len(), signature))]
    pub fn add(
        &mut self,
        payloads: Vec<SourcePayload>,
        signature: bool,
    ) -> Result<Vec<ItemId>, SnapdocError> {
        // Derive all previews first so a bad payload adds nothing.
        let mut staged = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let preview = crate::preview::PreviewHandle::derive(&payload.bytes, self.preview_max_edge)?;
            staged.push((payload, preview));
        }

        let mut ids = Vec::with_capacity(staged.len());
        for (payload, preview) in staged {
            let id = ItemId::new();
            let source_hash = hex::encode(Sha256::digest(&payload.bytes));
            debug!(item = %id, hash = %source_hash, mime = %payload.mime_type, "item added");
            self.items.push(PageItem {
                id,
                source: Arc::new(payload.bytes),
                mime_type: payload.mime_type,
                source_hash,
                preview,
                rotation: Rotation::default(),
                filter: PageFilter::default(),
                extracted_text: None,
                extraction: ExtractionState::Idle,
                signature,
                created_at: Utc::now(),
            });
            ids.push(id);
        }

        info!(added = ids.len(), total = self.items.len(), "items appended");
        Ok(ids)
    }

    /// Remove an item, releasing its preview handle exactly once.
    ///
    /// Idempotent: unknown ids are a silent no-op, tolerating duplicate
    /// UI-driven calls. The id is invalid for all further operations.
    #[instrument(skip(self), fields(item = %id))]
    pub fn remove(&mut self, id: ItemId) {
        let Some(index) = self.index_of(id) else {
            debug!("remove for unknown id ignored");
            return;
        };
        let mut item = self.items.remove(index);
        item.preview.release();
        info!(remaining = self.items.len(), "item removed");
    }

    /// Advance an item's rotation by +90° (mod 360). No-op for unknown ids.
    pub fn rotate(&mut self, id: ItemId) {
        if let Some(item) = self.get_mut(id) {
            item.rotation = item.rotation.advance();
            debug!(item = %id, degrees = item.rotation.degrees(), "rotation advanced");
        }
    }

    /// Advance an item's filter along the three-step cycle. No-op for
    /// unknown ids.
    pub fn cycle_filter(&mut self, id: ItemId) {
        if let Some(item) = self.get_mut(id) {
            item.filter = item.filter.next();
            debug!(item = %id, filter = ?item.filter, "filter cycled");
        }
    }

    // -- Read access ----------------------------------------------------------

    /// Read-only view of the collection, in insertion order.
    pub fn items(&self) -> &[PageItem] {
        &self.items
    }

    /// Look up one item by id.
    pub fn get(&self, id: ItemId) -> Option<&PageItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Immutable per-item copies for assembly, in page order.
    ///
    /// Source bytes are shared via `Arc`, so mutations after the snapshot is
    /// taken cannot affect an assembly already in progress.
    pub fn snapshot(&self) -> Vec<PageInput> {
        self.items
            .iter()
            .map(|item| PageInput {
                bytes: Arc::clone(&item.source),
                rotation: item.rotation,
                filter: item.filter,
            })
            .collect()
    }

    // -- Extraction bookkeeping -----------------------------------------------

    /// Admit an extraction request for the item, transitioning it to
    /// `Pending` and returning the task inputs.
    ///
    /// Returns `None` — and changes nothing — if the id is unknown or a
    /// request is already in flight (at most one per item). Retrying from
    /// `Failed` and re-extracting from `Done` are both allowed.
    pub fn begin_extraction(&mut self, id: ItemId) -> Option<ExtractionJob> {
        let item = self.get_mut(id)?;
        if item.extraction == ExtractionState::Pending {
            debug!(item = %id, "extraction already pending, request ignored");
            return None;
        }
        item.extraction = ExtractionState::Pending;
        Some(ExtractionJob {
            id,
            bytes: Arc::clone(&item.source),
            mime_type: item.mime_type.clone(),
        })
    }

    /// Record the outcome of an extraction request.
    ///
    /// If the item was removed while the request was in flight, the result
    /// is discarded and `false` is returned — a completed request must never
    /// write under an id that no longer exists.
    pub fn finish_extraction(&mut self, id: ItemId, outcome: Result<String, SnapdocError>) -> bool {
        let Some(item) = self.get_mut(id) else {
            debug!(item = %id, "extraction result for removed item discarded");
            return false;
        };
        match outcome {
            Ok(text) => {
                item.extraction = ExtractionState::Done;
                item.extracted_text = Some(text);
                info!(item = %id, "extraction completed");
            }
            Err(err) => {
                warn!(item = %id, error = %err, "extraction failed");
                item.extraction = ExtractionState::Failed;
                item.extracted_text = Some(EXTRACTION_FAILED_TEXT.to_string());
            }
        }
        true
    }

    // -- Internal -------------------------------------------------------------

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut PageItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

impl Drop for ItemStore {
    fn drop(&mut self) {
        // Teardown must release every outstanding preview.
        for item in &mut self.items {
            item.preview.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::Weak;

    fn payload(w: u32, h: u32, color: [u8; 3]) -> SourcePayload {
        let img = RgbImage::from_pixel(w, h, Rgb(color));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        SourcePayload {
            bytes,
            mime_type: "image/png".into(),
        }
    }

    fn store_with(n: usize) -> (ItemStore, Vec<ItemId>) {
        let mut store = ItemStore::new(64);
        let payloads = (0..n)
            .map(|i| payload(8 + i as u32, 8, [i as u8 * 40, 0, 0]))
            .collect();
        let ids = store.add(payloads, false).expect("add");
        (store, ids)
    }

    #[test]
    fn add_preserves_input_order() {
        let (store, ids) = store_with(3);
        let stored: Vec<ItemId> = store.items().iter().map(|i| i.id).collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn add_appends_to_existing_collection() {
        let (mut store, first) = store_with(2);
        let more = store.add(vec![payload(12, 12, [0, 99, 0])], true).expect("add");
        let stored: Vec<ItemId> = store.items().iter().map(|i| i.id).collect();
        assert_eq!(stored, [first, more.clone()].concat());
        assert!(store.get(more[0]).expect("item").signature);
    }

    #[test]
    fn bad_payload_adds_nothing() {
        let mut store = ItemStore::new(64);
        let result = store.add(
            vec![
                payload(8, 8, [1, 2, 3]),
                SourcePayload {
                    bytes: b"not an image".to_vec(),
                    mime_type: "image/png".into(),
                },
            ],
            false,
        );
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_is_idempotent_and_releases_preview() {
        let (mut store, ids) = store_with(2);
        let weak: Weak<image::RgbaImage> = Arc::downgrade(
            store
                .get(ids[0])
                .expect("item")
                .preview()
                .thumbnail()
                .expect("thumbnail"),
        );

        store.remove(ids[0]);
        assert!(weak.upgrade().is_none(), "preview buffer should be freed");
        assert!(store.get(ids[0]).is_none());
        assert_eq!(store.len(), 1);

        // Duplicate UI-driven call: silent no-op.
        store.remove(ids[0]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_middle_keeps_relative_order() {
        let (mut store, ids) = store_with(3);
        store.remove(ids[1]);
        let stored: Vec<ItemId> = store.items().iter().map(|i| i.id).collect();
        assert_eq!(stored, vec![ids[0], ids[2]]);
    }

    #[test]
    fn rotate_and_cycle_filter_ignore_unknown_ids() {
        let (mut store, ids) = store_with(1);
        store.rotate(ItemId::new());
        store.cycle_filter(ItemId::new());
        let item = store.get(ids[0]).expect("item");
        assert_eq!(item.rotation, Rotation::R0);
        assert_eq!(item.filter, PageFilter::None);
    }

    #[test]
    fn rotate_accumulates_quarter_turns() {
        let (mut store, ids) = store_with(1);
        for _ in 0..3 {
            store.rotate(ids[0]);
        }
        assert_eq!(store.get(ids[0]).expect("item").rotation, Rotation::R270);
    }

    #[test]
    fn mutations_do_not_perturb_order() {
        let (mut store, ids) = store_with(3);
        store.rotate(ids[2]);
        store.cycle_filter(ids[0]);
        let stored: Vec<ItemId> = store.items().iter().map(|i| i.id).collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn begin_extraction_rejects_in_flight_requests() {
        let (mut store, ids) = store_with(1);
        assert!(store.begin_extraction(ids[0]).is_some());
        assert!(store.begin_extraction(ids[0]).is_none(), "second request while pending");
        assert_eq!(
            store.get(ids[0]).expect("item").extraction,
            ExtractionState::Pending
        );
    }

    #[test]
    fn extraction_can_restart_from_failed_and_done() {
        let (mut store, ids) = store_with(1);

        store.begin_extraction(ids[0]).expect("first request");
        store.finish_extraction(ids[0], Err(SnapdocError::Extraction("offline".into())));
        assert_eq!(store.get(ids[0]).expect("item").extraction, ExtractionState::Failed);
        assert_eq!(
            store.get(ids[0]).expect("item").extracted_text.as_deref(),
            Some(EXTRACTION_FAILED_TEXT)
        );

        // Retry after failure.
        store.begin_extraction(ids[0]).expect("retry");
        store.finish_extraction(ids[0], Ok("invoice no. 42".into()));
        let item = store.get(ids[0]).expect("item");
        assert_eq!(item.extraction, ExtractionState::Done);
        assert_eq!(item.extracted_text.as_deref(), Some("invoice no. 42"));

        // Re-extract after completion.
        assert!(store.begin_extraction(ids[0]).is_some());
    }

    #[test]
    fn finish_extraction_discards_results_for_removed_items() {
        let (mut store, ids) = store_with(1);
        store.begin_extraction(ids[0]).expect("request");
        store.remove(ids[0]);

        let written = store.finish_extraction(ids[0], Ok("late result".into()));
        assert!(!written);
        assert!(store.get(ids[0]).is_none());
    }

    #[test]
    fn snapshot_captures_transform_state() {
        let (mut store, ids) = store_with(2);
        store.rotate(ids[0]);
        store.cycle_filter(ids[1]);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].rotation, Rotation::R90);
        assert_eq!(snapshot[1].filter, PageFilter::Grayscale);

        // Later mutations do not affect the snapshot.
        store.rotate(ids[0]);
        assert_eq!(snapshot[0].rotation, Rotation::R90);
    }

    #[test]
    fn source_hash_is_stable_hex_sha256() {
        let (store, ids) = store_with(1);
        let item = store.get(ids[0]).expect("item");
        assert_eq!(item.source_hash.len(), 64);
        assert_eq!(
            item.source_hash,
            hex::encode(Sha256::digest(item.source().as_slice()))
        );
    }
}
