// SPDX-License-Identifier: MIT
//
// Workspace crate — the stateful editing session above the document layer:
// ordered item store, preview lifetimes, async text extraction, and the
// export service.

pub mod extract;
pub mod preview;
pub mod service;
pub mod store;

pub use extract::remote::GeminiVisionClient;
pub use extract::{ExtractionCoordinator, TextExtractor};
pub use preview::PreviewHandle;
pub use service::WorkspaceService;
pub use store::{ExtractionJob, ItemStore, PageItem, SourcePayload, EXTRACTION_FAILED_TEXT};
