// SPDX-License-Identifier: MIT
//
// Unified error types for Snapdoc.

use thiserror::Error;

/// Top-level error type for all Snapdoc operations.
#[derive(Debug, Error)]
pub enum SnapdocError {
    // -- Image / rendering errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Document assembly errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("cannot assemble a document from an empty item collection")]
    EmptyDocument,

    #[error("encryption failed: {0}")]
    Encryption(String),

    // -- Extraction errors --
    //
    // Recovered locally by the coordinator: callers of `request_extraction`
    // never see this variant. It exists so the extractor trait and the remote
    // client have a uniform failure channel.
    #[error("text extraction failed: {0}")]
    Extraction(String),

    // -- Workspace errors --
    #[error("an export is already in progress")]
    ExportInProgress,

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SnapdocError>;
