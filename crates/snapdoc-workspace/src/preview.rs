// SPDX-License-Identifier: MIT
//
// Preview handles — the renderable thumbnail derived from an item's source
// bytes. The handle owns the decoded pixel buffer and must be released
// exactly once, on item removal or store teardown. Release is explicit with
// a `Drop` backstop so teardown can never leak the buffer.

use image::RgbaImage;
use snapdoc_core::error::SnapdocError;
use std::sync::Arc;
use tracing::{debug, trace};

/// A renderable preview derived from an item's source bytes.
///
/// The thumbnail's lifetime is tied to the owning item: `release` drops the
/// pixel buffer and is idempotent, and dropping an unreleased handle
/// releases it as a backstop.
#[derive(Debug)]
pub struct PreviewHandle {
    thumbnail: Option<Arc<RgbaImage>>,
}

impl PreviewHandle {
    /// Decode the source bytes and derive a downscaled preview whose longest
    /// edge is at most `max_edge` pixels.
    pub(crate) fn derive(bytes: &[u8], max_edge: u32) -> Result<Self, SnapdocError> {
        let decoded = image::load_from_memory(bytes).map_err(|err| {
            SnapdocError::ImageError(format!("failed to decode preview image: {}", err))
        })?;
        let thumbnail = decoded
            .thumbnail(max_edge, max_edge)
            .to_rgba8();
        trace!(
            width = thumbnail.width(),
            height = thumbnail.height(),
            "preview derived"
        );
        Ok(Self {
            thumbnail: Some(Arc::new(thumbnail)),
        })
    }

    /// The preview pixels, or `None` once released.
    pub fn thumbnail(&self) -> Option<&Arc<RgbaImage>> {
        self.thumbnail.as_ref()
    }

    /// Whether the underlying buffer has been released.
    pub fn is_released(&self) -> bool {
        self.thumbnail.is_none()
    }

    /// Release the preview buffer. Idempotent: only the first call frees.
    pub(crate) fn release(&mut self) {
        if self.thumbnail.take().is_some() {
            debug!("preview released");
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}
