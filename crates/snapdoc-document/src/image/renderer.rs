// SPDX-License-Identifier: MIT
//
// Page renderer — computes the final appearance of one page from its source
// bytes plus transform state (rotation, filter). Pure: identical inputs
// always produce identical pixels. Operates on in-memory images using the
// `image` and `imageproc` crates.

use image::DynamicImage;
use imageproc::contrast::stretch_contrast;
use snapdoc_core::error::SnapdocError;
use snapdoc_core::types::{PageFilter, Rotation};
use tracing::{debug, instrument};

/// Contrast window for the black-and-white filter.
///
/// Stretching [43, 213] onto [0, 255] is a linear boost of factor 1.5 about
/// mid-gray (the same curve as the CSS `contrast(150%)` the preview uses).
const BW_INPUT_LOWER: u8 = 43;
const BW_INPUT_UPPER: u8 = 213;

/// Rendering pipeline for a single page image.
///
/// All operations are non-destructive: each method consumes `self` and
/// returns a new `PageRenderer` wrapping the transformed image, enabling
/// method chaining.
///
/// ```ignore
/// let page = PageRenderer::from_bytes(&bytes)?
///     .apply_rotation(Rotation::R90)
///     .apply_filter(PageFilter::Grayscale)
///     .into_dynamic();
/// ```
pub struct PageRenderer {
    /// The current working image.
    image: DynamicImage,
}

impl PageRenderer {
    // -- Construction ---------------------------------------------------------

    /// Decode a renderer from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, SnapdocError> {
        let img = image::load_from_memory(data)
            .map_err(|err| SnapdocError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(width = img.width(), height = img.height(), "image decoded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the renderer and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Apply a stored quarter-turn rotation.
    ///
    /// Quarter turns are lossless pixel shuffles; rotation accumulated over
    /// many rotate operations is applied exactly once here, so repeated
    /// rotations never degrade fidelity.
    pub fn apply_rotation(self, rotation: Rotation) -> Self {
        let image = match rotation {
            Rotation::R0 => self.image,
            Rotation::R90 => self.image.rotate90(),
            Rotation::R180 => self.image.rotate180(),
            Rotation::R270 => self.image.rotate270(),
        };
        Self { image }
    }

    /// Apply a visual filter.
    ///
    /// - `None`: pass-through.
    /// - `Grayscale`: luminance conversion, no contrast change.
    /// - `BlackAndWhite`: luminance conversion plus a deterministic linear
    ///   contrast boost (see [`BW_INPUT_LOWER`]/[`BW_INPUT_UPPER`]), visually
    ///   closer to a flatbed scan.
    pub fn apply_filter(self, filter: PageFilter) -> Self {
        let image = match filter {
            PageFilter::None => self.image,
            PageFilter::Grayscale => DynamicImage::ImageLuma8(self.image.to_luma8()),
            PageFilter::BlackAndWhite => {
                let gray = self.image.to_luma8();
                let boosted = stretch_contrast(&gray, BW_INPUT_LOWER, BW_INPUT_UPPER, 0u8, 255u8);
                DynamicImage::ImageLuma8(boosted)
            }
        };
        Self { image }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, SnapdocError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| SnapdocError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

/// Render a page: decode the source bytes, then apply rotation and filter.
///
/// Referentially transparent — the same (bytes, rotation, filter) triple
/// always yields an identical image.
#[instrument(skip(bytes), fields(bytes_len = bytes.len(), rotation = rotation.degrees(), filter = ?filter))]
pub fn render_page(
    bytes: &[u8],
    rotation: Rotation,
    filter: PageFilter,
) -> Result<DynamicImage, SnapdocError> {
    Ok(PageRenderer::from_bytes(bytes)?
        .apply_rotation(rotation)
        .apply_filter(filter)
        .into_dynamic())
}
