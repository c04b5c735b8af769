// SPDX-License-Identifier: MIT
//
// Document assembler — turns an ordered list of page inputs plus document
// settings into a finished multi-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Metadata and encryption are applied afterwards in a
// lopdf post-pass (see `pdf::secure`).

use std::sync::Arc;

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use snapdoc_core::error::SnapdocError;
use snapdoc_core::types::{DocumentSettings, Orientation, PageFilter, PageSize, Rotation};
use tracing::{debug, info, instrument};

use crate::image::renderer::{PageRenderer, render_page};
use crate::pdf::secure;

/// Raster resolution assumed for placing page images (dots per inch).
const RENDER_DPI: f32 = 150.0;

/// Margin around the image on fixed-size pages, in millimetres.
const FIXED_PAGE_MARGIN_MM: f32 = 15.0;

/// One page's worth of input: immutable source bytes plus the transform state
/// captured when the assembly snapshot was taken.
///
/// Bytes are shared via `Arc` so taking a snapshot never copies image data;
/// mutations to the live collection after the snapshot cannot affect an
/// assembly already in progress.
#[derive(Debug, Clone)]
pub struct PageInput {
    pub bytes: Arc<Vec<u8>>,
    pub rotation: Rotation,
    pub filter: PageFilter,
}

/// Assembles rendered pages into a single PDF artifact.
pub struct DocumentAssembler;

impl DocumentAssembler {
    /// Assemble the given pages, in order, into a finished PDF.
    ///
    /// Fails with [`SnapdocError::EmptyDocument`] if `pages` is empty and with
    /// an image/PDF error if any single page fails to render — there is no
    /// partial-success mode. Output page order is exactly input order.
    #[instrument(skip(pages, settings), fields(page_count = pages.len()))]
    pub fn assemble(pages: &[PageInput], settings: &DocumentSettings) -> Result<Vec<u8>, SnapdocError> {
        if pages.is_empty() {
            return Err(SnapdocError::EmptyDocument);
        }

        let title = settings.title.as_deref().unwrap_or("Snapdoc Document");
        let jpeg_quality = (settings.quality() * 100.0).round().clamp(10.0, 100.0) as u8;

        info!(
            page_size = ?settings.page_size,
            orientation = ?settings.orientation,
            jpeg_quality,
            encrypted = settings.effective_password().is_some(),
            "assembling document"
        );

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            let rendered = render_page(&page.bytes, page.rotation, page.filter)?;

            // The quality lever: a lossy JPEG round-trip at the requested
            // quality before embedding. Lower quality discards detail, which
            // also compresses better in the final stream.
            let jpeg = PageRenderer::from_dynamic(rendered).to_jpeg_bytes(jpeg_quality)?;
            let rgb = image::load_from_memory(&jpeg)
                .map_err(|err| {
                    SnapdocError::ImageError(format!("failed to re-decode page {}: {}", index + 1, err))
                })?
                .to_rgb8();

            let (img_w, img_h) = rgb.dimensions();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: img_w as usize,
                height: img_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let pdf_page = match settings.page_size.dimensions_mm() {
                None => auto_page(xobject_id, img_w, img_h),
                Some(dims) => fixed_page(xobject_id, img_w, img_h, dims, settings.orientation),
            };

            debug!(page = index + 1, img_w, img_h, "page placed");
            pdf_pages.push(pdf_page);
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(bytes = bytes.len(), warnings = warnings.len(), "document serialised");

        secure::finalize_document(bytes, settings)
    }
}

/// Auto-sized page: the page adopts the rendered image's own dimensions at
/// [`RENDER_DPI`], image placed edge to edge.
fn auto_page(xobject_id: printpdf::XObjectId, img_w: u32, img_h: u32) -> PdfPage {
    let page_w = Mm(img_w as f32 / RENDER_DPI * 25.4);
    let page_h = Mm(img_h as f32 / RENDER_DPI * 25.4);

    let ops = vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            dpi: Some(RENDER_DPI),
            rotate: None,
        },
    }];

    PdfPage::new(page_w, page_h, ops)
}

/// Fixed-size page (A4/Letter): the image is scaled to fit inside the page
/// margins, aspect preserved, and centred. Small images are scaled up so the
/// page is filled.
fn fixed_page(
    xobject_id: printpdf::XObjectId,
    img_w: u32,
    img_h: u32,
    (mut w_mm, mut h_mm): (u32, u32),
    orientation: Orientation,
) -> PdfPage {
    if orientation == Orientation::Landscape {
        std::mem::swap(&mut w_mm, &mut h_mm);
    }
    let page_w = Mm(w_mm as f32);
    let page_h = Mm(h_mm as f32);

    let usable_w_pt = Mm(page_w.0 - 2.0 * FIXED_PAGE_MARGIN_MM).into_pt().0;
    let usable_h_pt = Mm(page_h.0 - 2.0 * FIXED_PAGE_MARGIN_MM).into_pt().0;

    // Image native size in points at the render DPI.
    let img_w_pt = img_w as f32 / RENDER_DPI * 72.0;
    let img_h_pt = img_h as f32 / RENDER_DPI * 72.0;

    // Scale to fit while preserving aspect ratio.
    let scale = (usable_w_pt / img_w_pt).min(usable_h_pt / img_h_pt);

    let rendered_w_pt = img_w_pt * scale;
    let rendered_h_pt = img_h_pt * scale;

    // Centre the image on the page.
    let margin_pt = Mm(FIXED_PAGE_MARGIN_MM).into_pt().0;
    let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
    let y_offset = margin_pt + (usable_h_pt - rendered_h_pt) / 2.0;

    let ops = vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(x_offset)),
            translate_y: Some(Pt(y_offset)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(RENDER_DPI),
            rotate: None,
        },
    }];

    PdfPage::new(page_w, page_h, ops)
}
