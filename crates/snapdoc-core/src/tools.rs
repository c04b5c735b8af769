// SPDX-License-Identifier: MIT
//
// Static tool catalog: the closed set of product "skins" a workspace can run
// as. Each tool is display metadata plus a capability set; capabilities (not
// string comparisons on ids) decide which workspace features are active.

use serde::{Deserialize, Serialize};

/// Broad grouping of tools, used for display copy only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolCategory {
    Scanner,
    Converter,
    Editor,
    Utility,
}

/// Which workspace features a tool exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolCapabilities {
    /// Show password/encryption controls and honour the settings password.
    pub encryption_controls: bool,
    /// Show the compression-quality slider instead of orientation.
    pub compression_controls: bool,
    /// Enable per-item AI text extraction.
    pub ocr: bool,
    /// New items are created with the signature display hint set.
    pub signature_overlay: bool,
}

/// The closed set of tool variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Snap2Pdf,
    PdfFusion,
    PhotoPdf,
    QuickPdf,
    ScanWise,
    Image2Doc,
    PocketPdf,
    MergeMate,
    OcRight,
    TinyPdf,
    SignFlow,
    AnnotateNow,
    CloudPocket,
    ScanBatch,
    SecurePdf,
}

impl ToolKind {
    /// Every tool variant, in catalog order.
    pub const ALL: [ToolKind; 15] = [
        Self::Snap2Pdf,
        Self::PdfFusion,
        Self::PhotoPdf,
        Self::QuickPdf,
        Self::ScanWise,
        Self::Image2Doc,
        Self::PocketPdf,
        Self::MergeMate,
        Self::OcRight,
        Self::TinyPdf,
        Self::SignFlow,
        Self::AnnotateNow,
        Self::CloudPocket,
        Self::ScanBatch,
        Self::SecurePdf,
    ];

    /// Human-readable product name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Snap2Pdf => "Snap2PDF",
            Self::PdfFusion => "PDFFusion Pro",
            Self::PhotoPdf => "PhotoPDF Studio",
            Self::QuickPdf => "QuickPDF Maker",
            Self::ScanWise => "ScanWise PDF",
            Self::Image2Doc => "Image2Doc PDF",
            Self::PocketPdf => "PocketPDF Editor",
            Self::MergeMate => "MergeMate PDF",
            Self::OcRight => "OCRight PDF",
            Self::TinyPdf => "TinyPDF Compress",
            Self::SignFlow => "SignFlow PDF",
            Self::AnnotateNow => "AnnotateNow PDF",
            Self::CloudPocket => "CloudPocket PDF",
            Self::ScanBatch => "ScanBatch Pro",
            Self::SecurePdf => "SecurePDF Vault",
        }
    }

    /// Short marketing tagline shown under the product name.
    pub fn tagline(&self) -> &'static str {
        match self {
            Self::Snap2Pdf => "Photo → PDF in one tap",
            Self::PdfFusion => "Merge. Edit. Master.",
            Self::PhotoPdf => "Studio-level image → PDF",
            Self::QuickPdf => "Create PDFs fast",
            Self::ScanWise => "Smart scanning, smarter PDFs",
            Self::Image2Doc => "Photos to searchable PDFs",
            Self::PocketPdf => "PDF editing on the go",
            Self::MergeMate => "Merge smarter",
            Self::OcRight => "Accurate OCR, fast",
            Self::TinyPdf => "Shrink PDFs instantly",
            Self::SignFlow => "Sign & send in seconds",
            Self::AnnotateNow => "Annotate, teach, collaborate",
            Self::CloudPocket => "Your PDFs, everywhere",
            Self::ScanBatch => "Batch scanning, zero hassle",
            Self::SecurePdf => "Encrypt. Store. Share.",
        }
    }

    /// Stable string id (lowercase, URL-safe).
    pub fn id(&self) -> &'static str {
        match self {
            Self::Snap2Pdf => "snap2pdf",
            Self::PdfFusion => "pdffusion",
            Self::PhotoPdf => "photopdf",
            Self::QuickPdf => "quickpdf",
            Self::ScanWise => "scanwise",
            Self::Image2Doc => "image2doc",
            Self::PocketPdf => "pocketpdf",
            Self::MergeMate => "mergemate",
            Self::OcRight => "ocright",
            Self::TinyPdf => "tinypdf",
            Self::SignFlow => "signflow",
            Self::AnnotateNow => "annotatenow",
            Self::CloudPocket => "cloudpocket",
            Self::ScanBatch => "scanbatch",
            Self::SecurePdf => "securepdf",
        }
    }

    pub fn category(&self) -> ToolCategory {
        match self {
            Self::Snap2Pdf | Self::ScanWise | Self::ScanBatch => ToolCategory::Scanner,
            Self::PhotoPdf | Self::QuickPdf | Self::Image2Doc | Self::OcRight => {
                ToolCategory::Converter
            }
            Self::PdfFusion | Self::PocketPdf | Self::SignFlow | Self::AnnotateNow => {
                ToolCategory::Editor
            }
            Self::MergeMate | Self::TinyPdf | Self::CloudPocket | Self::SecurePdf => {
                ToolCategory::Utility
            }
        }
    }

    /// Feature set for this tool variant.
    pub fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities {
            encryption_controls: matches!(self, Self::SecurePdf),
            compression_controls: matches!(self, Self::TinyPdf | Self::PhotoPdf),
            ocr: matches!(self, Self::Image2Doc | Self::OcRight | Self::ScanWise),
            signature_overlay: matches!(self, Self::SignFlow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = ToolKind::ALL.iter().map(|t| t.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ToolKind::ALL.len());
    }

    #[test]
    fn every_tool_carries_display_copy() {
        for tool in ToolKind::ALL {
            assert!(!tool.name().is_empty());
            assert!(!tool.tagline().is_empty());
        }
        assert_eq!(ToolKind::Snap2Pdf.tagline(), "Photo → PDF in one tap");
        assert_eq!(ToolKind::SecurePdf.tagline(), "Encrypt. Store. Share.");
    }

    #[test]
    fn signature_overlay_only_for_signflow() {
        for tool in ToolKind::ALL {
            assert_eq!(
                tool.capabilities().signature_overlay,
                tool == ToolKind::SignFlow
            );
        }
    }

    #[test]
    fn ocr_tools_match_catalog() {
        let ocr: Vec<ToolKind> = ToolKind::ALL
            .into_iter()
            .filter(|t| t.capabilities().ocr)
            .collect();
        assert_eq!(
            ocr,
            vec![ToolKind::ScanWise, ToolKind::Image2Doc, ToolKind::OcRight]
        );
    }

    #[test]
    fn only_secure_pdf_exposes_encryption_controls() {
        for tool in ToolKind::ALL {
            assert_eq!(
                tool.capabilities().encryption_controls,
                tool == ToolKind::SecurePdf
            );
        }
    }
}
