// SPDX-License-Identifier: MIT
//
// snapdoc-document — Page rendering and PDF assembly for Snapdoc.
//
// Provides the pure transform engine (decode, rotate, filter) and the
// document assembler that lays out rendered pages, applies the compression
// quality lever, writes metadata, and encrypts the output when a password is
// set.

pub mod image;
pub mod pdf;

// Re-export the primary entry points so callers can use
// `snapdoc_document::DocumentAssembler` etc.
pub use image::renderer::{PageRenderer, render_page};
pub use pdf::assembler::{DocumentAssembler, PageInput};
