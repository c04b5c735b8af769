// SPDX-License-Identifier: MIT
//
// snapdoc-core — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod tools;
pub mod types;

pub use config::AppConfig;
pub use error::SnapdocError;
pub use tools::{ToolCapabilities, ToolCategory, ToolKind};
pub use types::*;
