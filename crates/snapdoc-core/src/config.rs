// SPDX-License-Identifier: MIT
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::tools::ToolKind;
use crate::types::DocumentSettings;

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tool variant the workspace starts in.
    pub default_tool: ToolKind,
    /// Document settings applied to a fresh workspace.
    pub default_settings: DocumentSettings,
    /// Base URL of the remote text-extraction API.
    pub extraction_base_url: String,
    /// Vision model used for text extraction.
    pub extraction_model: String,
    /// Environment variable holding the extraction API key.
    pub extraction_api_key_env: String,
    /// Longest edge (pixels) of derived preview thumbnails.
    pub preview_max_edge: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_tool: ToolKind::Snap2Pdf,
            default_settings: DocumentSettings::default(),
            extraction_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            extraction_model: "gemini-2.5-flash".into(),
            extraction_api_key_env: "API_KEY".into(),
            preview_max_edge: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let back: AppConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.default_tool, config.default_tool);
        assert_eq!(back.extraction_model, config.extraction_model);
        assert_eq!(back.preview_max_edge, config.preview_max_edge);
    }
}
