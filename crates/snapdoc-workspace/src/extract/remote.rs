// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use snapdoc_core::config::AppConfig;
use snapdoc_core::error::SnapdocError;
use tracing::{debug, instrument, warn};

use super::TextExtractor;

/// Instruction sent alongside each image.
const EXTRACTION_PROMPT: &str = "Extract all legible text from this image. \
Return only the extracted text, preserving layout where possible. \
If there is no text, reply with 'No text detected'.";

/// Reply substituted when the model returns an empty candidate list.
const NO_TEXT_REPLY: &str = "No text detected.";

/// Text extraction backed by the Gemini `generateContent` REST endpoint.
///
/// The image travels inline as base64; no upload step and nothing is
/// persisted remotely beyond the provider's own handling.
pub struct GeminiVisionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiVisionClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            model,
            api_key,
        }
    }

    /// Build a client from configuration, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &AppConfig) -> Result<Self, SnapdocError> {
        let api_key = std::env::var(&config.extraction_api_key_env).map_err(|_| {
            SnapdocError::Extraction(format!(
                "missing API key environment variable {}",
                config.extraction_api_key_env
            ))
        })?;
        Ok(Self::new(
            config.extraction_base_url.clone(),
            config.extraction_model.clone(),
            api_key,
        ))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextExtractor for GeminiVisionClient {
    #[instrument(skip(self, image_bytes), fields(model = %self.model, bytes = image_bytes.len()))]
    async fn extract(&self, image_bytes: &[u8], mime_type: &str) -> Result<String, SnapdocError> {
        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": base64::engine::general_purpose::STANDARD.encode(image_bytes),
                        }
                    },
                    { "text": EXTRACTION_PROMPT },
                ]
            }]
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SnapdocError::Extraction(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "extraction endpoint returned an error");
            return Err(SnapdocError::Extraction(format!(
                "endpoint returned {status}: {detail}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SnapdocError::Extraction(format!("malformed response: {e}")))?;

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_TEXT_REPLY)
            .to_string();

        debug!(chars = text.len(), "extraction response parsed");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = GeminiVisionClient::new(
            "https://generativelanguage.googleapis.com/v1beta/".into(),
            "gemini-2.5-flash".into(),
            "k".into(),
        );
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn prompt_requests_layout_preserving_text() {
        assert!(EXTRACTION_PROMPT.contains("preserving layout"));
        assert!(EXTRACTION_PROMPT.contains("No text detected"));
    }
}
