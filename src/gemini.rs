//! Gemini API client
//!
//! Every AI flow goes through the [`LanguageModel`] trait; [`GeminiClient`]
//! is the production implementation. Uses a long-lived reqwest::Client for
//! connection pooling. No retries: a failed call is returned to the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::error::KeuanganError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Image (or other binary) payload sent alongside a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMedia {
    pub mime_type: String,
    /// Base64 payload, without the `data:` prefix
    pub data: String,
}

/// One model invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub prompt: String,
    pub media: Option<InlineMedia>,
}

impl ModelRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            media: None,
        }
    }

    pub fn with_media(mut self, media: InlineMedia) -> Self {
        self.media = Some(media);
        self
    }
}

/// Anything that can turn a prompt into a (JSON) text reply
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, request: &ModelRequest) -> crate::Result<String>;
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> crate::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &ModelRequest) -> crate::Result<String> {
        if self.api_key.is_empty() {
            return Err(KeuanganError::Config(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let body = build_request(request);

        info!(model = %self.model, has_media = request.media.is_some(), "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                KeuanganError::LlmError(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response ({}): {}", status, error_text);
            return Err(KeuanganError::LlmError(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            KeuanganError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        let text = extract_text(&gemini_response)?;

        info!(
            finish_reason = ?gemini_response.candidates.first().and_then(|c| c.finish_reason.as_deref()),
            "Gemini response received"
        );

        Ok(text)
    }
}

fn build_request(request: &ModelRequest) -> GeminiRequest {
    let mut parts = vec![Part {
        text: Some(request.prompt.clone()),
        inline_data: None,
    }];

    if let Some(media) = &request.media {
        parts.push(Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: media.mime_type.clone(),
                data: media.data.clone(),
            }),
        });
    }

    GeminiRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: GenerationConfig {
            temperature: 0.4,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 2048,
            response_mime_type: "application/json".to_string(),
        },
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: &GeminiResponse) -> crate::Result<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| KeuanganError::LlmError("No response from Gemini API".to_string()))?;

    let text: String = candidate
        .content
        .as_ref()
        .map(|c| {
            c.parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(KeuanganError::LlmError(format!(
            "Empty response from Gemini (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ModelRequest::text("Extract the receipt").with_media(InlineMedia {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        });

        let json = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Extract the receipt");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(&response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_without_candidates_fails() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_text(&response),
            Err(KeuanganError::LlmError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = GeminiClient::new(String::new(), "gemini-2.0-flash".to_string()).unwrap();
        let result = client.generate(&ModelRequest::text("halo")).await;

        assert!(result.is_err());
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.to_lowercase().contains("gemini_api_key"));
    }
}
