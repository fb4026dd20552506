//! Gemini provider.
//!
//! Calls `POST {base_url}/models/{model}:generateContent` with the key in
//! the `x-goog-api-key` header. One HTTP request per call; failures are
//! mapped onto [`AiError`] and returned as-is.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiSettings;
use crate::error::{AiError, AiResult};
use crate::provider::{GenerationRequest, GenerativeModel};

/// Finish reasons that mean the answer was withheld.
const BLOCKED_FINISH_REASONS: [&str; 4] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Builds a client from settings. Fails when no API key is set.
    pub fn new(settings: &GeminiSettings) -> AiResult<Self> {
        let api_key = settings
            .api_key()
            .ok_or_else(|| AiError::NotConfigured("Gemini API key not configured".to_string()))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AiError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout_secs: settings.timeout_secs,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts = vec![ContentPart::Text {
            text: request.prompt.clone(),
        }];
        if let Some(attachment) = &request.attachment {
            parts.push(ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type: attachment.mime_type.clone(),
                    data: attachment.data.clone(),
                },
            });
        }

        let generation_config =
            if request.temperature.is_none() && request.response_schema.is_none() {
                None
            } else {
                Some(GenerationConfig {
                    temperature: request.temperature,
                    response_mime_type: request
                        .response_schema
                        .as_ref()
                        .map(|_| "application/json".to_string()),
                    response_schema: request.response_schema.clone(),
                })
            };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> AiResult<String> {
        let body = Self::build_body(request);

        tracing::debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            has_attachment = request.attachment.is_some(),
            json_mode = request.response_schema.is_some(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout(self.timeout_secs)
                } else {
                    AiError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Gemini API returned an error");

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(AiError::RateLimited);
            }

            return Err(AiError::Api {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            });
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        extract_text(api_response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pulls the answer text out of a response, or says why there is none.
fn extract_text(response: GenerateContentResponse) -> AiResult<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        tracing::warn!(reason, "Gemini blocked the prompt");
        return Err(AiError::ContentFiltered);
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(AiError::EmptyResponse)?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKED_FINISH_REASONS.contains(&reason) {
            return Err(AiError::ContentFiltered);
        }
    }

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(text),
            _ => None,
        })
        .collect();

    if let Some(usage) = response.usage_metadata {
        tracing::debug!(
            input_tokens = usage.prompt_token_count.unwrap_or(0),
            output_tokens = usage.candidates_token_count.unwrap_or(0),
            "Gemini response received"
        );
    }

    if text.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

/// Google error bodies look like `{"error": {"message": "..."}}`; fall back
/// to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(500).collect())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
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
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
