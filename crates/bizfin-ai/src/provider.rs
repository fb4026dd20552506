//! Generative model abstraction.
//!
//! The assistant talks to a [`GenerativeModel`], never to HTTP directly, so
//! the Gemini client can be swapped for a scripted model in tests.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AiResult;

/// Inline binary payload sent alongside the prompt (an invoice photo).
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub mime_type: String,
    /// Base64 (standard alphabet, padded).
    pub data: String,
}

impl Attachment {
    /// Encodes raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Attachment {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }
}

/// One request to the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub attachment: Option<Attachment>,
    /// Sampling temperature. `None` leaves the model default.
    pub temperature: Option<f32>,
    /// When set, the model is asked for JSON matching this schema.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        GenerationRequest {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// A text-generating model.
///
/// One call, one request: implementations do not retry.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the model's text answer.
    async fn generate(&self, request: &GenerationRequest) -> AiResult<String>;

    /// Name used in logs.
    fn model_name(&self) -> &str;
}
