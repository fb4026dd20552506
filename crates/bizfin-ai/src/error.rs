//! # AI Error Types
//!
//! Error types for calls to the generative model.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AI Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Transport    │  │     Model Output        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotConfigured  │  │  Network        │  │  ContentFiltered        │ │
//! │  │  InvalidConfig  │  │  Timeout        │  │  EmptyResponse          │ │
//! │  │  ConfigLoad/Save│  │  Api / 429      │  │  MalformedResponse      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │   Attachment    │  │  Core (wraps bizfin_core::CoreError)        │  │
//! │  │  TooLarge/Mime  │  │  extracted draft failed validation          │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bizfin_core::CoreError;
use thiserror::Error;

/// Result type alias for AI operations.
pub type AiResult<T> = Result<T, AiError>;

/// Everything that can go wrong between a request and a usable answer.
#[derive(Debug, Error)]
pub enum AiError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// No API key (or no model) available.
    #[error("AI service not configured: {0}")]
    NotConfigured(String),

    /// Configuration values failed validation.
    #[error("Invalid AI configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request never got a response.
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Non-success HTTP status from the model API.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// HTTP 429 from the model API.
    #[error("Rate limited by the AI service")]
    RateLimited,

    // =========================================================================
    // Model Output Errors
    // =========================================================================
    /// The model refused to answer on safety grounds.
    #[error("Response blocked by content filter")]
    ContentFiltered,

    /// The model answered with no text.
    #[error("AI service returned an empty response")]
    EmptyResponse,

    /// The answer was not the JSON shape we asked for.
    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    // =========================================================================
    // Attachment Errors
    // =========================================================================
    /// Invoice image larger than the configured limit.
    #[error("Attachment is {size} bytes; the limit is {max} bytes")]
    AttachmentTooLarge { size: usize, max: usize },

    /// Attachment is not an image.
    #[error("Unsupported attachment type: {0}")]
    UnsupportedMimeType(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// The extracted invoice failed domain validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<bizfin_core::ValidationError> for AiError {
    fn from(err: bizfin_core::ValidationError) -> Self {
        AiError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        AiError::MalformedResponse(err.to_string())
    }
}

impl From<std::io::Error> for AiError {
    fn from(err: std::io::Error) -> Self {
        AiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for AiError {
    fn from(err: toml::de::Error) -> Self {
        AiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for AiError {
    fn from(err: toml::ser::Error) -> Self {
        AiError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl AiError {
    /// Returns true if the user can reasonably try the same action again.
    ///
    /// Nothing retries automatically; this only decides what the caller
    /// tells the user.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::Network(_)
            | AiError::Timeout(_)
            | AiError::RateLimited
            | AiError::EmptyResponse => true,
            AiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AiError::NotConfigured(_)
                | AiError::InvalidConfig(_)
                | AiError::ConfigLoadFailed(_)
                | AiError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(AiError::Network("connection reset".into()).is_retryable());
        assert!(AiError::Timeout(60).is_retryable());
        assert!(AiError::RateLimited.is_retryable());
        assert!(AiError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());

        assert!(!AiError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_retryable());
        assert!(!AiError::ContentFiltered.is_retryable());
        assert!(!AiError::NotConfigured("no key".into()).is_retryable());
        assert!(!AiError::MalformedResponse("not json".into()).is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(AiError::NotConfigured("no key".into()).is_config_error());
        assert!(AiError::InvalidConfig("timeout".into()).is_config_error());
        assert!(!AiError::RateLimited.is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = AiError::AttachmentTooLarge {
            size: 11_000_000,
            max: 10_485_760,
        };
        assert_eq!(
            err.to_string(),
            "Attachment is 11000000 bytes; the limit is 10485760 bytes"
        );
    }

    #[test]
    fn test_core_errors_convert() {
        let err: AiError = CoreError::EmptyInvoice.into();
        assert!(matches!(err, AiError::Core(CoreError::EmptyInvoice)));
        assert_eq!(err.to_string(), "Invoice must have at least one line item");
    }
}
