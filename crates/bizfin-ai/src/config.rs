//! # AI Configuration
//!
//! Settings for the hosted model: credentials, endpoint and limits.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GEMINI_API_KEY=...   (API_KEY is accepted as a fallback)           │
//! │     BIZFIN_AI_MODEL=gemini-3-flash-preview                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bizfinance/ai.toml (Linux)                               │
//! │     ~/Library/Application Support/com.bizfin.bizfinance/ai.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no API key, public Gemini endpoint                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # ai.toml
//! [gemini]
//! api_key = "AIza..."
//! model = "gemini-3-flash-preview"
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! timeout_secs = 60
//! report_temperature = 0.7
//!
//! [limits]
//! max_attachment_bytes = 10485760
//! report_invoice_limit = 15
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{AiError, AiResult};

// =============================================================================
// Gemini Settings
// =============================================================================

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// API key. Without one, reports return a notice and extraction fails
    /// with `NotConfigured`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name used for every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature for written reports.
    #[serde(default = "default_report_temperature")]
    pub report_temperature: f32,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_report_temperature() -> f32 {
    0.7
}

impl Default for GeminiSettings {
    fn default() -> Self {
        GeminiSettings {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            report_temperature: default_report_temperature(),
        }
    }
}

impl GeminiSettings {
    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Size limits applied before anything is sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitSettings {
    /// Largest invoice image accepted for extraction (bytes).
    #[serde(default = "default_max_attachment")]
    pub max_attachment_bytes: usize,

    /// How many recent invoices are listed in a report prompt.
    #[serde(default = "default_report_invoice_limit")]
    pub report_invoice_limit: usize,
}

fn default_max_attachment() -> usize {
    bizfin_core::MAX_ATTACHMENT_BYTES
}

fn default_report_invoice_limit() -> usize {
    15
}

impl Default for LimitSettings {
    fn default() -> Self {
        LimitSettings {
            max_attachment_bytes: default_max_attachment(),
            report_invoice_limit: default_report_invoice_limit(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete AI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub gemini: GeminiSettings,

    #[serde(default)]
    pub limits: LimitSettings,
}

impl AiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (ai.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AiResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Loads config or returns default if load fails.
    ///
    /// Environment overrides are still applied to the defaults. If they
    /// are invalid too, plain defaults are used.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load_or_default_with(config_path, |key| std::env::var(key).ok())
    }

    fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> AiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading AI config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    fn load_or_default_with<F>(config_path: Option<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load_with(config_path, &lookup).unwrap_or_else(|e| {
            warn!("Failed to load AI config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_overrides(&lookup);
            match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    warn!("Ignoring environment overrides: {}", e);
                    Self::default()
                }
            }
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> AiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| AiError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AiError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| AiError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "AI config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AiResult<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(AiError::InvalidConfig("model must not be empty".into()));
        }

        let url = &self.gemini.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AiError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.gemini.timeout_secs == 0 {
            return Err(AiError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        let temperature = self.gemini.report_temperature;
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(AiError::InvalidConfig(
                "report_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.limits.max_attachment_bytes == 0 {
            return Err(AiError::InvalidConfig(
                "max_attachment_bytes must be greater than 0".into(),
            ));
        }

        if self.limits.report_invoice_limit == 0 {
            return Err(AiError::InvalidConfig(
                "report_invoice_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`AiConfig::load`]).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            debug!("Using API key from environment");
            self.gemini.api_key = Some(key);
        }

        if let Some(model) = lookup("BIZFIN_AI_MODEL") {
            debug!(model = %model, "Overriding model from environment");
            self.gemini.model = model;
        }

        if let Some(url) = lookup("BIZFIN_AI_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.gemini.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(timeout) = lookup("BIZFIN_AI_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.gemini.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid BIZFIN_AI_TIMEOUT_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bizfin", "bizfinance")
            .map(|dirs| dirs.config_dir().join("ai.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AiConfig::default();
        assert_eq!(config.gemini.model, "gemini-3-flash-preview");
        assert!(config.gemini.api_key().is_none());
        assert_eq!(config.limits.report_invoice_limit, 15);
        assert_eq!(config.limits.max_attachment_bytes, 10 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AiConfig::default();

        config.gemini.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.gemini.base_url = "http://127.0.0.1:9000".to_string();
        assert!(config.validate().is_ok());

        config.gemini.timeout_secs = 0;
        assert!(config.validate().is_err());
        config.gemini.timeout_secs = 30;

        config.gemini.report_temperature = 3.5;
        assert!(config.validate().is_err());
        config.gemini.report_temperature = 0.7;

        config.limits.report_invoice_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AiConfig::default();
        config.apply_overrides(lookup_from(&[
            ("API_KEY", "fallback-key"),
            ("BIZFIN_AI_MODEL", "gemini-2.5-pro"),
            ("BIZFIN_AI_BASE_URL", "http://localhost:8080/v1beta/"),
            ("BIZFIN_AI_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.gemini.api_key(), Some("fallback-key"));
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.base_url, "http://localhost:8080/v1beta");
        assert_eq!(config.gemini.timeout_secs, 5);
    }

    #[test]
    fn test_gemini_key_wins_over_fallback() {
        let mut config = AiConfig::default();
        config.apply_overrides(lookup_from(&[
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "fallback"),
        ]));
        assert_eq!(config.gemini.api_key(), Some("primary"));
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let mut config = AiConfig::default();
        config.apply_overrides(lookup_from(&[("BIZFIN_AI_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.gemini.timeout_secs, 60);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config = AiConfig::default();
        config.gemini.api_key = Some("   ".to_string());
        assert!(config.gemini.api_key().is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AiConfig = toml::from_str("[gemini]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.gemini.api_key(), Some("abc"));
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.limits, LimitSettings::default());
    }

    #[test]
    fn test_toml_serialization() {
        let config = AiConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[gemini]"));
        assert!(toml_str.contains("[limits]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let path = std::env::temp_dir().join(format!("bizfin-ai-{}.toml", std::process::id()));
        std::fs::write(&path, "[limits]\nreport_invoice_limit = 5\n").unwrap();

        let config = AiConfig::load(Some(path.clone())).unwrap();
        assert_eq!(config.limits.report_invoice_limit, 5);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_fallback_rejects_invalid_overrides() {
        let missing = std::env::temp_dir().join(format!("bizfin-ai-missing-{}.toml", std::process::id()));

        let config = AiConfig::load_or_default_with(
            Some(missing),
            lookup_from(&[("GEMINI_API_KEY", "abc"), ("BIZFIN_AI_TIMEOUT_SECS", "0")]),
        );

        assert_eq!(config.gemini.timeout_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fallback_keeps_valid_overrides() {
        let path = std::env::temp_dir().join(format!("bizfin-ai-broken-{}.toml", std::process::id()));
        std::fs::write(&path, "[gemini\nmodel = ").unwrap();

        let config = AiConfig::load_or_default_with(
            Some(path.clone()),
            lookup_from(&[("GEMINI_API_KEY", "abc"), ("BIZFIN_AI_TIMEOUT_SECS", "30")]),
        );

        assert_eq!(config.gemini.api_key(), Some("abc"));
        assert_eq!(config.gemini.timeout_secs, 30);

        std::fs::remove_file(&path).unwrap();
    }
}
