//! # bizfin-ai: AI Collaborator for BizFinance
//!
//! Written financial reports and invoice entry from text or photos, backed
//! by Google's Gemini API.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CLI / UI                                                               │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  FinanceAssistant ── prompts ──► GenerativeModel ──► Gemini (HTTPS)     │
//! │    │                                   │                                │
//! │    │                 ◄── text / JSON ──┘                                │
//! │    ▼                                                                    │
//! │  report String      CandidateInvoice ──► InvoiceDraft (bizfin-core)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`assistant`] - Report and extraction entry points
//! - [`candidate`] - Typed extraction answer and its normalization
//! - [`config`] - `ai.toml` + environment configuration
//! - [`error`] - AI error types
//! - [`gemini`] - Gemini `generateContent` client
//! - [`prompts`] - Prompt text and response schema
//! - [`provider`] - The `GenerativeModel` trait

pub mod assistant;
pub mod candidate;
pub mod config;
pub mod error;
pub mod gemini;
pub mod prompts;
pub mod provider;

pub use assistant::FinanceAssistant;
pub use candidate::{parse_candidate, CandidateInvoice};
pub use config::AiConfig;
pub use error::{AiError, AiResult};
pub use gemini::GeminiClient;
pub use provider::{Attachment, GenerationRequest, GenerativeModel};
