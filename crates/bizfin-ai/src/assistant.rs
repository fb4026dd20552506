//! # Finance Assistant
//!
//! The three AI features, in one place:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  generate_report(invoices, summary) ──► String (Markdown or a notice)   │
//! │  extract_from_text(text, dir)       ──► AiResult<InvoiceDraft>          │
//! │  extract_from_image(bytes, mime, dir) ► AiResult<InvoiceDraft>          │
//! │                                                                         │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   Box<dyn GenerativeModel>  (GeminiClient, or none when unconfigured)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reports never fail: the caller always gets something to show. Extraction
//! returns an error instead of an empty result, and nothing is retried.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use bizfin_core::validation::validate_attachment_size;
use bizfin_core::{Direction, FinancialSummary, Invoice, InvoiceDraft, ValidationError};

use crate::candidate::parse_candidate;
use crate::config::{AiConfig, LimitSettings};
use crate::error::{AiError, AiResult};
use crate::gemini::GeminiClient;
use crate::prompts::{
    image_extraction_prompt, invoice_schema, report_prompt, text_extraction_prompt,
    EMPTY_REPORT_NOTICE, MISSING_KEY_NOTICE, REPORT_FAILED_NOTICE,
};
use crate::provider::{Attachment, GenerationRequest, GenerativeModel};

/// Report generation and invoice extraction on top of a generative model.
pub struct FinanceAssistant {
    model: Option<Box<dyn GenerativeModel>>,
    limits: LimitSettings,
    report_temperature: f32,
}

impl FinanceAssistant {
    /// Uses the given model.
    pub fn new(model: impl GenerativeModel + 'static, config: &AiConfig) -> Self {
        FinanceAssistant {
            model: Some(Box::new(model)),
            limits: config.limits.clone(),
            report_temperature: config.gemini.report_temperature,
        }
    }

    /// An assistant with no model: reports return the missing-key notice
    /// and extraction fails with `NotConfigured`.
    pub fn unconfigured(config: &AiConfig) -> Self {
        FinanceAssistant {
            model: None,
            limits: config.limits.clone(),
            report_temperature: config.gemini.report_temperature,
        }
    }

    /// Builds a Gemini-backed assistant, or an unconfigured one when there
    /// is no API key.
    pub fn from_config(config: &AiConfig) -> AiResult<Self> {
        if config.gemini.api_key().is_none() {
            info!("No Gemini API key configured; AI features disabled");
            return Ok(Self::unconfigured(config));
        }
        Ok(Self::new(GeminiClient::new(&config.gemini)?, config))
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    fn model(&self) -> AiResult<&dyn GenerativeModel> {
        self.model
            .as_deref()
            .ok_or_else(|| AiError::NotConfigured("Gemini API key not configured".to_string()))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Written analysis of the period, or a notice saying why there is none.
    pub async fn generate_report(&self, invoices: &[Invoice], summary: &FinancialSummary) -> String {
        if !self.is_configured() {
            return MISSING_KEY_NOTICE.to_string();
        }

        match self.try_generate_report(invoices, summary).await {
            Ok(report) => report,
            Err(AiError::EmptyResponse) => EMPTY_REPORT_NOTICE.to_string(),
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Report generation failed");
                REPORT_FAILED_NOTICE.to_string()
            }
        }
    }

    /// Same as [`FinanceAssistant::generate_report`] but with the error.
    pub async fn try_generate_report(
        &self,
        invoices: &[Invoice],
        summary: &FinancialSummary,
    ) -> AiResult<String> {
        let model = self.model()?;
        let prompt = report_prompt(invoices, summary, self.limits.report_invoice_limit);

        debug!(
            model = model.model_name(),
            invoices = invoices.len(),
            prompt_len = prompt.len(),
            "Requesting financial report"
        );

        let request = GenerationRequest::new(prompt).with_temperature(self.report_temperature);
        let report = model.generate(&request).await?;

        if report.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(report)
    }

    // =========================================================================
    // Extraction
    // =========================================================================

    /// Reads an invoice out of free text, dated relative to today.
    ///
    /// `direction` is the side being entered (sales or purchases); it is
    /// kept when the model does not say.
    pub async fn extract_from_text(
        &self,
        text: &str,
        direction: Direction,
    ) -> AiResult<InvoiceDraft> {
        self.extract_from_text_on(text, direction, Local::now().date_naive())
            .await
    }

    /// Reads an invoice out of free text, with an explicit "today".
    pub async fn extract_from_text_on(
        &self,
        text: &str,
        direction: Direction,
        today: NaiveDate,
    ) -> AiResult<InvoiceDraft> {
        if text.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "text".to_string(),
            }
            .into());
        }

        let model = self.model()?;
        let request = GenerationRequest::new(text_extraction_prompt(text, today))
            .with_json_schema(invoice_schema());

        debug!(model = model.model_name(), text_len = text.len(), "Extracting invoice from text");
        let answer = model.generate(&request).await?;
        Self::draft_from_answer(&answer, direction, today)
    }

    /// Reads an invoice out of a photo or scan, dated relative to today.
    pub async fn extract_from_image(
        &self,
        bytes: &[u8],
        mime_type: &str,
        direction: Direction,
    ) -> AiResult<InvoiceDraft> {
        self.extract_from_image_on(bytes, mime_type, direction, Local::now().date_naive())
            .await
    }

    /// Reads an invoice out of a photo or scan, with an explicit "today".
    ///
    /// Non-image types and files over the size limit are refused before
    /// any request is made.
    pub async fn extract_from_image_on(
        &self,
        bytes: &[u8],
        mime_type: &str,
        direction: Direction,
        today: NaiveDate,
    ) -> AiResult<InvoiceDraft> {
        let mime_type = mime_type.trim().to_lowercase();
        if !mime_type.starts_with("image/") {
            return Err(AiError::UnsupportedMimeType(mime_type));
        }
        let max = self.limits.max_attachment_bytes;
        validate_attachment_size(bytes.len(), max).map_err(|e| match e {
            ValidationError::OutOfRange { .. } => AiError::AttachmentTooLarge {
                size: bytes.len(),
                max,
            },
            other => other.into(),
        })?;

        let model = self.model()?;
        let request = GenerationRequest::new(image_extraction_prompt(today))
            .with_attachment(Attachment::from_bytes(mime_type.as_str(), bytes))
            .with_json_schema(invoice_schema());

        debug!(
            model = model.model_name(),
            mime_type = %mime_type,
            bytes = bytes.len(),
            "Extracting invoice from image"
        );
        let answer = model.generate(&request).await?;
        Self::draft_from_answer(&answer, direction, today)
    }

    fn draft_from_answer(
        answer: &str,
        direction: Direction,
        today: NaiveDate,
    ) -> AiResult<InvoiceDraft> {
        let draft = parse_candidate(answer)?.into_draft(direction, today)?;
        info!(
            direction = %draft.direction,
            items = draft.items().len(),
            subtotal = draft.subtotal().dong(),
            "Invoice extracted"
        );
        Ok(draft)
    }
}
