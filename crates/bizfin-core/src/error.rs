//! # Error Types
//!
//! Domain-specific error types for bizfin-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bizfin-core errors (this file)                                        │
//! │  ├── CoreError        - Invoice collection / draft failures            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bizfin-ai errors (separate crate)                                     │
//! │  └── AiError          - Model call / extraction failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AiError → CLI (anyhow)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger rollup itself has no error type: it is total on any invoice
//! slice. Every error here is raised at the entry boundary.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Invoice collection and draft errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No invoice with this id in the book.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// An invoice with this id is already in the book.
    #[error("Invoice already exists: {0}")]
    DuplicateInvoice(String),

    /// The draft has no line items.
    #[error("Invoice must have at least one line item")]
    EmptyInvoice,

    /// Line item index outside the draft's item list.
    #[error("Line item {index} does not exist (draft has {len} items)")]
    LineItemNotFound { index: usize, len: usize },

    /// Invoice list JSON could not be read or written.
    #[error("Invoice data error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the draft before an invoice enters the ledger.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid date, invalid decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
