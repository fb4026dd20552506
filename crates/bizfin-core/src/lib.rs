//! # bizfin-core: Pure Bookkeeping Logic for BizFinance
//!
//! This crate is the **heart** of BizFinance. It holds the invoice data
//! model and the financial rollup as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       BizFinance Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (web UI or `bizfin` CLI)              │   │
//! │  │    Invoice form ──► Invoice list ──► Dashboard ──► AI report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bizfin-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │   draft   │  │   │
//! │  │   │  Invoice  │  │   Money   │  │ compute_  │  │ line-item │  │   │
//! │  │   │  Category │  │  TaxRate  │  │  summary  │  │   entry   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bizfin-ai (Gemini collaborator)                 │   │
//! │  │         report prompts, invoice extraction from text/image      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, InvoiceLineItem, Category, TaxRate, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - The financial summary rollup
//! - [`draft`] - Validated invoice entry (line items, description, id)
//! - [`book`] - Owned invoice collection
//! - [`format`] - vi-VN currency rendering
//! - [`sample`] - Representative invoices for demos and tests
//! - [`error`] - Domain error types
//! - [`validation`] - Entry-boundary validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bizfin_core::ledger::compute_summary;
//! use bizfin_core::sample::sample_invoices;
//!
//! let invoices = sample_invoices();
//! let summary = compute_summary(&invoices);
//!
//! assert_eq!(summary.gross_profit, summary.total_revenue - summary.total_cost);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod book;
pub mod draft;
pub mod error;
pub mod format;
pub mod ledger;
pub mod money;
pub mod sample;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use book::InvoiceBook;
pub use draft::InvoiceDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use format::{format_currency, format_decimal_currency};
pub use ledger::compute_summary;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Corporate income tax rate applied to positive gross profit (20%).
pub const CIT_RATE: TaxRate = TaxRate::from_bps(2000);

/// VAT rate preselected on a new invoice (10%).
pub const DEFAULT_VAT_RATE: TaxRate = TaxRate::from_bps(1000);

/// Unit used when a line item does not name one.
pub const DEFAULT_UNIT: &str = "Cái";

/// Item name used when an extracted line item has none.
pub const DEFAULT_ITEM_NAME: &str = "Sản phẩm";

/// Maximum characters in a counterparty or item name.
pub const MAX_NAME_CHARS: usize = 200;

/// Maximum characters in a unit of measure.
pub const MAX_UNIT_CHARS: usize = 20;

/// Maximum line items on a single invoice.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity on a single line item.
///
/// ## Business Reason
/// Catches typing slips (an extra zero or two) before they reach the ledger.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

/// Maximum size of an invoice image handed to the extraction service (10 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Number of characters kept from the joined item names in a generated
/// invoice description.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 50;
