//! # Ledger Aggregator
//!
//! Rolls an invoice collection up into a [`FinancialSummary`].
//!
//! ## Rollup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   for each invoice:                                                     │
//! │       tax = amount × tax_rate                                           │
//! │       ┌──────────────┐                    ┌──────────────┐              │
//! │       │    SALE      │                    │   PURCHASE   │              │
//! │       │ revenue += a │                    │  cost += a   │              │
//! │       │ vat_out += t │                    │ vat_in += t  │              │
//! │       └──────┬───────┘                    └──────┬───────┘              │
//! │              └──────────────┬────────────────────┘                      │
//! │                             ▼                                           │
//! │   gross_profit = revenue − cost                                         │
//! │   vat_payable  = vat_out − vat_in          (may be negative)            │
//! │   cit_payable  = 20% × gross_profit        (0 when gross ≤ 0)           │
//! │   net_profit   = gross_profit − cit_payable                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Properties
//! - Pure and total: never fails, never allocates, never reads a clock.
//! - Order-independent: the four accumulators are plain sums.
//! - Exact: VAT and CIT are summed as unrounded decimals. Rounding to the
//!   đồng happens only when a figure is displayed.
//! - No validation: negative amounts flow through untouched. Invoices are
//!   checked at the entry boundary ([`crate::draft::InvoiceDraft`]).
//!
//! VAT is excluded from net profit; it is a liability, not an expense.

use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Direction, FinancialSummary, Invoice};
use crate::CIT_RATE;

// =============================================================================
// Aggregation
// =============================================================================

/// Computes the financial summary of a set of invoices.
///
/// Accepts anything that yields `&Invoice`: a slice, a `Vec` reference, an
/// [`crate::book::InvoiceBook`] iterator, or a filtered iterator.
///
/// ## Example
/// ```rust
/// use bizfin_core::ledger::compute_summary;
/// use bizfin_core::Invoice;
///
/// let empty: Vec<Invoice> = Vec::new();
/// let summary = compute_summary(&empty);
/// assert!(summary.total_revenue.is_zero());
/// assert!(summary.net_profit.is_zero());
/// ```
pub fn compute_summary<'a, I>(invoices: I) -> FinancialSummary
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut total_revenue = Money::zero();
    let mut total_cost = Money::zero();
    let mut vat_output = Decimal::ZERO;
    let mut vat_input = Decimal::ZERO;

    for invoice in invoices {
        // unrounded; a per-invoice round would drift with the invoice count
        let tax = invoice
            .amount()
            .to_decimal()
            .saturating_mul(invoice.tax_rate().as_fraction());
        match invoice.direction() {
            Direction::Sale => {
                total_revenue += invoice.amount();
                vat_output = vat_output.saturating_add(tax);
            }
            Direction::Purchase => {
                total_cost += invoice.amount();
                vat_input = vat_input.saturating_add(tax);
            }
        }
    }

    let gross_profit = total_revenue - total_cost;
    let cit_payable = if gross_profit.is_positive() {
        gross_profit.to_decimal() * CIT_RATE.as_fraction()
    } else {
        Decimal::ZERO
    };

    FinancialSummary {
        total_revenue,
        total_cost,
        gross_profit,
        vat_input,
        vat_output,
        vat_payable: vat_output.saturating_sub(vat_input),
        cit_payable,
        net_profit: gross_profit.to_decimal() - cit_payable,
    }
}

// =============================================================================
// Presentation Helpers
// =============================================================================

/// One slice of the tax distribution chart, rounded to the đồng.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxSlice {
    pub label: String,
    pub amount: Money,
}

impl FinancialSummary {
    /// VAT excess carried forward to the next period (input VAT above
    /// output VAT). Zero when VAT is payable.
    pub fn vat_credit(&self) -> Decimal {
        if self.vat_payable.is_sign_negative() {
            -self.vat_payable
        } else {
            Decimal::ZERO
        }
    }

    /// Total tax owed for the period: VAT payable (if any) plus CIT.
    pub fn total_tax_due(&self) -> Decimal {
        self.vat_payable.max(Decimal::ZERO) + self.cit_payable
    }

    /// Non-zero slices of the tax chart: VAT payable, CIT and profit after
    /// tax, each clamped at zero.
    ///
    /// Chart-only view. The summary's own figures stay signed and exact.
    pub fn tax_distribution(&self) -> Vec<TaxSlice> {
        [
            ("Thuế GTGT", self.vat_payable),
            ("Thuế TNDN", self.cit_payable),
            ("Lợi nhuận ròng", self.net_profit),
        ]
        .into_iter()
        .map(|(label, amount)| TaxSlice {
            label: label.to_string(),
            amount: Money::from_decimal_rounded(amount).clamp_non_negative(),
        })
        .filter(|slice| !slice.amount.is_zero())
        .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
