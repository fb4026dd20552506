//! # Invoice Draft
//!
//! The checked entry point for new invoices.
//!
//! ## Entry Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   InvoiceDraft::new(direction, date)                                    │
//! │        │   defaults: 10% VAT, "Bán hàng hóa", no items                 │
//! │        ▼                                                                │
//! │   add_item(name, unit, qty, price)  ◄── validated per item              │
//! │   remove_item(index)                                                    │
//! │   subtotal() / vat_amount() / total_due()   (live totals)               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   build()  ── counterparty required, ≥ 1 item ──►  Invoice (new UUID)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The draft never reads a clock: the caller supplies the invoice date.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{assemble_invoice, Category, Direction, Invoice, InvoiceLineItem, Quantity, TaxRate};
use crate::validation::{
    validate_counterparty_name, validate_item_name, validate_line_item_count, validate_quantity,
    validate_tax_rate, validate_tax_rate_percentage, validate_unit, validate_unit_price,
    ValidationResult,
};
use crate::{DEFAULT_UNIT, DEFAULT_VAT_RATE, DESCRIPTION_PREVIEW_CHARS};

/// An invoice being entered.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    /// Customer (sale) or supplier (purchase).
    pub counterparty_name: String,
    pub date: NaiveDate,
    pub direction: Direction,
    pub category: Category,
    /// Explicit description. When empty, `build` derives one from item names.
    pub description: String,
    tax_rate: TaxRate,
    items: Vec<InvoiceLineItem>,
}

impl InvoiceDraft {
    /// Starts an empty draft with the form defaults.
    pub fn new(direction: Direction, date: NaiveDate) -> Self {
        InvoiceDraft {
            counterparty_name: String::new(),
            date,
            direction,
            category: Category::default(),
            description: String::new(),
            tax_rate: DEFAULT_VAT_RATE,
            items: Vec::new(),
        }
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Sets the VAT rate. Rates above 100% are rejected.
    pub fn set_tax_rate(&mut self, rate: TaxRate) -> ValidationResult<()> {
        validate_tax_rate(rate)?;
        self.tax_rate = rate;
        Ok(())
    }

    /// Sets the VAT rate from a percentage (`8.0` → 8%).
    pub fn set_tax_rate_percentage(&mut self, pct: f64) -> ValidationResult<()> {
        validate_tax_rate_percentage(pct)?;
        self.set_tax_rate(TaxRate::from_percentage(pct))
    }

    /// Adds a line item.
    ///
    /// ## Rules
    /// - name must be non-empty (trimmed)
    /// - quantity must be > 0
    /// - unit price must be ≥ 0
    /// - an empty unit becomes "Cái"
    ///
    /// ## Example
    /// ```rust
    /// use bizfin_core::{Direction, InvoiceDraft, Money, Quantity};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2023, 10, 12).unwrap();
    /// let mut draft = InvoiceDraft::new(Direction::Purchase, date);
    /// draft
    ///     .add_item("Giấy A4 Double A", "Ram", Quantity::from_units(20), Money::from_dong(50_000))
    ///     .unwrap();
    ///
    /// assert_eq!(draft.subtotal().dong(), 1_000_000);
    /// assert_eq!(draft.vat_amount().dong(), 100_000);
    /// ```
    pub fn add_item(
        &mut self,
        name: &str,
        unit: &str,
        quantity: Quantity,
        unit_price: Money,
    ) -> CoreResult<&InvoiceLineItem> {
        validate_line_item_count(self.items.len())?;
        validate_item_name(name)?;
        validate_unit(unit)?;
        validate_quantity(quantity)?;
        validate_unit_price(unit_price)?;

        let unit = match unit.trim() {
            "" => DEFAULT_UNIT,
            u => u,
        };
        self.items
            .push(InvoiceLineItem::new(name.trim(), unit, quantity, unit_price));

        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Removes the line item at `index` and returns it.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<InvoiceLineItem> {
        if index >= self.items.len() {
            return Err(CoreError::LineItemNotFound {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[InvoiceLineItem] {
        &self.items
    }

    /// Pre-tax total of the current items.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(InvoiceLineItem::line_total).sum()
    }

    /// VAT on the subtotal at the draft's rate.
    pub fn vat_amount(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }

    /// Subtotal plus VAT.
    pub fn total_due(&self) -> Money {
        self.subtotal() + self.vat_amount()
    }

    /// The description `build` would use if none is set explicitly.
    ///
    /// Item names joined with ", ", cut to 50 characters, with "..." appended
    /// when there is more than one item.
    pub fn generated_description(&self) -> String {
        let joined = self
            .items
            .iter()
            .map(InvoiceLineItem::name)
            .collect::<Vec<_>>()
            .join(", ");
        let mut description: String = joined.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        if self.items.len() > 1 {
            description.push_str("...");
        }
        description
    }

    /// Validates the draft and produces an immutable invoice with a fresh id.
    pub fn build(self) -> CoreResult<Invoice> {
        validate_counterparty_name(&self.counterparty_name)?;
        if self.items.is_empty() {
            return Err(CoreError::EmptyInvoice);
        }

        let description = match self.description.trim() {
            "" => self.generated_description(),
            given => given.to_string(),
        };

        Ok(assemble_invoice(
            Uuid::new_v4().to_string(),
            self.date,
            self.counterparty_name.trim().to_string(),
            description,
            self.items,
            self.tax_rate,
            self.direction,
            self.category,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 12).unwrap()
    }

    fn stationery_draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new(Direction::Purchase, date());
        draft.counterparty_name = "Văn phòng phẩm Minh Châu".to_string();
        draft
            .add_item("Giấy A4 Double A", "Ram", Quantity::from_units(20), Money::from_dong(50_000))
            .unwrap();
        draft
            .add_item("Mực in Canon 2900", "Hộp", Quantity::from_units(2), Money::from_dong(500_000))
            .unwrap();
        draft
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = InvoiceDraft::new(Direction::Sale, date());
        assert_eq!(draft.tax_rate(), TaxRate::from_bps(1000));
        assert_eq!(draft.category, Category::GoodsSales);
        assert!(draft.items().is_empty());
        assert!(draft.subtotal().is_zero());
    }

    #[test]
    fn test_live_totals() {
        let draft = stationery_draft();
        assert_eq!(draft.subtotal().dong(), 2_000_000);
        assert_eq!(draft.vat_amount().dong(), 200_000);
        assert_eq!(draft.total_due().dong(), 2_200_000);
    }

    #[test]
    fn test_add_item_rejects_bad_input() {
        let mut draft = InvoiceDraft::new(Direction::Sale, date());

        let err = draft
            .add_item("  ", "Cái", Quantity::one(), Money::from_dong(1))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));

        assert!(draft
            .add_item("Item", "Cái", Quantity::from_units(0), Money::from_dong(1))
            .is_err());
        assert!(draft
            .add_item("Item", "Cái", Quantity::from_units(-2), Money::from_dong(1))
            .is_err());
        assert!(draft
            .add_item("Item", "Cái", Quantity::one(), Money::from_dong(-1))
            .is_err());

        assert!(draft.items().is_empty());
    }

    #[test]
    fn test_free_item_and_default_unit() {
        let mut draft = InvoiceDraft::new(Direction::Sale, date());
        let item = draft
            .add_item("Quà tặng", "", Quantity::one(), Money::zero())
            .unwrap();
        assert_eq!(item.unit(), "Cái");
        assert!(item.line_total().is_zero());
    }

    #[test]
    fn test_remove_item() {
        let mut draft = stationery_draft();
        let removed = draft.remove_item(0).unwrap();
        assert_eq!(removed.name(), "Giấy A4 Double A");
        assert_eq!(draft.subtotal().dong(), 1_000_000);

        assert!(matches!(
            draft.remove_item(5),
            Err(CoreError::LineItemNotFound { index: 5, len: 1 })
        ));
    }

    #[test]
    fn test_build_requires_counterparty() {
        let mut draft = stationery_draft();
        draft.counterparty_name = "   ".to_string();
        assert!(matches!(draft.build(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_build_requires_items() {
        let mut draft = InvoiceDraft::new(Direction::Sale, date());
        draft.counterparty_name = "Công ty ABC".to_string();
        assert!(matches!(draft.build(), Err(CoreError::EmptyInvoice)));
    }

    #[test]
    fn test_build_produces_consistent_invoice() {
        let invoice = stationery_draft().build().unwrap();

        assert!(Uuid::parse_str(invoice.id()).is_ok());
        assert_eq!(invoice.amount().dong(), 2_000_000);
        assert_eq!(invoice.line_items().len(), 2);
        assert_eq!(invoice.direction(), Direction::Purchase);
        assert_eq!(invoice.date(), date());
    }

    #[test]
    fn test_build_assigns_distinct_ids() {
        let a = stationery_draft().build().unwrap();
        let b = stationery_draft().build().unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_generated_description() {
        let draft = stationery_draft();
        // "Giấy A4 Double A, Mực in Canon 2900" is under 50 chars
        assert_eq!(
            draft.generated_description(),
            "Giấy A4 Double A, Mực in Canon 2900..."
        );

        let mut single = InvoiceDraft::new(Direction::Sale, date());
        single
            .add_item("License Phần mềm Pro", "Năm", Quantity::from_units(2), Money::from_dong(25_000_000))
            .unwrap();
        assert_eq!(single.generated_description(), "License Phần mềm Pro");
    }

    #[test]
    fn test_generated_description_is_cut_to_fifty_chars() {
        let mut draft = InvoiceDraft::new(Direction::Sale, date());
        draft
            .add_item(&"Đ".repeat(60), "Cái", Quantity::one(), Money::from_dong(1))
            .unwrap();
        assert_eq!(draft.generated_description().chars().count(), 50);
    }

    #[test]
    fn test_explicit_description_wins() {
        let mut draft = stationery_draft();
        draft.description = "Giấy in, mực in".to_string();
        assert_eq!(draft.build().unwrap().description(), "Giấy in, mực in");
    }

    #[test]
    fn test_tax_rate_setters() {
        let mut draft = InvoiceDraft::new(Direction::Sale, date());
        draft.set_tax_rate_percentage(8.0).unwrap();
        assert_eq!(draft.tax_rate().bps(), 800);
        assert!(draft.set_tax_rate_percentage(120.0).is_err());
        assert!(draft.set_tax_rate(TaxRate::from_bps(10001)).is_err());
        assert_eq!(draft.tax_rate().bps(), 800);
    }
}
