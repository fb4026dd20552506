//! # Domain Types
//!
//! Core domain types used throughout BizFinance.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │ InvoiceLineItem │   │FinancialSummary │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  name, unit     │   │  revenue, cost  │       │
//! │  │  date           │   │  quantity       │   │  VAT in / out   │       │
//! │  │  counterparty   │   │  unit_price     │   │  CIT, net       │       │
//! │  │  amount         │   │  line_total     │   │  (derived only) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   Direction     │   │    Category     │       │
//! │  │  bps (u32)      │   │  Sale           │   │  closed set of  │       │
//! │  │  1000 = 10%     │   │  Purchase       │   │  seven entries  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Fields Are Never Trusted
//! `line_total` and `amount` are recomputed whenever an item or invoice is
//! built or deserialized. Incoming JSON may carry them; they are ignored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// Vietnamese VAT rates are 0%, 5%, 8% and 10% → 0, 500, 800, 1000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (10.0 → 1000 bps).
    ///
    /// Negative or non-finite input saturates to zero; range checks belong
    /// to [`crate::validation::validate_tax_rate_percentage`].
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact fraction (1000 bps → 0.1).
    #[inline]
    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// `10%`, `8.5%`
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// An exact line-item quantity (2 licences, 0.5 kg, 12.25 hours).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Wraps an exact decimal quantity.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Quantity(value)
    }

    /// A whole number of units.
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Quantity(Decimal::from(units))
    }

    /// One unit, the default for extracted items with no quantity.
    #[inline]
    pub fn one() -> Self {
        Quantity(Decimal::ONE)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Checks if the quantity is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::one()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Quantity)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Which side of the ledger an invoice sits on.
///
/// The extraction service speaks in `OUTPUT` (sales) and `INPUT`
/// (purchases); both spellings are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Output invoice: revenue and output VAT.
    #[default]
    Sale,
    /// Input invoice: cost and creditable input VAT.
    Purchase,
}

impl Direction {
    /// Short Vietnamese tag used in listings and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Sale => "BÁN",
            Direction::Purchase => "MUA",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sale => write!(f, "sale"),
            Direction::Purchase => write!(f, "purchase"),
        }
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" | "output" | "out" => Ok(Direction::Sale),
            "purchase" | "input" | "in" => Ok(Direction::Purchase),
            _ => Err(ValidationError::NotAllowed {
                field: "direction".to_string(),
                allowed: vec!["sale".to_string(), "purchase".to_string()],
            }),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// Bookkeeping category, a fixed closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    GoodsSales,
    Services,
    RawMaterials,
    OperatingExpenses,
    Marketing,
    Payroll,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::GoodsSales,
        Category::Services,
        Category::RawMaterials,
        Category::OperatingExpenses,
        Category::Marketing,
        Category::Payroll,
        Category::Other,
    ];

    /// Vietnamese display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::GoodsSales => "Bán hàng hóa",
            Category::Services => "Cung cấp dịch vụ",
            Category::RawMaterials => "Nhập nguyên liệu",
            Category::OperatingExpenses => "Chi phí vận hành",
            Category::Marketing => "Marketing",
            Category::Payroll => "Lương nhân viên",
            Category::Other => "Khác",
        }
    }

    /// Looks a category up by its display label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Category> {
        let wanted = label.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
    }

    /// Label lookup that falls back to [`Category::Other`].
    pub fn from_label_or_other(label: &str) -> Category {
        Category::from_label(label).unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Invoice Line Item
// =============================================================================

/// A goods or service line on an invoice.
///
/// ## Invariant
/// `line_total == quantity × unit_price` at all times. Fields are private;
/// the setters recompute the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    name: String,
    unit: String,
    #[ts(as = "String")]
    quantity: Quantity,
    unit_price: Money,
    line_total: Money,
}

impl InvoiceLineItem {
    /// Creates a line item and computes its total.
    ///
    /// No validation happens here; [`crate::draft::InvoiceDraft::add_item`]
    /// is the checked entry point.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Quantity,
        unit_price: Money,
    ) -> Self {
        InvoiceLineItem {
            name: name.into(),
            unit: unit.into(),
            quantity,
            unit_price,
            line_total: unit_price.multiply_quantity(quantity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }

    /// Changes the quantity and recomputes the total.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
        self.line_total = self.unit_price.multiply_quantity(quantity);
    }

    /// Changes the unit price and recomputes the total.
    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price = unit_price;
        self.line_total = unit_price.multiply_quantity(self.quantity);
    }
}

/// Wire shape of a line item. Any `lineTotal` in the input is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRecord {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub quantity: Quantity,
    pub unit_price: Money,
}

impl From<LineItemRecord> for InvoiceLineItem {
    fn from(record: LineItemRecord) -> Self {
        InvoiceLineItem::new(record.name, record.unit, record.quantity, record.unit_price)
    }
}

impl<'de> Deserialize<'de> for InvoiceLineItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        LineItemRecord::deserialize(deserializer).map(InvoiceLineItem::from)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A sales or purchase invoice.
///
/// ## Lifecycle
/// ```text
/// InvoiceDraft::build() ──► Invoice ──► InvoiceBook::add()
///        (validated,          (immutable)       │
///         fresh UUID)                           ▼
///                                  InvoiceBook::remove(id) ──► dropped
/// ```
///
/// There is no edit path. Correcting an invoice means deleting it and
/// entering a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: String,
    #[ts(as = "String")]
    date: NaiveDate,
    counterparty_name: String,
    description: String,
    line_items: Vec<InvoiceLineItem>,
    /// Pre-tax total. Equals the sum of line totals when items exist.
    amount: Money,
    /// VAT rate in basis points (1000 = 10%).
    tax_rate_bps: u32,
    direction: Direction,
    category: Category,
}

impl Invoice {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn counterparty_name(&self) -> &str {
        &self.counterparty_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn line_items(&self) -> &[InvoiceLineItem] {
        &self.line_items
    }

    /// Pre-tax amount.
    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Returns the VAT rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// VAT on this invoice (`amount × rate`, rounded to the đồng).
    pub fn tax_amount(&self) -> Money {
        self.amount.calculate_tax(self.tax_rate())
    }

    /// Amount the counterparty pays, VAT included.
    pub fn total_with_tax(&self) -> Money {
        self.amount + self.tax_amount()
    }
}

/// Wire shape of an invoice.
///
/// Converting a record into an [`Invoice`] recomputes every line total and,
/// when line items exist, the amount. `amount` is only taken as given for
/// item-less records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: String,
    pub date: NaiveDate,
    pub counterparty_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line_items: Vec<LineItemRecord>,
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub tax_rate_bps: u32,
    pub direction: Direction,
    #[serde(default = "record_category_default")]
    pub category: Category,
}

fn record_category_default() -> Category {
    Category::Other
}

impl From<InvoiceRecord> for Invoice {
    fn from(record: InvoiceRecord) -> Self {
        let line_items: Vec<InvoiceLineItem> = record
            .line_items
            .into_iter()
            .map(InvoiceLineItem::from)
            .collect();

        let amount = if line_items.is_empty() {
            record.amount
        } else {
            line_items.iter().map(InvoiceLineItem::line_total).sum()
        };

        Invoice {
            id: record.id,
            date: record.date,
            counterparty_name: record.counterparty_name,
            description: record.description,
            line_items,
            amount,
            tax_rate_bps: record.tax_rate_bps,
            direction: record.direction,
            category: record.category,
        }
    }
}

impl<'de> Deserialize<'de> for Invoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        InvoiceRecord::deserialize(deserializer).map(Invoice::from)
    }
}

/// Assembles a validated invoice. Only the draft calls this.
#[allow(clippy::too_many_arguments)]
pub(crate) fn assemble_invoice(
    id: String,
    date: NaiveDate,
    counterparty_name: String,
    description: String,
    line_items: Vec<InvoiceLineItem>,
    tax_rate: TaxRate,
    direction: Direction,
    category: Category,
) -> Invoice {
    let amount = line_items.iter().map(InvoiceLineItem::line_total).sum();
    Invoice {
        id,
        date,
        counterparty_name,
        description,
        line_items,
        amount,
        tax_rate_bps: tax_rate.bps(),
        direction,
        category,
    }
}

// =============================================================================
// Financial Summary
// =============================================================================

/// The derived financial position of an invoice collection.
///
/// Never stored or mutated; always produced by
/// [`crate::ledger::compute_summary`].
///
/// Revenue, cost and gross profit are whole đồng. The tax-derived figures
/// are exact decimals and may carry fractions of a đồng; round them only
/// for display ([`crate::format::format_decimal_currency`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// Σ pre-tax amounts of sales.
    pub total_revenue: Money,
    /// Σ pre-tax amounts of purchases.
    pub total_cost: Money,
    /// Revenue minus cost.
    pub gross_profit: Money,
    /// Creditable VAT paid on purchases.
    #[ts(as = "String")]
    pub vat_input: Decimal,
    /// VAT collected on sales.
    #[ts(as = "String")]
    pub vat_output: Decimal,
    /// Output minus input VAT. Negative means an excess carried forward.
    #[ts(as = "String")]
    pub vat_payable: Decimal,
    /// Corporate income tax estimate (20% of positive gross profit).
    #[ts(as = "String")]
    pub cit_payable: Decimal,
    /// Gross profit minus CIT.
    #[ts(as = "String")]
    pub net_profit: Decimal,
}

// =============================================================================
// Unit Tests
// =============================================================================
