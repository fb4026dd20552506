//! # Candidate Invoices
//!
//! Typed view of the model's extraction JSON and its normalization into an
//! [`InvoiceDraft`].
//!
//! ## Boundary Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  model JSON ──► CandidateInvoice ──► into_draft() ──► InvoiceDraft      │
//! │                 (typed, lenient     (defaults applied ONCE here)        │
//! │                  about numbers)                                         │
//! │                                                                         │
//! │  missing / bad value           becomes                                  │
//! │  ───────────────────────────   ──────────────────────────────────────   │
//! │  item name                     "Sản phẩm"                               │
//! │  item unit                     "Cái"                                    │
//! │  quantity (absent, ≤ 0)        1                                        │
//! │  price (absent, < 0)           0                                        │
//! │  taxRate (absent, > 100%)      0%                                       │
//! │  type                          caller's direction                       │
//! │  date                          caller's date                            │
//! │  category (unknown label)      Khác                                     │
//! │  over-long names / units       cut to the entry limits                  │
//! │  unusable item                 skipped (logged)                         │
//! │  items beyond the 100th        dropped (logged)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result is a draft, not an invoice: the user still confirms it and
//! `build()` still enforces the counterparty and item rules.

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::str::FromStr;
use tracing::warn;

use bizfin_core::{
    Category, Direction, InvoiceDraft, Money, Quantity, DEFAULT_ITEM_NAME, DEFAULT_UNIT,
    MAX_LINE_ITEMS, MAX_NAME_CHARS, MAX_UNIT_CHARS,
};

use crate::error::{AiError, AiResult};

// =============================================================================
// Numbers
// =============================================================================

/// A number the model may send as `12`, `12.5` or `"12"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(serde_json::Number),
    Text(String),
}

impl Numeric {
    /// Exact decimal value, or `None` if it is not a number at all.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Numeric::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Decimal::from(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Decimal::from(u))
                } else {
                    n.as_f64().and_then(Decimal::from_f64)
                }
            }
            Numeric::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
        }
    }
}

// =============================================================================
// Candidate Types
// =============================================================================

/// One extracted line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: Option<Numeric>,
    #[serde(default)]
    pub price: Option<Numeric>,
}

/// The extraction answer, field for field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInvoice {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// VAT as a percentage (10 = 10%).
    #[serde(default)]
    pub tax_rate: Option<Numeric>,
    /// `OUTPUT` (sale) or `INPUT` (purchase).
    #[serde(default, rename = "type")]
    pub direction: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<CandidateItem>>,
}

/// Parses the model's answer. A Markdown code fence around the JSON is
/// tolerated; anything that is not the expected object is an error.
pub fn parse_candidate(raw: &str) -> AiResult<CandidateInvoice> {
    let json = strip_code_fence(raw);
    if json.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    serde_json::from_str(json).map_err(|e| AiError::MalformedResponse(e.to_string()))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            // drop an optional language tag on the opening fence
            let body = rest.split_once('\n').map_or("", |(_, body)| body);
            body.trim_end().trim_end_matches("```").trim()
        }
        None => trimmed,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Normalization
// =============================================================================

impl CandidateItem {
    /// Quantity, defaulting to 1 when absent or not positive.
    pub fn quantity(&self) -> Quantity {
        self.quantity
            .as_ref()
            .and_then(Numeric::to_decimal)
            .map(Quantity::new)
            .filter(Quantity::is_positive)
            .unwrap_or_else(Quantity::one)
    }

    /// Unit price in whole đồng, defaulting to 0 when absent or negative.
    pub fn unit_price(&self) -> Money {
        self.price
            .as_ref()
            .and_then(Numeric::to_decimal)
            .filter(|p| !p.is_sign_negative())
            .and_then(|p| {
                p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_i64()
            })
            .map(Money::from_dong)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or(DEFAULT_ITEM_NAME)
    }

    pub fn unit(&self) -> &str {
        non_blank(self.unit.as_deref()).unwrap_or(DEFAULT_UNIT)
    }
}

impl CandidateInvoice {
    /// Applies the boundary defaults and loads the result into a draft.
    ///
    /// `fallback_direction` and `fallback_date` are used when the model did
    /// not say (or said something unusable).
    pub fn into_draft(
        self,
        fallback_direction: Direction,
        fallback_date: NaiveDate,
    ) -> AiResult<InvoiceDraft> {
        let direction = match non_blank(self.direction.as_deref()) {
            Some(raw) => raw.parse::<Direction>().unwrap_or_else(|_| {
                warn!(value = raw, "Unknown invoice type from model");
                fallback_direction
            }),
            None => fallback_direction,
        };

        let date = match non_blank(self.date.as_deref()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
                warn!(value = raw, "Unparseable invoice date from model");
                fallback_date
            }),
            None => fallback_date,
        };

        let mut draft = InvoiceDraft::new(direction, date);

        if let Some(name) = non_blank(self.customer_name.as_deref()) {
            draft.counterparty_name = truncate_chars(name, MAX_NAME_CHARS);
        }
        if let Some(description) = non_blank(self.description.as_deref()) {
            draft.description = description.to_string();
        }
        if let Some(label) = non_blank(self.category.as_deref()) {
            draft.category = Category::from_label_or_other(label);
        }

        let tax_pct = self
            .tax_rate
            .as_ref()
            .and_then(Numeric::to_decimal)
            .and_then(|d| d.to_f64())
            .unwrap_or(0.0);
        if draft.set_tax_rate_percentage(tax_pct).is_err() {
            warn!(tax_pct, "Tax rate from model out of range, using 0%");
            draft.set_tax_rate_percentage(0.0)?;
        }

        let items = self.items.unwrap_or_default();
        let offered = items.len();
        for (index, item) in items.into_iter().enumerate() {
            if draft.items().len() >= MAX_LINE_ITEMS {
                warn!(offered, kept = MAX_LINE_ITEMS, "Too many items from model, dropping the rest");
                break;
            }

            let name = truncate_chars(item.name(), MAX_NAME_CHARS);
            let unit = truncate_chars(item.unit(), MAX_UNIT_CHARS);
            if let Err(e) = draft.add_item(&name, &unit, item.quantity(), item.unit_price()) {
                warn!(index, error = %e, "Skipping unusable item from model");
            }
        }

        Ok(draft)
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.trim().chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizfin_core::TaxRate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
    }

    #[test]
    fn test_numeric_accepts_numbers_and_strings() {
        let values: Vec<Numeric> = serde_json::from_str(r#"[2, 2.5, "3", " 4.25 ", "1e3", "abc"]"#).unwrap();
        let decimals: Vec<Option<Decimal>> = values.iter().map(Numeric::to_decimal).collect();

        assert_eq!(decimals[0], Some(Decimal::from(2)));
        assert_eq!(decimals[1], Decimal::from_str("2.5").ok());
        assert_eq!(decimals[2], Some(Decimal::from(3)));
        assert_eq!(decimals[3], Decimal::from_str("4.25").ok());
        assert_eq!(decimals[4], Some(Decimal::from(1000)));
        assert_eq!(decimals[5], None);
    }

    #[test]
    fn test_parse_full_answer() {
        let raw = r#"{
            "customerName": "Công ty ABC",
            "date": "2023-10-01",
            "description": "Bán phần mềm quản lý",
            "taxRate": 10,
            "type": "OUTPUT",
            "category": "Bán hàng hóa",
            "items": [{"name": "License Phần mềm Pro", "unit": "Năm", "quantity": 2, "price": 25000000}]
        }"#;

        let draft = parse_candidate(raw).unwrap().into_draft(Direction::Purchase, today()).unwrap();

        assert_eq!(draft.counterparty_name, "Công ty ABC");
        assert_eq!(draft.direction, Direction::Sale);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        assert_eq!(draft.category, Category::GoodsSales);
        assert_eq!(draft.tax_rate(), TaxRate::from_bps(1000));
        assert_eq!(draft.subtotal().dong(), 50_000_000);
        assert_eq!(draft.vat_amount().dong(), 5_000_000);
    }

    #[test]
    fn test_item_defaults() {
        let raw = r#"{
            "type": "INPUT",
            "items": [
                {"name": "", "quantity": 0, "price": -5},
                {"unit": " ", "quantity": "-3"},
                {"name": "Cà phê", "unit": "kg", "quantity": "0.5", "price": "180000"}
            ]
        }"#;

        let draft = parse_candidate(raw).unwrap().into_draft(Direction::Sale, today()).unwrap();
        let items = draft.items();

        assert_eq!(draft.direction, Direction::Purchase);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name(), "Sản phẩm");
        assert_eq!(items[0].unit(), "Cái");
        assert_eq!(items[0].quantity(), Quantity::one());
        assert!(items[0].unit_price().is_zero());
        assert_eq!(items[1].quantity(), Quantity::one());
        assert_eq!(items[1].unit(), "Cái");
        assert_eq!(items[2].line_total().dong(), 90_000);
    }

    #[test]
    fn test_fallbacks_and_missing_tax() {
        let raw = r#"{"customerName": "Anh Nam", "date": "hôm qua", "type": "REFUND", "category": "Văn phòng phẩm"}"#;

        let draft = parse_candidate(raw).unwrap().into_draft(Direction::Sale, today()).unwrap();

        assert_eq!(draft.direction, Direction::Sale);
        assert_eq!(draft.date, today());
        assert_eq!(draft.category, Category::Other);
        assert!(draft.tax_rate().is_zero());
        assert!(draft.items().is_empty());
    }

    #[test]
    fn test_out_of_range_tax_becomes_zero() {
        let raw = r#"{"taxRate": 250}"#;
        let draft = parse_candidate(raw).unwrap().into_draft(Direction::Sale, today()).unwrap();
        assert!(draft.tax_rate().is_zero());
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let raw = "```json\n{\"customerName\": \"Công ty ABC\"}\n```";
        let candidate = parse_candidate(raw).unwrap();
        assert_eq!(candidate.customer_name.as_deref(), Some("Công ty ABC"));
    }

    #[test]
    fn test_malformed_answers_are_rejected() {
        assert!(matches!(parse_candidate("   "), Err(AiError::EmptyResponse)));
        assert!(matches!(
            parse_candidate("Xin lỗi, tôi không đọc được hóa đơn."),
            Err(AiError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_candidate(r#"{"items": "nhiều"}"#),
            Err(AiError::MalformedResponse(_))
        ));
        assert!(matches!(parse_candidate("null"), Err(AiError::MalformedResponse(_))));
    }

    #[test]
    fn test_absurd_quantity_item_is_skipped() {
        let raw = r#"{"items": [
            {"name": "Ốc vít", "quantity": 5000000, "price": 100},
            {"name": "Bu lông", "quantity": 10, "price": 2000}
        ]}"#;
        let draft = parse_candidate(raw).unwrap().into_draft(Direction::Purchase, today()).unwrap();

        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].name(), "Bu lông");
        assert_eq!(draft.subtotal().dong(), 20_000);
    }

    #[test]
    fn test_oversized_answer_is_trimmed_to_limits() {
        let long_name = "Đ".repeat(250);
        let items: Vec<serde_json::Value> = (0..120)
            .map(|n| serde_json::json!({"name": format!("Mục {n}"), "unit": "Thùng carton lớn loại A", "quantity": 1, "price": 1000}))
            .collect();
        let mut answer = serde_json::json!({"customerName": long_name, "items": items});
        answer["items"][0]["name"] = serde_json::Value::String("X".repeat(300));

        let draft = parse_candidate(&answer.to_string())
            .unwrap()
            .into_draft(Direction::Sale, today())
            .unwrap();

        assert_eq!(draft.items().len(), MAX_LINE_ITEMS);
        assert_eq!(draft.items()[0].name().chars().count(), MAX_NAME_CHARS);
        assert_eq!(draft.items()[1].unit().chars().count(), MAX_UNIT_CHARS);
        assert_eq!(draft.counterparty_name.chars().count(), MAX_NAME_CHARS);
        assert!(draft.build().is_ok());
    }
}
