//! Representative invoices for demos, the CLI's default data set and tests.
//!
//! October 2023: three sales (software licences, maintenance, an outsourced
//! project at 0% VAT) and two purchases (a server, stationery).

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::{Category, Direction, Invoice, InvoiceRecord, LineItemRecord, Quantity};

fn item(name: &str, unit: &str, quantity: i64, unit_price: i64) -> LineItemRecord {
    LineItemRecord {
        name: name.to_string(),
        unit: unit.to_string(),
        quantity: Quantity::from_units(quantity),
        unit_price: Money::from_dong(unit_price),
    }
}

#[allow(clippy::too_many_arguments)]
fn invoice(
    id: &str,
    (year, month, day): (i32, u32, u32),
    counterparty: &str,
    description: &str,
    items: Vec<LineItemRecord>,
    tax_bps: u32,
    direction: Direction,
    category: Category,
) -> Invoice {
    Invoice::from(InvoiceRecord {
        id: id.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN),
        counterparty_name: counterparty.to_string(),
        description: description.to_string(),
        line_items: items,
        amount: Money::zero(),
        tax_rate_bps: tax_bps,
        direction,
        category,
    })
}

/// The five sample invoices, oldest first.
pub fn sample_invoices() -> Vec<Invoice> {
    vec![
        invoice(
            "1",
            (2023, 10, 1),
            "Công ty ABC",
            "Bán phần mềm quản lý",
            vec![item("License Phần mềm Pro", "Năm", 2, 25_000_000)],
            1000,
            Direction::Sale,
            Category::GoodsSales,
        ),
        invoice(
            "2",
            (2023, 10, 5),
            "Nhà cung cấp XYZ",
            "Mua server",
            vec![item("Máy chủ Dell PowerEdge", "Cái", 1, 15_000_000)],
            1000,
            Direction::Purchase,
            Category::RawMaterials,
        ),
        invoice(
            "3",
            (2023, 10, 10),
            "Khách lẻ Nguyễn Văn A",
            "Phí bảo trì",
            vec![item("Dịch vụ bảo trì tháng 10", "Gói", 1, 5_000_000)],
            800,
            Direction::Sale,
            Category::Services,
        ),
        invoice(
            "4",
            (2023, 10, 12),
            "Văn phòng phẩm Minh Châu",
            "Giấy in, mực in",
            vec![
                item("Giấy A4 Double A", "Ram", 20, 50_000),
                item("Mực in Canon 2900", "Hộp", 2, 500_000),
            ],
            1000,
            Direction::Purchase,
            Category::OperatingExpenses,
        ),
        invoice(
            "5",
            (2023, 10, 15),
            "Công ty Global Tech",
            "Dự án outsource tháng 10",
            vec![item("Phát triển module React", "Giờ", 200, 600_000)],
            0,
            Direction::Sale,
            Category::Services,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::compute_summary;
    use rust_decimal::Decimal;

    #[test]
    fn test_sample_amounts() {
        let amounts: Vec<i64> = sample_invoices().iter().map(|i| i.amount().dong()).collect();
        assert_eq!(
            amounts,
            vec![50_000_000, 15_000_000, 5_000_000, 2_000_000, 120_000_000]
        );
    }

    #[test]
    fn test_sample_summary() {
        let summary = compute_summary(&sample_invoices());

        assert_eq!(summary.total_revenue.dong(), 175_000_000);
        assert_eq!(summary.total_cost.dong(), 17_000_000);
        assert_eq!(summary.gross_profit.dong(), 158_000_000);
        assert_eq!(summary.vat_output, Decimal::from(5_400_000_i64));
        assert_eq!(summary.vat_input, Decimal::from(1_700_000_i64));
        assert_eq!(summary.vat_payable, Decimal::from(3_700_000_i64));
        assert_eq!(summary.cit_payable, Decimal::from(31_600_000_i64));
        assert_eq!(summary.net_profit, Decimal::from(126_400_000_i64));
    }
}
