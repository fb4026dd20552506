//! Prompt text and the invoice response schema.
//!
//! Prompts are written in Vietnamese, the language of the reports and of
//! the invoices being read.

use chrono::NaiveDate;
use serde_json::{json, Value};

use bizfin_core::{format_currency, format_decimal_currency, Category, FinancialSummary, Invoice};

/// Shown instead of a report when no API key is configured.
pub const MISSING_KEY_NOTICE: &str =
    "Vui lòng cung cấp API Key để sử dụng tính năng phân tích AI.";

/// Shown when the model answered with nothing.
pub const EMPTY_REPORT_NOTICE: &str = "Không thể tạo báo cáo vào lúc này.";

/// Shown when the report request failed.
pub const REPORT_FAILED_NOTICE: &str =
    "Đã xảy ra lỗi khi kết nối với AI. Vui lòng thử lại sau.";

/// Category labels as offered to the model.
fn category_labels() -> String {
    Category::ALL
        .iter()
        .map(Category::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One listing line: `- 2023-10-01 [BÁN]: Công ty ABC. Chi tiết: ... `
fn transaction_line(invoice: &Invoice) -> String {
    let details = invoice
        .line_items()
        .iter()
        .map(|item| format!("{} ({} {})", item.name(), item.quantity(), item.unit()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "- {} [{}]: {}. Chi tiết: {}. Trị giá: {} (Thuế {})",
        invoice.date().format("%Y-%m-%d"),
        invoice.direction().label(),
        invoice.counterparty_name(),
        details,
        format_currency(invoice.amount()),
        invoice.tax_rate(),
    )
}

/// The most recent invoices by date, newest first, at most `limit`.
///
/// Invoices sharing a date keep their input order.
pub fn recent_invoices(invoices: &[Invoice], limit: usize) -> Vec<&Invoice> {
    let mut recent: Vec<&Invoice> = invoices.iter().collect();
    recent.sort_by(|a, b| b.date().cmp(&a.date()));
    recent.truncate(limit);
    recent
}

/// Prompt asking for a CFO-style Markdown analysis of the period.
pub fn report_prompt(invoices: &[Invoice], summary: &FinancialSummary, limit: usize) -> String {
    let transactions = recent_invoices(invoices, limit)
        .into_iter()
        .map(transaction_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Bạn là một chuyên gia tư vấn tài chính doanh nghiệp cấp cao (CFO).
Hãy phân tích dữ liệu tài chính chi tiết dưới đây của doanh nghiệp và đưa ra báo cáo ngắn gọn, súc tích bằng tiếng Việt.

TỔNG QUAN TÀI CHÍNH:
- Tổng doanh thu (Chưa VAT): {revenue}
- Tổng chi phí (Chưa VAT): {cost}
- Lợi nhuận gộp: {gross}
- Thuế GTGT phải nộp (VAT đầu ra - đầu vào): {vat}
- Thuế TNDN phải nộp (ước tính 20%): {cit}
- Lợi nhuận ròng thực tế: {net}

DANH SÁCH GIAO DỊCH CHI TIẾT (Hàng hóa/Dịch vụ):
{transactions}

YÊU CẦU PHÂN TÍCH:
1. **Đánh giá hiệu quả kinh doanh**: Dựa trên các mặt hàng đã bán và mua, đánh giá xem doanh nghiệp đang kinh doanh mặt hàng nào hiệu quả nhất? Tỷ suất lợi nhuận có tốt không?
2. **Phân tích chi phí**: Có khoản mục mua sắm nào bất thường hoặc chiếm tỷ trọng quá cao trong chi phí đầu vào không?
3. **Tư vấn tối ưu**: Đưa ra 3 lời khuyên cụ thể để giảm thiểu tiền thuế phải đóng hợp pháp hoặc tăng biên lợi nhuận (ví dụ: cần đẩy mạnh bán mặt hàng nào, cắt giảm chi phí nào).

Hãy trình bày chuyên nghiệp, sử dụng định dạng Markdown, in đậm các con số quan trọng.",
        revenue = format_currency(summary.total_revenue),
        cost = format_currency(summary.total_cost),
        gross = format_currency(summary.gross_profit),
        vat = format_decimal_currency(summary.vat_payable),
        cit = format_decimal_currency(summary.cit_payable),
        net = format_decimal_currency(summary.net_profit),
        transactions = transactions,
    )
}

/// Prompt for pulling an invoice out of free text ("bán 2 license cho ABC...").
pub fn text_extraction_prompt(text: &str, today: NaiveDate) -> String {
    format!(
        "Bạn là trợ lý nhập liệu kế toán. Hãy trích xuất thông tin hóa đơn từ văn bản sau thành định dạng JSON.

Thông tin ngữ cảnh:
- Hôm nay là ngày: {today} (Dùng để suy luận ngày nếu văn bản ghi \"hôm nay\", \"hôm qua\").
- Danh mục hợp lệ: {categories}. Hãy chọn danh mục phù hợp nhất.

Văn bản cần xử lý: \"{text}\"

Yêu cầu logic:
- Nếu nội dung là bán hàng, thu tiền -> type: \"OUTPUT\".
- Nếu nội dung là mua hàng, chi tiền -> type: \"INPUT\".
- TaxRate (VAT): Nếu không tìm thấy, mặc định là 0.
- Items: Trích xuất chi tiết từng dòng hàng hóa, số lượng, đơn giá. Nếu chỉ có tổng tiền, hãy ước lượng hoặc để đơn giá = tổng tiền, số lượng = 1.",
        today = today.format("%Y-%m-%d"),
        categories = category_labels(),
        text = text.trim(),
    )
}

/// Prompt sent with an invoice photo.
pub fn image_extraction_prompt(today: NaiveDate) -> String {
    format!(
        "Hãy phân tích hình ảnh hóa đơn/chứng từ này và trích xuất thông tin thành JSON.

Lưu ý:
- Hôm nay là: {today}.
- Cố gắng đọc tên đơn vị bán/mua hàng.
- Đọc chi tiết từng dòng hàng hóa (Tên, ĐVT, Số lượng, Đơn giá).
- Xác định đây là hóa đơn đầu vào (Mua hàng/INPUT) hay đầu ra (Bán hàng/OUTPUT).
- Chọn danh mục phù hợp nhất trong: {categories}.
- Nếu không thấy thuế suất, mặc định 0.",
        today = today.format("%Y-%m-%d"),
        categories = category_labels(),
    )
}

/// Response schema for extraction, in Gemini's OpenAPI subset.
pub fn invoice_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "customerName": {
                "type": "STRING",
                "description": "Tên đối tác (khách hàng hoặc nhà cung cấp)"
            },
            "date": { "type": "STRING", "description": "Định dạng YYYY-MM-DD" },
            "description": { "type": "STRING", "description": "Mô tả ngắn gọn hóa đơn" },
            "taxRate": { "type": "NUMBER", "description": "Thuế suất VAT (0, 5, 8, 10...)" },
            "type": { "type": "STRING", "enum": ["INPUT", "OUTPUT"] },
            "category": { "type": "STRING" },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "unit": { "type": "STRING", "description": "Đơn vị tính (Cái, Bộ, Gói...)" },
                        "quantity": { "type": "NUMBER" },
                        "price": { "type": "NUMBER", "description": "Đơn giá trước thuế" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizfin_core::ledger::compute_summary;
    use bizfin_core::sample::sample_invoices;

    #[test]
    fn test_transaction_line_format() {
        let invoices = sample_invoices();
        let stationery = &invoices[3];
        assert_eq!(
            transaction_line(stationery),
            "- 2023-10-12 [MUA]: Văn phòng phẩm Minh Châu. Chi tiết: Giấy A4 Double A (20 Ram), \
             Mực in Canon 2900 (2 Hộp). Trị giá: 2.000.000\u{a0}₫ (Thuế 10%)"
        );
    }

    #[test]
    fn test_recent_invoices_sorted_and_limited() {
        let invoices = sample_invoices();
        let recent = recent_invoices(&invoices, 2);
        let ids: Vec<&str> = recent.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["5", "4"]);
    }

    #[test]
    fn test_report_prompt_contents() {
        let invoices = sample_invoices();
        let summary = compute_summary(&invoices);
        let prompt = report_prompt(&invoices, &summary, 15);

        assert!(prompt.contains("Tổng doanh thu (Chưa VAT): 175.000.000\u{a0}₫"));
        assert!(prompt.contains("Thuế GTGT phải nộp (VAT đầu ra - đầu vào): 3.700.000\u{a0}₫"));
        assert!(prompt.contains("- 2023-10-15 [BÁN]: Công ty Global Tech."));
        assert!(prompt.contains("(Thuế 0%)"));
        assert_eq!(prompt.matches("\n- 2023-").count(), 5);
    }

    #[test]
    fn test_report_prompt_respects_limit() {
        let invoices = sample_invoices();
        let summary = compute_summary(&invoices);
        let prompt = report_prompt(&invoices, &summary, 1);
        assert_eq!(prompt.matches("\n- 2023-").count(), 1);
        assert!(!prompt.contains("Công ty ABC"));
    }

    #[test]
    fn test_extraction_prompts_carry_context() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();

        let prompt = text_extraction_prompt("  bán 2 bộ bàn ghế cho anh Nam  ", today);
        assert!(prompt.contains("Hôm nay là ngày: 2024-03-08"));
        assert!(prompt.contains("\"bán 2 bộ bàn ghế cho anh Nam\""));
        assert!(prompt.contains("Lương nhân viên"));

        let prompt = image_extraction_prompt(today);
        assert!(prompt.contains("Hôm nay là: 2024-03-08."));
        assert!(prompt.contains("Bán hàng hóa, Cung cấp dịch vụ"));
    }

    #[test]
    fn test_schema_lists_directions() {
        let schema = invoice_schema();
        assert_eq!(schema["properties"]["type"]["enum"], json!(["INPUT", "OUTPUT"]));
        assert_eq!(schema["properties"]["items"]["type"], "ARRAY");
    }
}
