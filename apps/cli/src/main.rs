//! # BizFinance CLI
//!
//! Dashboard figures, invoice lists, AI reports and AI invoice entry from
//! the terminal.
//!
//! ## Usage
//! ```bash
//! cargo run -p bizfin-cli --bin bizfin -- summary
//! cargo run -p bizfin-cli --bin bizfin -- list --direction purchase --search "Minh Châu"
//! cargo run -p bizfin-cli --bin bizfin -- report --file ./invoices.json
//! cargo run -p bizfin-cli --bin bizfin -- extract-text "bán 10 ghế cho Anh Tuấn, 500k/cái"
//! cargo run -p bizfin-cli --bin bizfin -- extract-image ./hoa-don.jpg
//! ```
//!
//! Without `--file` the built-in sample invoices are used. AI commands read
//! `GEMINI_API_KEY` (or `ai.toml`); without a key `report` prints a notice
//! and the extract commands fail.

mod args;

use std::path::Path;

use anyhow::{bail, Context, Result};
use bizfin_ai::{AiConfig, AiError, FinanceAssistant};
use bizfin_core::{
    format_currency, format_decimal_currency, sample::sample_invoices, Invoice, InvoiceBook,
    InvoiceDraft,
};
use tracing::{debug, info, warn, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::args::{image_mime_type, parse_args, Command, USAGE};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&argv)?;

    match cli.command {
        Command::Help => println!("{}", USAGE),
        Command::Summary => print_summary(&load_book(cli.file.as_deref())?),
        Command::List { direction, search } => {
            let book = load_book(cli.file.as_deref())?;
            let hits = book.search(direction, &search)?;
            if hits.is_empty() {
                println!("Không có hóa đơn nào.");
            }
            for invoice in hits {
                print_invoice_row(invoice);
            }
        }
        Command::Report => {
            let book = load_book(cli.file.as_deref())?;
            let assistant = assistant_for(cli.config)?;
            let summary = book.summary();
            let report = assistant.generate_report(book.as_slice(), &summary).await;
            println!("{}", report);
        }
        Command::ExtractText { text, direction } => {
            let assistant = assistant_for(cli.config)?;
            let draft = assistant
                .extract_from_text(&text, direction)
                .await
                .map_err(explain)?;
            print_draft(draft)?;
        }
        Command::ExtractImage { path, direction } => {
            let mime_type = image_mime_type(&path)
                .with_context(|| format!("unsupported image type: {}", path.display()))?;
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            debug!(path = %path.display(), size = bytes.len(), mime_type, "Read invoice image");

            let assistant = assistant_for(cli.config)?;
            let draft = assistant
                .extract_from_image(&bytes, mime_type, direction)
                .await
                .map_err(explain)?;
            print_draft(draft)?;
        }
    }

    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "info,bizfin=debug";

/// Initializes the tracing subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    build_subscriber(filter).init();
}

/// The env filter is the only level gate; logs go to stderr.
fn build_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn load_book(file: Option<&Path>) -> Result<InvoiceBook> {
    match file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let book = InvoiceBook::from_json(&json)
                .with_context(|| format!("invalid invoice file {}", path.display()))?;
            info!(path = %path.display(), count = book.len(), "Loaded invoices");
            Ok(book)
        }
        None => {
            debug!("No --file given, using sample invoices");
            Ok(InvoiceBook::from_invoices(sample_invoices())?)
        }
    }
}

fn assistant_for(config_path: Option<std::path::PathBuf>) -> Result<FinanceAssistant> {
    let config = AiConfig::load_or_default(config_path);
    let assistant = FinanceAssistant::from_config(&config)?;
    if !assistant.is_configured() {
        warn!("No Gemini API key configured (set GEMINI_API_KEY)");
    }
    Ok(assistant)
}

/// Adds a hint for the failures a user can act on.
fn explain(error: AiError) -> anyhow::Error {
    let hint = if error.is_config_error() {
        "check GEMINI_API_KEY or ai.toml"
    } else if error.is_retryable() {
        "please try again"
    } else {
        return error.into();
    };
    anyhow::Error::new(error).context(format!("extraction failed, {}", hint))
}

// =============================================================================
// Output
// =============================================================================

fn print_summary(book: &InvoiceBook) {
    let summary = book.summary();

    println!("BizFinance - {} hóa đơn", book.len());
    println!("========================================");
    println!("{:<22}{:>18}", "Doanh thu", format_currency(summary.total_revenue));
    println!("{:<22}{:>18}", "Chi phí", format_currency(summary.total_cost));
    println!("{:<22}{:>18}", "Lợi nhuận gộp", format_currency(summary.gross_profit));
    println!("{:<22}{:>18}", "Thuế GTGT đầu ra", format_decimal_currency(summary.vat_output));
    println!("{:<22}{:>18}", "Thuế GTGT đầu vào", format_decimal_currency(summary.vat_input));
    println!("{:<22}{:>18}", "Thuế GTGT phải nộp", format_decimal_currency(summary.vat_payable));
    if !summary.vat_credit().is_zero() {
        println!("  (khấu trừ chuyển kỳ sau: {})", format_decimal_currency(summary.vat_credit()));
    }
    println!("{:<22}{:>18}", "Thuế TNDN (20%)", format_decimal_currency(summary.cit_payable));
    println!("{:<22}{:>18}", "Lợi nhuận ròng", format_decimal_currency(summary.net_profit));
    println!();
    println!("Phân bổ:");
    for slice in summary.tax_distribution() {
        println!("  {:<20}{:>18}", slice.label, format_currency(slice.amount));
    }
}

fn print_invoice_row(invoice: &Invoice) {
    println!(
        "{}  [{}]  {:<32} {:>16}  VAT {}  {}",
        invoice.date(),
        invoice.direction(),
        invoice.counterparty_name(),
        format_currency(invoice.amount()),
        invoice.tax_rate(),
        invoice.category(),
    );
}

fn print_draft(draft: InvoiceDraft) -> Result<()> {
    println!("Hóa đơn {} ngày {}", draft.direction, draft.date);
    println!("Đối tác:   {}", draft.counterparty_name);
    println!("Phân loại: {}", draft.category);
    for item in draft.items() {
        println!(
            "  - {} ({} {}) x {} = {}",
            item.name(),
            item.quantity(),
            item.unit(),
            format_currency(item.unit_price()),
            format_currency(item.line_total()),
        );
    }
    println!("Cộng tiền hàng: {}", format_currency(draft.subtotal()));
    println!("Thuế GTGT ({}): {}", draft.tax_rate(), format_currency(draft.vat_amount()));
    println!("Tổng thanh toán: {}", format_currency(draft.total_due()));

    match draft.build() {
        Ok(invoice) => {
            println!();
            println!("{}", serde_json::to_string_pretty(&invoice)?);
        }
        Err(e) => {
            warn!(error = %e, "Draft needs review before saving");
            bail!("extracted invoice is incomplete: {}", e);
        }
    }
    Ok(())
}
