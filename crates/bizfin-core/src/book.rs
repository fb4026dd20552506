//! # Invoice Book
//!
//! The owned invoice collection. There is no global store: callers hold an
//! `InvoiceBook` and pass it (or a borrowed view) to whatever needs it.
//!
//! Newest entries go first. The summary is recomputed from the current
//! contents on every call, so it can never go stale.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::ledger::compute_summary;
use crate::types::{Direction, FinancialSummary, Invoice};
use crate::validation::validate_search_query;

/// An ordered, id-unique collection of invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InvoiceBook {
    invoices: Vec<Invoice>,
}

impl InvoiceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from existing invoices, keeping their order.
    ///
    /// Fails on the first repeated id.
    pub fn from_invoices(invoices: Vec<Invoice>) -> CoreResult<Self> {
        let mut book = InvoiceBook::new();
        for invoice in invoices {
            book.ensure_unique(invoice.id())?;
            book.invoices.push(invoice);
        }
        Ok(book)
    }

    /// Adds an invoice at the front of the book.
    pub fn add(&mut self, invoice: Invoice) -> CoreResult<()> {
        self.ensure_unique(invoice.id())?;
        self.invoices.insert(0, invoice);
        Ok(())
    }

    /// Removes an invoice by id and returns it.
    pub fn remove(&mut self, id: &str) -> CoreResult<Invoice> {
        let index = self
            .invoices
            .iter()
            .position(|i| i.id() == id)
            .ok_or_else(|| CoreError::InvoiceNotFound(id.to_string()))?;
        Ok(self.invoices.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Invoice> {
        self.invoices.iter()
    }

    pub fn as_slice(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Financial summary of everything in the book.
    pub fn summary(&self) -> FinancialSummary {
        compute_summary(&self.invoices)
    }

    /// Invoice list filtered by direction and a search term, newest date
    /// first.
    ///
    /// The term matches case-insensitively anywhere in the counterparty name
    /// or description. An empty term matches everything.
    pub fn search(&self, direction: Option<Direction>, term: &str) -> CoreResult<Vec<&Invoice>> {
        let needle = validate_search_query(term)?.to_lowercase();

        let mut hits: Vec<&Invoice> = self
            .invoices
            .iter()
            .filter(|i| direction.map_or(true, |d| i.direction() == d))
            .filter(|i| {
                needle.is_empty()
                    || i.counterparty_name().to_lowercase().contains(&needle)
                    || i.description().to_lowercase().contains(&needle)
            })
            .collect();

        // stable: same-day invoices keep book order
        hits.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(hits)
    }

    /// Parses a JSON invoice list. Derived totals are recomputed on the way in.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let invoices: Vec<Invoice> = serde_json::from_str(json)?;
        Self::from_invoices(invoices)
    }

    /// Renders the invoice list as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.invoices)?)
    }

    fn ensure_unique(&self, id: &str) -> CoreResult<()> {
        if self.get(id).is_some() {
            return Err(CoreError::DuplicateInvoice(id.to_string()));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a InvoiceBook {
    type Item = &'a Invoice;
    type IntoIter = std::slice::Iter<'a, Invoice>;

    fn into_iter(self) -> Self::IntoIter {
        self.invoices.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
