use chrono::NaiveDate;
use hs_common::Money;
use thiserror::Error;

use crate::{
    db_types::{Invoice, NewInvoice},
    invoice_objects::InvoiceQueryFilter,
    traits::InvoiceStats,
};

/// Storage contract for vendor invoices.
#[allow(async_fn_in_trait)]
pub trait InvoiceManagement {
    async fn fetch_invoice_by_id(&self, id: i64) -> Result<Option<Invoice>, InvoiceStoreError>;

    async fn fetch_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, InvoiceStoreError>;

    /// Fetches invoices according to the criteria in the filter, newest first.
    async fn search_invoices(&self, query: InvoiceQueryFilter) -> Result<Vec<Invoice>, InvoiceStoreError>;

    /// Invoices with exactly this vendor and total amount whose `invoice_date` lies within
    /// `date ± tolerance_days`, newest first. This is the duplicate window query.
    async fn fetch_duplicate_candidates(
        &self,
        vendor: &str,
        total_amount: Money,
        invoice_date: NaiveDate,
        tolerance_days: i64,
    ) -> Result<Vec<Invoice>, InvoiceStoreError>;

    /// The lexicographically greatest invoice number starting with `prefix`, if any. Because the numeric suffix is
    /// fixed-width and zero-padded, lexicographic order is numeric order.
    async fn latest_invoice_number_with_prefix(&self, prefix: &str) -> Result<Option<String>, InvoiceStoreError>;

    /// Stores the invoice and its line items in a single transaction, with status `Pending` and the given number.
    async fn insert_invoice(&self, invoice: NewInvoice, invoice_number: &str) -> Result<Invoice, InvoiceStoreError>;

    async fn invoice_stats(&self) -> Result<InvoiceStats, InvoiceStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum InvoiceStoreError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("The requested invoice (id {0}) does not exist")]
    InvoiceNotFound(i64),
    #[error("The requested invoice {0} does not exist")]
    InvoiceNumberNotFound(String),
}

impl From<sqlx::Error> for InvoiceStoreError {
    fn from(e: sqlx::Error) -> Self {
        InvoiceStoreError::DatabaseError(e.to_string())
    }
}
