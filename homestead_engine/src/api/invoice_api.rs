use std::fmt::Debug;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use hs_common::Money;
use log::*;
use thiserror::Error;

use crate::{
    db_types::{Invoice, NewInvoice},
    invoice_objects::{DuplicateRejection, InvoiceQueryFilter, InvoiceValidationError},
    traits::{InvoiceManagement, InvoiceStats, InvoiceStoreError},
};

/// The fixed duplicate-detection window applied at creation time. The advisory
/// [`check_duplicates`](InvoiceApi::check_duplicates) lookup accepts a caller-supplied window instead.
pub const DUPLICATE_WINDOW_DAYS: i64 = 30;

/// `InvoiceApi` is the entry point for submitting and querying vendor invoices.
///
/// Creation runs synchronously inside the caller's request: validate the arithmetic, check the duplicate window,
/// assign the next invoice number, insert. Rejections are typed and carry everything the submitter needs to
/// self-correct; nothing is persisted on rejection.
pub struct InvoiceApi<B> {
    db: B,
}

impl<B> Debug for InvoiceApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InvoiceApi")
    }
}

impl<B> InvoiceApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> InvoiceApi<B>
where B: InvoiceManagement
{
    /// Validates and stores a new invoice.
    ///
    /// The validation sequence short-circuits on the first failure and the rejection names the rule that failed.
    /// After validation, any existing invoice with the same vendor, the same total, and an invoice date within
    /// ±[`DUPLICATE_WINDOW_DAYS`] rejects the submission outright, listing the conflicting invoice numbers.
    ///
    /// Number assignment is read-then-write: under concurrent submissions two callers can compute the same next
    /// number, in which case the loser surfaces a storage error from the uniqueness constraint. See
    /// [`next_invoice_number`](Self::next_invoice_number).
    pub async fn create_invoice(&self, invoice: NewInvoice, now: DateTime<Utc>) -> Result<Invoice, InvoiceApiError> {
        validate_invoice(&invoice, now.date_naive())?;
        let duplicates = self
            .db
            .fetch_duplicate_candidates(&invoice.vendor, invoice.total_amount, invoice.invoice_date, DUPLICATE_WINDOW_DAYS)
            .await?;
        if !duplicates.is_empty() {
            let rejection = DuplicateRejection::from_invoices(&duplicates);
            warn!(
                "🧾️ Potential duplicate invoice detected: {} {} on {}. Existing: {}",
                invoice.vendor,
                invoice.total_amount,
                invoice.invoice_date,
                rejection.invoice_numbers()
            );
            return Err(InvoiceApiError::DuplicateInvoice(rejection));
        }
        let number = self.next_invoice_number(now).await?;
        let stored = self.db.insert_invoice(invoice, &number).await?;
        info!("🧾️ Created invoice {} for {} - {}", stored.invoice_number, stored.vendor, stored.total_amount);
        Ok(stored)
    }

    /// Advisory duplicate lookup with a caller-supplied tolerance window. Performs no writes.
    pub async fn check_duplicates(
        &self,
        vendor: &str,
        total_amount: Money,
        invoice_date: NaiveDate,
        tolerance_days: i64,
    ) -> Result<Vec<Invoice>, InvoiceApiError> {
        if vendor.trim().is_empty() {
            return Err(InvoiceValidationError::MissingVendor.into());
        }
        if !total_amount.is_positive() {
            return Err(InvoiceValidationError::NonPositiveTotal.into());
        }
        let matches = self.db.fetch_duplicate_candidates(vendor, total_amount, invoice_date, tolerance_days).await?;
        debug!("🧾️ Found {} potential duplicate invoice(s) for {vendor} with amount {total_amount}", matches.len());
        Ok(matches)
    }

    pub async fn invoice_by_id(&self, id: i64) -> Result<Invoice, InvoiceApiError> {
        self.db.fetch_invoice_by_id(id).await?.ok_or(InvoiceApiError::InvoiceNotFound(id))
    }

    pub async fn invoice_by_number(&self, number: &str) -> Result<Invoice, InvoiceApiError> {
        self.db
            .fetch_invoice_by_number(number)
            .await?
            .ok_or_else(|| InvoiceApiError::InvoiceNumberNotFound(number.to_string()))
    }

    pub async fn search_invoices(&self, query: InvoiceQueryFilter) -> Result<Vec<Invoice>, InvoiceApiError> {
        Ok(self.db.search_invoices(query).await?)
    }

    pub async fn stats(&self) -> Result<InvoiceStats, InvoiceApiError> {
        Ok(self.db.invoice_stats().await?)
    }

    /// Computes the next invoice number for the current year: `INV-<year>-` followed by a six-digit sequence that
    /// restarts at 1 each calendar year. The sequence continues from the greatest existing number with this year's
    /// prefix, so deleted invoices leave gaps rather than re-used numbers.
    async fn next_invoice_number(&self, now: DateTime<Utc>) -> Result<String, InvoiceApiError> {
        let prefix = format!("INV-{}-", now.year());
        let latest = self.db.latest_invoice_number_with_prefix(&prefix).await?;
        Ok(next_number_after(latest.as_deref(), &prefix))
    }
}

/// Runs the full validation sequence against a submission, short-circuiting on the first failure.
///
/// `today` is the processing date; an invoice date more than one day past it is rejected. All amount comparisons are
/// within [`Money::TOLERANCE`] (one cent), mirroring ordinary currency rounding.
pub fn validate_invoice(invoice: &NewInvoice, today: NaiveDate) -> Result<(), InvoiceValidationError> {
    if invoice.vendor.trim().is_empty() {
        return Err(InvoiceValidationError::MissingVendor);
    }
    if invoice.invoice_date > today + Duration::days(1) {
        return Err(InvoiceValidationError::InvoiceDateInFuture(invoice.invoice_date));
    }
    if invoice.due_date < invoice.invoice_date {
        return Err(InvoiceValidationError::DueDateBeforeInvoiceDate {
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
        });
    }
    if invoice.subtotal_amount.is_negative() {
        return Err(InvoiceValidationError::NegativeSubtotal);
    }
    if invoice.tax_amount.is_negative() {
        return Err(InvoiceValidationError::NegativeTax);
    }
    if !invoice.total_amount.is_positive() {
        return Err(InvoiceValidationError::NonPositiveTotal);
    }
    let expected_total = invoice.subtotal_amount + invoice.tax_amount + invoice.shipping_amount;
    if !expected_total.approx_eq(invoice.total_amount) {
        return Err(InvoiceValidationError::TotalMismatch {
            expected: expected_total,
            received: invoice.total_amount,
        });
    }
    if invoice.line_items.is_empty() {
        return Err(InvoiceValidationError::NoLineItems);
    }
    let line_sum: Money = invoice.line_items.iter().map(|li| li.amount).sum();
    if !line_sum.approx_eq(invoice.subtotal_amount) {
        return Err(InvoiceValidationError::LineItemSumMismatch {
            expected: line_sum,
            received: invoice.subtotal_amount,
        });
    }
    for li in &invoice.line_items {
        if li.quantity <= 0.0 {
            return Err(InvoiceValidationError::InvalidLineItemQuantity { description: li.description.clone() });
        }
        if li.unit_price.is_negative() {
            return Err(InvoiceValidationError::NegativeLineItemUnitPrice { description: li.description.clone() });
        }
        let expected = Money::from_cents((li.quantity * li.unit_price.value() as f64).round() as i64);
        if !expected.approx_eq(li.amount) {
            return Err(InvoiceValidationError::LineItemAmountMismatch {
                description: li.description.clone(),
                expected,
                received: li.amount,
            });
        }
    }
    Ok(())
}

/// The number after `latest` under the given prefix, starting at 1 when no prior number exists or its suffix cannot
/// be parsed (gap-tolerant).
pub(crate) fn next_number_after(latest: Option<&str>, prefix: &str) -> String {
    let next = latest
        .and_then(|n| n.strip_prefix(prefix))
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .map(|n| n + 1)
        .unwrap_or(1);
    format!("{prefix}{next:06}")
}

#[derive(Debug, Clone, Error)]
pub enum InvoiceApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("The requested invoice (id {0}) does not exist")]
    InvoiceNotFound(i64),
    #[error("The requested invoice {0} does not exist")]
    InvoiceNumberNotFound(String),
    #[error("{0}")]
    ValidationFailed(#[from] InvoiceValidationError),
    #[error("Potential duplicate invoice detected. {0}")]
    DuplicateInvoice(DuplicateRejection),
}

impl From<InvoiceStoreError> for InvoiceApiError {
    fn from(e: InvoiceStoreError) -> Self {
        match e {
            InvoiceStoreError::DatabaseError(e) => InvoiceApiError::DatabaseError(e),
            InvoiceStoreError::InvoiceNotFound(id) => InvoiceApiError::InvoiceNotFound(id),
            InvoiceStoreError::InvoiceNumberNotFound(n) => InvoiceApiError::InvoiceNumberNotFound(n),
        }
    }
}
