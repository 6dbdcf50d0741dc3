use chrono::{DateTime, NaiveDate, Utc};
use hs_common::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{Invoice, InvoiceStatus};

//--------------------------------------  InvoiceQueryFilter   -------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceQueryFilter {
    /// Substring match on the vendor name.
    pub vendor: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl InvoiceQueryFilter {
    pub fn is_empty(&self) -> bool {
        self.vendor.is_none() && self.status.is_none() && self.from_date.is_none() && self.to_date.is_none()
    }
}

//------------------------------------  InvoiceValidationError  ------------------------------------------------------
/// A specific, user-facing rule violation in an invoice submission. Validation short-circuits, so a rejection always
/// names the first rule that failed. Arithmetic variants carry both sides of the mismatch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvoiceValidationError {
    #[error("Vendor name is required")]
    MissingVendor,
    #[error("Invoice date {0} cannot be in the future")]
    InvoiceDateInFuture(NaiveDate),
    #[error("Due date {due_date} must be on or after invoice date {invoice_date}")]
    DueDateBeforeInvoiceDate { invoice_date: NaiveDate, due_date: NaiveDate },
    #[error("Subtotal amount cannot be negative")]
    NegativeSubtotal,
    #[error("Tax amount cannot be negative")]
    NegativeTax,
    #[error("Total amount must be greater than zero")]
    NonPositiveTotal,
    #[error("Total amount mismatch. Expected {expected}, got {received}")]
    TotalMismatch { expected: Money, received: Money },
    #[error("At least one line item is required")]
    NoLineItems,
    #[error("Line items sum mismatch. Expected {expected}, got {received}")]
    LineItemSumMismatch { expected: Money, received: Money },
    #[error("Line item '{description}' has invalid quantity")]
    InvalidLineItemQuantity { description: String },
    #[error("Line item '{description}' has negative unit price")]
    NegativeLineItemUnitPrice { description: String },
    #[error("Line item '{description}' amount mismatch. Expected {expected}, got {received}")]
    LineItemAmountMismatch { description: String, expected: Money, received: Money },
}

//--------------------------------------  DuplicateRejection   -------------------------------------------------------
/// The payload of a create-time duplicate rejection: enough detail for the submitter to decide whether to abandon the
/// submission or resubmit under a different identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRejection {
    pub duplicates: Vec<DuplicateRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRef {
    pub id: i64,
    pub invoice_number: String,
    pub created_at: DateTime<Utc>,
}

impl DuplicateRejection {
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        let duplicates = invoices
            .iter()
            .map(|i| DuplicateRef { id: i.id, invoice_number: i.invoice_number.clone(), created_at: i.created_at })
            .collect();
        Self { duplicates }
    }

    pub fn invoice_numbers(&self) -> String {
        self.duplicates.iter().map(|d| d.invoice_number.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Display for DuplicateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Found existing invoice(s) with same vendor, amount, and date: {}", self.invoice_numbers())
    }
}
