use std::fmt::Display;

use chrono::{DateTime, Utc};
use hs_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::OrderStatus;

//--------------------------------------  ProgressionSettings  -------------------------------------------------------
/// The knobs for the order lifecycle advancer. All thresholds are in whole days.
///
/// Every field is explicit; there are no hidden defaults beyond [`Default`], which matches the shipped configuration
/// of the platform (3 / 30 / 10 days, ±2 days of jitter, ticket blocking on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    pub pending_to_production_days: i64,
    pub production_to_shipped_days: i64,
    pub shipped_to_delivered_days: i64,
    /// Jitter half-width. Each order gets a fresh uniform offset in `[-v, +v]` on every scan.
    pub random_variation_days: i64,
    /// When true, orders with any unresolved ticket are skipped entirely.
    pub block_progression_with_open_tickets: bool,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            pending_to_production_days: 3,
            production_to_shipped_days: 30,
            shipped_to_delivered_days: 10,
            random_variation_days: 2,
            block_progression_with_open_tickets: true,
        }
    }
}

//--------------------------------------     OrderProgress     -------------------------------------------------------
/// A single lifecycle step for one order: the new status plus whichever milestone date that step stamps.
///
/// `shipped_date` is only ever set on the transition into `Shipped`, and `delivered_date` on the transition into
/// `Delivered`. Dates already present on the record are never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderProgress {
    pub new_status: OrderStatus,
    pub shipped_date: Option<DateTime<Utc>>,
    pub delivered_date: Option<DateTime<Utc>>,
}

impl OrderProgress {
    pub fn to_status(new_status: OrderStatus) -> Self {
        Self { new_status, shipped_date: None, delivered_date: None }
    }

    pub fn shipped(now: DateTime<Utc>) -> Self {
        Self { new_status: OrderStatus::Shipped, shipped_date: Some(now), delivered_date: None }
    }

    pub fn delivered(now: DateTime<Utc>) -> Self {
        Self { new_status: OrderStatus::Delivered, shipped_date: None, delivered_date: Some(now) }
    }
}

//--------------------------------------       TicketGate      -------------------------------------------------------
/// Outcome of the open-ticket check for one order.
///
/// `Unknown` means the lookup itself failed. It is a distinct result so that the fail-open policy is a visible branch
/// in the caller rather than a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketGate {
    /// No unresolved tickets reference the order.
    Clear,
    /// At least this many unresolved tickets reference the order.
    Blocked(usize),
    /// The ticket lookup failed; the caller decides the policy.
    Unknown,
}

//--------------------------------------      ScanSummary      -------------------------------------------------------
/// Counts for one advancer scan. `scanned` is the number of active orders examined; every one of them lands in
/// exactly one of `updated`, `blocked`, `errors`, or none (threshold not reached).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scanned: usize,
    pub updated: usize,
    pub blocked: usize,
    pub errors: usize,
}

impl Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} orders scanned, {} updated, {} blocked by open tickets, {} errors",
            self.scanned, self.updated, self.blocked, self.errors
        )
    }
}

//--------------------------------------      InvoiceStats     -------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceStats {
    pub total_invoices: i64,
    pub pending_invoices: i64,
    pub approved_invoices: i64,
    pub paid_invoices: i64,
    pub rejected_invoices: i64,
    pub duplicate_invoices: i64,
    pub total_amount: Money,
    pub pending_amount: Money,
    pub top_vendors: Vec<VendorStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VendorStats {
    pub vendor: String,
    pub count: i64,
    pub total_amount: Money,
}
