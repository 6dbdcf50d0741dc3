use std::fmt::Display;

use chrono::NaiveDate;
use hs_common::Money;
use homestead_engine::db_types::{OrderStatus, TicketStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketStatusUpdate {
    pub status: TicketStatus,
}

/// Query parameters for the advisory duplicate lookup. `tolerance_days` falls back to the fixed create-time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckQuery {
    pub vendor: String,
    pub total_amount: Money,
    pub invoice_date: NaiveDate,
    pub tolerance_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogQuery {
    pub count: Option<usize>,
}
