use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{OrderStatus, TicketStatus};

//--------------------------------------   OrderQueryFilter    -------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl OrderQueryFilter {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.status.is_none() && self.since.is_none() && self.until.is_none()
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_customer_id<S: Into<String>>(mut self, customer_id: S) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
}

//--------------------------------------   TicketQueryFilter   -------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketQueryFilter {
    pub status: Option<TicketStatus>,
    pub order_id: Option<String>,
}

impl TicketQueryFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.order_id.is_none()
    }
}
