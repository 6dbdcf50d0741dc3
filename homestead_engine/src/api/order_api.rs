use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    order_objects::OrderQueryFilter,
    traits::{OrderApiError, OrderManagement, OrderProgress},
};

/// `OrderApi` is the CRUD surface over order records. The lifecycle advancer does not go through this API; it has its
/// own scan entry point in [`ProgressionApi`](crate::ProgressionApi).
pub struct OrderApi<B> {
    db: B,
}

impl<B> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi")
    }
}

impl<B> OrderApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderApi<B>
where B: OrderManagement
{
    /// Stores a brand-new order. The order id must not already exist.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        if self.db.fetch_order_by_order_id(&order.order_id).await?.is_some() {
            return Err(OrderApiError::OrderAlreadyExists(order.order_id));
        }
        let stored = self.db.insert_order(order).await?;
        info!("📦️ Order {} created for customer {} ({})", stored.order_id, stored.customer_id, stored.home_model);
        Ok(stored)
    }

    pub async fn order_by_id(&self, id: i64) -> Result<Order, OrderApiError> {
        self.db.fetch_order_by_id(id).await?.ok_or(OrderApiError::OrderIdNotFound(id))
    }

    pub async fn order_by_order_id(&self, order_id: &OrderId) -> Result<Order, OrderApiError> {
        self.db.fetch_order_by_order_id(order_id).await?.ok_or_else(|| OrderApiError::OrderNotFound(order_id.clone()))
    }

    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError> {
        self.db.search_orders(query).await
    }

    /// Manually sets an order's status, stamping the milestone dates a customer-facing record is expected to carry:
    /// moving into `Shipped` sets `shipped_date` if it is not already set, and moving into `Delivered` sets
    /// `delivered_date` (and a missing `shipped_date`) the same way. Dates already present are left untouched.
    pub async fn set_order_status(
        &self,
        id: i64,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderApiError> {
        let order = self.order_by_id(id).await?;
        let updated = match status {
            OrderStatus::Shipped => {
                let progress = OrderProgress { new_status: status, shipped_date: Some(now), delivered_date: None };
                self.db.apply_order_progress(id, progress).await?
            },
            OrderStatus::Delivered => {
                let progress = OrderProgress { new_status: status, shipped_date: Some(now), delivered_date: Some(now) };
                self.db.apply_order_progress(id, progress).await?
            },
            _ => self.db.set_order_status(id, status).await?,
        };
        info!("📦️ Order {} status changed from {} to {}", order.order_id, order.status, updated.status);
        Ok(updated)
    }
}
