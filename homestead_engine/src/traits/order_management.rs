use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    order_objects::OrderQueryFilter,
    traits::OrderProgress,
};

/// Storage contract for order records.
///
/// The lifecycle advancer only needs [`fetch_active_orders`](Self::fetch_active_orders) and
/// [`apply_order_progress`](Self::apply_order_progress); the rest serves the HTTP surface. Progress writes are
/// single-record and atomic, but there is deliberately no batch transaction across a scan: one failed write must not
/// roll back or prevent the others.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// All orders in an auto-advanced status (`Pending`, `InProduction`, `Shipped`), oldest first.
    async fn fetch_active_orders(&self) -> Result<Vec<Order>, OrderApiError>;

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderApiError>;

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError>;

    /// Fetches orders according to the criteria in the filter, ordered by `order_date` ascending.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;

    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    /// Applies one lifecycle step to the order with internal id `id`. Milestone dates carried by `progress` are only
    /// written where the stored value is still null.
    async fn apply_order_progress(&self, id: i64, progress: OrderProgress) -> Result<Order, OrderApiError>;

    /// Sets the status without touching milestone dates. Used by the manual status endpoint.
    async fn set_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, OrderApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderIdNotFound(i64),
    #[error("Cannot insert order, since it already exists with order id {0}")]
    OrderAlreadyExists(OrderId),
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}
