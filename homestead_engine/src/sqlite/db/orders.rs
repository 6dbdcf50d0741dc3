use chrono::Utc;
use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    order_objects::OrderQueryFilter,
    traits::{OrderApiError, OrderProgress},
};

pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderApiError> {
    let order_date = order.order_date.unwrap_or_else(Utc::now);
    let order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                customer_id,
                home_model,
                total_price,
                order_date
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.customer_id)
    .bind(order.home_model)
    .bind(order.total_price.value())
    .bind(order_date)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns every order in an auto-advanced status, oldest first. This is the working set for one progression scan.
pub async fn fetch_active_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as(
        "SELECT * FROM orders WHERE status IN ('Pending', 'InProduction', 'Shipped') ORDER BY order_date ASC",
    )
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`.
///
/// Resulting orders are ordered by `order_date` in ascending order.
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM orders
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(cid) = query.customer_id {
        where_clause.push("customer_id = ");
        where_clause.push_bind_unseparated(cid);
    }
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(since) = query.since {
        where_clause.push("order_date >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("order_date <= ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY order_date ASC");

    trace!("📝️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<Order>();
    let orders = query.fetch_all(conn).await?;
    Ok(orders)
}

/// Applies one lifecycle step. Milestone dates are only written where the stored value is still null, so a date that
/// has been set once is never overwritten.
pub(crate) async fn apply_order_progress(
    id: i64,
    progress: OrderProgress,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderApiError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = $1,
                shipped_date = COALESCE(shipped_date, $2),
                delivered_date = COALESCE(delivered_date, $3),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *;
        "#,
    )
    .bind(progress.new_status.to_string())
    .bind(progress.shipped_date)
    .bind(progress.delivered_date)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(OrderApiError::OrderIdNotFound(id))
}

pub(crate) async fn set_order_status(
    id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderApiError> {
    let status = status.to_string();
    let result: Option<Order> =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(conn)
            .await?;
    result.ok_or(OrderApiError::OrderIdNotFound(id))
}
