use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewTicket, OrderId, SupportTicket, TicketStatus},
    order_objects::TicketQueryFilter,
    traits::TicketApiError,
};

pub async fn insert_ticket(ticket: NewTicket, conn: &mut SqliteConnection) -> Result<SupportTicket, TicketApiError> {
    let ticket = sqlx::query_as(
        r#"
            INSERT INTO support_tickets (subject, priority, order_id)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(ticket.subject)
    .bind(ticket.priority.to_string())
    .bind(ticket.order_id)
    .fetch_one(conn)
    .await?;
    Ok(ticket)
}

pub async fn fetch_ticket_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<SupportTicket>, sqlx::Error> {
    let ticket = sqlx::query_as("SELECT * FROM support_tickets WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(ticket)
}

/// All tickets referencing the given order, newest first. The progression scan calls this once per candidate order.
pub async fn fetch_tickets_for_order(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<SupportTicket>, sqlx::Error> {
    let tickets = sqlx::query_as("SELECT * FROM support_tickets WHERE order_id = $1 ORDER BY created_at DESC")
        .bind(order_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(tickets)
}

pub async fn search_tickets(
    query: TicketQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<SupportTicket>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM support_tickets
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(order_id) = query.order_id {
        where_clause.push("order_id = ");
        where_clause.push_bind_unseparated(order_id);
    }
    builder.push(" ORDER BY created_at DESC");

    trace!("📝️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<SupportTicket>();
    let tickets = query.fetch_all(conn).await?;
    Ok(tickets)
}

pub(crate) async fn set_ticket_status(
    id: i64,
    status: TicketStatus,
    conn: &mut SqliteConnection,
) -> Result<SupportTicket, TicketApiError> {
    let status = status.to_string();
    let result: Option<SupportTicket> = sqlx::query_as(
        "UPDATE support_tickets SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(TicketApiError::TicketNotFound(id))
}
