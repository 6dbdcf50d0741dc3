use thiserror::Error;

use crate::{
    db_types::{NewTicket, OrderId, SupportTicket, TicketStatus},
    order_objects::TicketQueryFilter,
};

/// Storage contract for support tickets. The advancer consumes [`fetch_tickets_for_order`](Self::fetch_tickets_for_order)
/// as its blocking gate; the rest serves the ticket CRUD surface.
#[allow(async_fn_in_trait)]
pub trait TicketManagement {
    /// All tickets whose `order_id` references the given order, newest first.
    async fn fetch_tickets_for_order(&self, order_id: &OrderId) -> Result<Vec<SupportTicket>, TicketApiError>;

    async fn fetch_ticket_by_id(&self, id: i64) -> Result<Option<SupportTicket>, TicketApiError>;

    async fn search_tickets(&self, query: TicketQueryFilter) -> Result<Vec<SupportTicket>, TicketApiError>;

    async fn insert_ticket(&self, ticket: NewTicket) -> Result<SupportTicket, TicketApiError>;

    async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<SupportTicket, TicketApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum TicketApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("The requested ticket (id {0}) does not exist")]
    TicketNotFound(i64),
}

impl From<sqlx::Error> for TicketApiError {
    fn from(e: sqlx::Error) -> Self {
        TicketApiError::DatabaseError(e.to_string())
    }
}
