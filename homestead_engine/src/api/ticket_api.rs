use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewTicket, OrderId, SupportTicket, TicketStatus},
    order_objects::TicketQueryFilter,
    traits::{TicketApiError, TicketManagement},
};

/// `TicketApi` is the CRUD surface over support tickets.
pub struct TicketApi<B> {
    db: B,
}

impl<B> Debug for TicketApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TicketApi")
    }
}

impl<B> TicketApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> TicketApi<B>
where B: TicketManagement
{
    pub async fn create_ticket(&self, ticket: NewTicket) -> Result<SupportTicket, TicketApiError> {
        let stored = self.db.insert_ticket(ticket).await?;
        match &stored.order_id {
            Some(oid) => info!("🎫️ Ticket #{} opened against order {oid}: {}", stored.id, stored.subject),
            None => info!("🎫️ Ticket #{} opened: {}", stored.id, stored.subject),
        }
        Ok(stored)
    }

    pub async fn ticket_by_id(&self, id: i64) -> Result<SupportTicket, TicketApiError> {
        self.db.fetch_ticket_by_id(id).await?.ok_or(TicketApiError::TicketNotFound(id))
    }

    pub async fn tickets_for_order(&self, order_id: &OrderId) -> Result<Vec<SupportTicket>, TicketApiError> {
        self.db.fetch_tickets_for_order(order_id).await
    }

    pub async fn search_tickets(&self, query: TicketQueryFilter) -> Result<Vec<SupportTicket>, TicketApiError> {
        self.db.search_tickets(query).await
    }

    pub async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<SupportTicket, TicketApiError> {
        let updated = self.db.set_ticket_status(id, status).await?;
        info!("🎫️ Ticket #{} status changed to {}", updated.id, updated.status);
        Ok(updated)
    }
}
