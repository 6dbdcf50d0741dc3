//! `SqliteDatabase` is a concrete implementation of a Homestead engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::NaiveDate;
use hs_common::Money;
use sqlx::SqlitePool;

use super::db::{invoices, new_pool, orders, tickets};
use crate::{
    db_types::{
        Invoice,
        NewInvoice,
        NewOrder,
        NewTicket,
        Order,
        OrderId,
        OrderStatus,
        SupportTicket,
        TicketStatus,
    },
    invoice_objects::InvoiceQueryFilter,
    order_objects::{OrderQueryFilter, TicketQueryFilter},
    traits::{
        InvoiceManagement,
        InvoiceStats,
        InvoiceStoreError,
        OrderApiError,
        OrderManagement,
        OrderProgress,
        TicketApiError,
        TicketManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url` and brings the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_active_orders(&self) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_active_orders(&mut conn).await?)
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_id(id, &mut conn).await?)
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_order_id(order_id, &mut conn).await?)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::search_orders(query, &mut conn).await?)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn apply_order_progress(&self, id: i64, progress: OrderProgress) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::apply_order_progress(id, progress, &mut conn).await
    }

    async fn set_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_order_status(id, status, &mut conn).await
    }
}

impl TicketManagement for SqliteDatabase {
    async fn fetch_tickets_for_order(&self, order_id: &OrderId) -> Result<Vec<SupportTicket>, TicketApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(tickets::fetch_tickets_for_order(order_id, &mut conn).await?)
    }

    async fn fetch_ticket_by_id(&self, id: i64) -> Result<Option<SupportTicket>, TicketApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(tickets::fetch_ticket_by_id(id, &mut conn).await?)
    }

    async fn search_tickets(&self, query: TicketQueryFilter) -> Result<Vec<SupportTicket>, TicketApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(tickets::search_tickets(query, &mut conn).await?)
    }

    async fn insert_ticket(&self, ticket: NewTicket) -> Result<SupportTicket, TicketApiError> {
        let mut conn = self.pool.acquire().await?;
        tickets::insert_ticket(ticket, &mut conn).await
    }

    async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<SupportTicket, TicketApiError> {
        let mut conn = self.pool.acquire().await?;
        tickets::set_ticket_status(id, status, &mut conn).await
    }
}

impl InvoiceManagement for SqliteDatabase {
    async fn fetch_invoice_by_id(&self, id: i64) -> Result<Option<Invoice>, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(invoices::fetch_invoice_by_id(id, &mut conn).await?)
    }

    async fn fetch_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(invoices::fetch_invoice_by_number(number, &mut conn).await?)
    }

    async fn search_invoices(&self, query: InvoiceQueryFilter) -> Result<Vec<Invoice>, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(invoices::search_invoices(query, &mut conn).await?)
    }

    async fn fetch_duplicate_candidates(
        &self,
        vendor: &str,
        total_amount: Money,
        invoice_date: NaiveDate,
        tolerance_days: i64,
    ) -> Result<Vec<Invoice>, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(invoices::fetch_duplicate_candidates(vendor, total_amount, invoice_date, tolerance_days, &mut conn).await?)
    }

    async fn latest_invoice_number_with_prefix(&self, prefix: &str) -> Result<Option<String>, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(invoices::latest_invoice_number_with_prefix(prefix, &mut conn).await?)
    }

    async fn insert_invoice(&self, invoice: NewInvoice, invoice_number: &str) -> Result<Invoice, InvoiceStoreError> {
        let mut tx = self.pool.begin().await?;
        let stored = invoices::insert_invoice(invoice, invoice_number, &mut tx).await?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn invoice_stats(&self) -> Result<InvoiceStats, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(invoices::invoice_stats(&mut conn).await?)
    }
}
