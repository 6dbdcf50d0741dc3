use chrono::NaiveDate;
use homestead_engine::{
    db_types::{Invoice, NewInvoice, NewOrder, NewTicket, Order, OrderId, OrderStatus, SupportTicket, TicketStatus},
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
use hs_common::Money;
use mockall::mock;

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn fetch_active_orders(&self) -> Result<Vec<Order>, OrderApiError>;
        async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderApiError>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;
        async fn apply_order_progress(&self, id: i64, progress: OrderProgress) -> Result<Order, OrderApiError>;
        async fn set_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, OrderApiError>;
    }
}

mock! {
    pub TicketManager {}
    impl TicketManagement for TicketManager {
        async fn fetch_tickets_for_order(&self, order_id: &OrderId) -> Result<Vec<SupportTicket>, TicketApiError>;
        async fn fetch_ticket_by_id(&self, id: i64) -> Result<Option<SupportTicket>, TicketApiError>;
        async fn search_tickets(&self, query: TicketQueryFilter) -> Result<Vec<SupportTicket>, TicketApiError>;
        async fn insert_ticket(&self, ticket: NewTicket) -> Result<SupportTicket, TicketApiError>;
        async fn set_ticket_status(&self, id: i64, status: TicketStatus) -> Result<SupportTicket, TicketApiError>;
    }
}

mock! {
    pub InvoiceManager {}
    impl InvoiceManagement for InvoiceManager {
        async fn fetch_invoice_by_id(&self, id: i64) -> Result<Option<Invoice>, InvoiceStoreError>;
        async fn fetch_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, InvoiceStoreError>;
        async fn search_invoices(&self, query: InvoiceQueryFilter) -> Result<Vec<Invoice>, InvoiceStoreError>;
        async fn fetch_duplicate_candidates(
            &self,
            vendor: &str,
            total_amount: Money,
            invoice_date: NaiveDate,
            tolerance_days: i64,
        ) -> Result<Vec<Invoice>, InvoiceStoreError>;
        async fn latest_invoice_number_with_prefix(&self, prefix: &str) -> Result<Option<String>, InvoiceStoreError>;
        async fn insert_invoice(&self, invoice: NewInvoice, invoice_number: &str) -> Result<Invoice, InvoiceStoreError>;
        async fn invoice_stats(&self) -> Result<InvoiceStats, InvoiceStoreError>;
    }
}
