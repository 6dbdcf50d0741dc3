use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use hs_common::Money;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------        OrderId        -------------------------------------------------------
/// The customer-facing order number, e.g. `ORD-10023`. Assigned at creation and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      OrderStatus      -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Newly placed, awaiting the production queue.
    Pending,
    /// Confirmed manually by sales. Not auto-advanced.
    Confirmed,
    /// The home is being built.
    InProduction,
    /// Staged for transport. Manually set, not auto-advanced.
    ReadyToShip,
    /// In transit to the customer's site.
    Shipped,
    /// Delivered and signed for. Terminal.
    Delivered,
    /// Cancelled by the customer or an admin. Terminal.
    Cancelled,
    /// Parked by an admin. Not auto-advanced.
    OnHold,
}

impl OrderStatus {
    /// The subset of statuses the lifecycle advancer acts on. Everything else is terminal or manually managed.
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InProduction | OrderStatus::Shipped)
    }

    pub const ACTIVE_STATUSES: [OrderStatus; 3] =
        [OrderStatus::Pending, OrderStatus::InProduction, OrderStatus::Shipped];
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::InProduction => "InProduction",
            OrderStatus::ReadyToShip => "ReadyToShip",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::OnHold => "OnHold",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Confirmed" => Ok(Self::Confirmed),
            "InProduction" => Ok(Self::InProduction),
            "ReadyToShip" => Ok(Self::ReadyToShip),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            "OnHold" => Ok(Self::OnHold),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatus::Pending
        })
    }
}

//--------------------------------------        Order         --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub customer_id: String,
    /// The home model ordered, e.g. "Aspen 2400".
    pub home_model: String,
    pub total_price: Money,
    pub status: OrderStatus,
    /// When the order was placed. Immutable.
    pub order_date: DateTime<Utc>,
    /// Set once, on the transition into `Shipped` (or by a manual status call). Never re-derived.
    pub shipped_date: Option<DateTime<Utc>>,
    /// Set once, on the transition into `Delivered` (or by a manual status call).
    pub delivered_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder       --------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub customer_id: String,
    pub home_model: String,
    pub total_price: Money,
    /// The time the order was placed. Defaults to the time of insertion.
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}

impl NewOrder {
    pub fn new(order_id: OrderId, customer_id: String, home_model: String, total_price: Money) -> Self {
        Self { order_id, customer_id, home_model, total_price, order_date: None }
    }
}

//--------------------------------------     TicketStatus     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    InProgress,
    PendingCustomer,
    Resolved,
    Closed,
    Cancelled,
}

impl TicketStatus {
    /// A ticket blocks order progression unless it has been resolved, closed or cancelled.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, TicketStatus::Resolved | TicketStatus::Closed | TicketStatus::Cancelled)
    }
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "InProgress",
            TicketStatus::PendingCustomer => "PendingCustomer",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
            TicketStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TicketStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            "InProgress" => Ok(Self::InProgress),
            "PendingCustomer" => Ok(Self::PendingCustomer),
            "Resolved" => Ok(Self::Resolved),
            "Closed" => Ok(Self::Closed),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid ticket status: {s}"))),
        }
    }
}

//--------------------------------------    TicketPriority    --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Critical => "Critical",
        };
        write!(f, "{s}")
    }
}

//--------------------------------------     SupportTicket    --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: i64,
    pub subject: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    /// Weak reference to the order this ticket concerns, if any. The ticket does not own the order.
    pub order_id: Option<OrderId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub subject: String,
    pub priority: TicketPriority,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

//--------------------------------------     InvoiceStatus    --------------------------------------------------------
/// Invoice lifecycle status. Invoices are always created as `Pending`; every later transition is made externally
/// (approvals, payment runs, reconciliation). In particular, `Duplicate` is a reconciliation outcome and is distinct
/// from the create-time duplicate rejection, which never persists anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Pending,
    Approved,
    Duplicate,
    Rejected,
    Paid,
    Cancelled,
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Approved => "Approved",
            InvoiceStatus::Duplicate => "Duplicate",
            InvoiceStatus::Rejected => "Rejected",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

impl FromStr for InvoiceStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Duplicate" => Ok(Self::Duplicate),
            "Rejected" => Ok(Self::Rejected),
            "Paid" => Ok(Self::Paid),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid invoice status: {s}"))),
        }
    }
}

//--------------------------------------        Invoice       --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    /// `INV-<year>-<6 digit sequence>`, unique, scoped per calendar year.
    pub invoice_number: String,
    pub vendor: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal_amount: Money,
    pub tax_amount: Money,
    pub shipping_amount: Money,
    pub total_amount: Money,
    pub status: InvoiceStatus,
    pub category: Option<String>,
    pub created_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub line_items: Vec<InvoiceLineItem>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub id: i64,
    pub invoice_id: i64,
    pub description: String,
    pub quantity: f64,
    pub unit_price: Money,
    pub amount: Money,
}

//--------------------------------------      NewInvoice      --------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub vendor: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal_amount: Money,
    pub tax_amount: Money,
    /// Defaults to zero when the submitter omits it.
    #[serde(default)]
    pub shipping_amount: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub line_items: Vec<NewLineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: Money,
    pub amount: Money,
}
