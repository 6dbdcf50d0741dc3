//! Homestead Engine
//!
//! The engine holds the core logic of the Homestead retail operations platform: order lifecycle progression, support
//! ticket gating, and vendor invoice validation. It is transport-agnostic; the HTTP server crate sits on top of it.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`] behind the [`traits`] contracts). You should never need to
//!    access the database directly; use the public APIs instead. The exception is the data types used in the
//!    database, which are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@api`]). An API instance is created by supplying a storage backend that implements
//!    the traits the API requires, which is what makes the HTTP layer testable against mocks.
mod api;
mod sqlite;

pub mod db_types;
pub mod traits;

pub use api::{
    invoice_api::{validate_invoice, InvoiceApi, InvoiceApiError, DUPLICATE_WINDOW_DAYS},
    invoice_objects,
    order_api::OrderApi,
    order_objects,
    progression_api::{evaluate_transition, ProgressionApi},
    ticket_api::TicketApi,
};
pub use sqlite::SqliteDatabase;
