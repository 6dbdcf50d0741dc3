//! # Homestead engine public API
//!
//! The `api` module exposes the programmatic API of the engine. An API instance is created by supplying a storage
//! backend that implements the traits the API requires:
//!
//! ```rust,ignore
//! use homestead_engine::{InvoiceApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/homestead.db", 25).await?;
//! // SqliteDatabase implements InvoiceManagement
//! let api = InvoiceApi::new(db);
//! let invoice = api.invoice_by_number("INV-2025-000001").await?;
//! ```
//!
//! * [`progression_api`] drives the order lifecycle: one scan advances every eligible order at most one step.
//! * [`invoice_api`] validates, de-duplicates, numbers and stores vendor invoices.
//! * [`order_api`] and [`ticket_api`] are the thin CRUD layers behind the HTTP surface.

pub mod invoice_api;
pub mod invoice_objects;
pub mod order_api;
pub mod order_objects;
pub mod progression_api;
pub mod ticket_api;
