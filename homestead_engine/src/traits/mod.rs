//! Interface contracts for Homestead storage backends.
//!
//! The engine never talks to a database directly; it goes through these traits so that the HTTP layer can be tested
//! against mocks and so that another backend could be swapped in without touching the APIs.
//!
//! * [`OrderManagement`] covers order records and the single-record progress writes the lifecycle advancer makes.
//! * [`TicketManagement`] covers support tickets, including the per-order lookup the advancer gates on.
//! * [`InvoiceManagement`] covers invoice storage: duplicate-candidate queries, invoice-number sequencing and
//!   transactional inserts of an invoice with its line items.
mod data_objects;
mod invoice_management;
mod order_management;
mod ticket_management;

pub use data_objects::{InvoiceStats, OrderProgress, ProgressionSettings, ScanSummary, TicketGate, VendorStats};
pub use invoice_management::{InvoiceManagement, InvoiceStoreError};
pub use order_management::{OrderApiError, OrderManagement};
pub use ticket_management::{TicketApiError, TicketManagement};
