//! SQLite database module for the Homestead engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
