//! An in-memory realtime database.
//!
//! [`MemoryDatabase`] implements the [`pathdb_core::DatabaseClient`]
//! contract in-process: partial updates, optimistic transactions, value
//! listeners, access rules, and one-shot failure injection for tests.

mod config;
mod database;
mod listeners;
mod rules;

pub use config::{ConfigError, MemoryConfig, DEFAULT_MAX_TRANSACTION_RETRIES};
pub use database::MemoryDatabase;
pub use listeners::{ListenerId, ValueEvent};
