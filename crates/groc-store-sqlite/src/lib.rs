//! SQLite backend for the groc purchase store.
//!
//! Wraps a single synchronous [`rusqlite::Connection`]; every write runs in
//! its own transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
