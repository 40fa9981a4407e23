//! SQL schema for the groc SQLite store.
//!
//! Executed at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The purchase UNIQUE constraint treats NULL descriptions as distinct, so
/// duplicates without a description are caught by an explicit check in
/// [`crate::SqliteStore`] instead.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS store (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  VARCHAR(50) NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS purchase (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    purchase_date  DATE    NOT NULL,   -- YYYY-MM-DD
    total          INTEGER NOT NULL,   -- cents
    description    TEXT,
    store_id       INTEGER NOT NULL REFERENCES store(id),
    UNIQUE (purchase_date, total, description, store_id)
);

CREATE INDEX IF NOT EXISTS purchase_date_idx ON purchase(purchase_date);

PRAGMA user_version = 1;
";

/// Date format of the `purchase_date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
