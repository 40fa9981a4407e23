//! Error type for `groc-store-sqlite`.

use groc_core::store::{FailureKind, StoreFailure};
use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// A purchase with no description matched an existing one.
  #[error("purchase entry already exists")]
  DuplicatePurchase,

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("value out of range: {0}")]
  OutOfRange(String),
}

impl StoreFailure for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Self::DuplicatePurchase => FailureKind::Unique,
      Self::Database(rusqlite::Error::SqliteFailure(err, _))
        if err.code == ErrorCode::ConstraintViolation =>
      {
        match err.extended_code {
          ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            FailureKind::Unique
          }
          ffi::SQLITE_CONSTRAINT_NOTNULL => FailureKind::NotNull,
          _ => FailureKind::Other,
        }
      }
      _ => FailureKind::Other,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
