//! Error types for `groc-core`.

use std::{fmt, path::PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{money::Cents, row::RowError};

/// A boxed error from a storage backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a purchase could not be written, once duplicates are ruled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertFailure {
  /// The storage layer rejected a NULL in a required column.
  MissingRequiredField,
  Other,
}

impl fmt::Display for InsertFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MissingRequiredField => {
        f.write_str("Received incorrect value for required field(s).")
      }
      Self::Other => f.write_str("Error saving purchase to database."),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// The row failed schema, required-value or conversion checks.
  #[error(transparent)]
  InvalidRow(#[from] RowError),

  #[error(
    "Duplicate purchase detected -- (date: {date}, store: {store}, total: {total}, description: {})",
    .description.as_deref().unwrap_or("None")
  )]
  DuplicateRow {
    date:        NaiveDate,
    store:       String,
    total:       Cents,
    description: Option<String>,
  },

  #[error("{reason}")]
  DatabaseInsert {
    reason: InsertFailure,
    #[source]
    source: BoxError,
  },

  #[error("Error reading file: {}", .path.display())]
  ReadFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Error reading file: {}: {source}", .path.display())]
  Csv {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("Error reading directory: {}: {source}", .path.display())]
  Walk {
    path:   PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("{} could not be found!", .0.display())]
  PathNotFound(PathBuf),
}

impl Error {
  pub fn is_duplicate(&self) -> bool { matches!(self, Self::DuplicateRow { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
