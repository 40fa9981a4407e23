//! Insert engine: writes a normalized row through a [`PurchaseStore`] and
//! maps storage failures onto the domain error taxonomy.

use crate::{
  Error, InsertFailure, Result,
  purchase::PurchaseRow,
  store::{FailureKind, PurchaseStore, StoreFailure},
};

/// Insert one normalized purchase and return its id.
///
/// # Errors
///
/// - [`Error::DuplicateRow`] if the purchase already exists.
/// - [`Error::DatabaseInsert`] for a missing required value or any other
///   storage failure.
pub fn insert_row<S: PurchaseStore>(store: &mut S, row: &PurchaseRow) -> Result<i64> {
  store.insert_purchase(row).map_err(|err| classify(row, err))
}

fn classify<E: StoreFailure>(row: &PurchaseRow, err: E) -> Error {
  let reason = match err.kind() {
    FailureKind::Unique => {
      return Error::DuplicateRow {
        date:        row.date,
        store:       row.store.clone().unwrap_or_default(),
        total:       row.total,
        description: row.description.clone(),
      };
    }
    FailureKind::NotNull => InsertFailure::MissingRequiredField,
    FailureKind::Other => InsertFailure::Other,
  };

  Error::DatabaseInsert { reason, source: Box::new(err) }
}
