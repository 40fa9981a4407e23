//! The `PurchaseStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `groc-store-sqlite`).
//! The import pipeline and the CLI depend on this abstraction, not on any
//! concrete backend. Every operation takes the store explicitly; there is no
//! process-wide connection.

use crate::purchase::{MonthlyBreakdown, Purchase, PurchaseRow};

// ─── Failure kinds ───────────────────────────────────────────────────────────

/// Structured classification of a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// A uniqueness rule rejected the write.
  Unique,
  /// A required column received NULL.
  NotNull,
  Other,
}

/// Implemented by backend error types so callers can classify failures
/// without inspecting message text.
pub trait StoreFailure: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> FailureKind;
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// A calendar month filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
  /// 1-based month number.
  pub month: u32,
  pub year:  i32,
}

/// Parameters for [`PurchaseStore::list_purchases`].
#[derive(Debug, Clone, Default)]
pub struct PurchaseQuery {
  /// Restrict to purchases made in this month.
  pub period: Option<Period>,
  pub limit:  Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a groc purchase store backend.
///
/// Stores are created only as a side effect of inserting a purchase.
/// Purchases are never updated.
pub trait PurchaseStore {
  type Error: StoreFailure;

  // ── Writes ──────────────────────────────────────────────────────────────

  /// Insert a purchase, creating its store if needed, and return the new
  /// purchase id.
  ///
  /// The whole write is one transaction. A purchase whose date, total,
  /// store and description match an existing one fails with
  /// [`FailureKind::Unique`], where two absent descriptions count as equal.
  fn insert_purchase(&mut self, row: &PurchaseRow) -> Result<i64, Self::Error>;

  /// Delete purchases by id and return how many were removed.
  fn delete_purchases(&mut self, ids: &[i64]) -> Result<usize, Self::Error>;

  /// Delete every purchase and store, keeping the schema.
  fn clear(&mut self) -> Result<(), Self::Error>;

  // ── Reads ───────────────────────────────────────────────────────────────

  fn purchase_count(&self) -> Result<u64, Self::Error>;

  fn store_count(&self) -> Result<u64, Self::Error>;

  /// Newest purchases first, filtered and limited by `query`.
  fn list_purchases(
    &self,
    query: &PurchaseQuery,
  ) -> Result<Vec<Purchase>, Self::Error>;

  /// Purchases with the given ids, newest first. Unknown ids are skipped.
  fn get_purchases(&self, ids: &[i64]) -> Result<Vec<Purchase>, Self::Error>;

  /// The subset of `ids` that exist, ascending.
  fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, Self::Error>;

  /// Monthly statistics for every `(month, year)` combination that has
  /// purchases, newest month first.
  fn breakdown(
    &self,
    months: &[u32],
    years: &[i32],
  ) -> Result<Vec<MonthlyBreakdown>, Self::Error>;
}
