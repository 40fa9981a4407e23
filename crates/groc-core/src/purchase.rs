//! Purchase types: the normalized row written by the insert engine and the
//! read models returned by queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Cents;

/// Placeholder shown wherever a purchase has no description.
pub const NO_DESCRIPTION: &str = "--";

/// A validated, normalized row ready for insertion.
///
/// `store` is `None` only when the supplied name cleaned down to nothing; the
/// storage layer rejects that as a missing required field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRow {
  pub date:        NaiveDate,
  pub total:       Cents,
  pub store:       Option<String>,
  pub description: Option<String>,
}

/// A persisted purchase joined with its store name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
  pub id:          i64,
  pub date:        NaiveDate,
  pub total:       Cents,
  pub store:       String,
  pub description: Option<String>,
}

impl Purchase {
  pub fn description_or_placeholder(&self) -> &str {
    self.description.as_deref().unwrap_or(NO_DESCRIPTION)
  }
}

/// Purchase statistics for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
  pub year:           i32,
  /// 1-based month number.
  pub month:          u32,
  pub total:          Cents,
  pub purchase_count: u64,
  pub min_purchase:   Cents,
  pub max_purchase:   Cents,
  /// Mean purchase, rounded to the nearest cent.
  pub avg_purchase:   Cents,
  /// Number of distinct stores purchased from.
  pub store_count:    u64,
}
