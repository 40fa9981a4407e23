//! Encoding and decoding helpers between domain types and the values stored
//! in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text so `strftime` can group on them.
//! Totals are integer cents.

use chrono::NaiveDate;
use groc_core::{
  Cents,
  purchase::{MonthlyBreakdown, Purchase},
};

use crate::{Error, Result, schema::DATE_FORMAT};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Two-digit month as produced by `strftime('%m', ...)`.
pub fn encode_month(month: u32) -> String { format!("{month:02}") }

/// Four-digit year as produced by `strftime('%Y', ...)`.
pub fn encode_year(year: i32) -> String { format!("{year:04}") }

fn decode_count(value: i64, column: &str) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::OutOfRange(format!("{column}: {value}")))
}

fn decode_number<T: std::str::FromStr>(s: &str, column: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::OutOfRange(format!("{column}: {s:?}")))
}

/// Comma-separated `?` placeholders for an `IN (...)` clause.
pub fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `purchase` row joined with `store`.
pub struct RawPurchase {
  pub id:          i64,
  pub date:        String,
  pub total:       i64,
  pub store:       String,
  pub description: Option<String>,
}

impl RawPurchase {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      date:        row.get(1)?,
      total:       row.get(2)?,
      store:       row.get(3)?,
      description: row.get(4)?,
    })
  }

  pub fn into_purchase(self) -> Result<Purchase> {
    Ok(Purchase {
      id:          self.id,
      date:        decode_date(&self.date)?,
      total:       Cents(self.total),
      store:       self.store,
      description: self.description,
    })
  }
}

/// Raw values from the monthly breakdown aggregate query.
pub struct RawBreakdown {
  pub month:          String,
  pub year:           String,
  pub total:          i64,
  pub purchase_count: i64,
  pub min_purchase:   i64,
  pub max_purchase:   i64,
  pub avg_purchase:   i64,
  pub store_count:    i64,
}

impl RawBreakdown {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      month:          row.get(0)?,
      year:           row.get(1)?,
      total:          row.get(2)?,
      purchase_count: row.get(3)?,
      min_purchase:   row.get(4)?,
      max_purchase:   row.get(5)?,
      avg_purchase:   row.get(6)?,
      store_count:    row.get(7)?,
    })
  }

  pub fn into_breakdown(self) -> Result<MonthlyBreakdown> {
    Ok(MonthlyBreakdown {
      year:           decode_number(&self.year, "year")?,
      month:          decode_number(&self.month, "month")?,
      total:          Cents(self.total),
      purchase_count: decode_count(self.purchase_count, "purchase_count")?,
      min_purchase:   Cents(self.min_purchase),
      max_purchase:   Cents(self.max_purchase),
      avg_purchase:   Cents(self.avg_purchase),
      store_count:    decode_count(self.store_count, "store_count")?,
    })
  }
}
