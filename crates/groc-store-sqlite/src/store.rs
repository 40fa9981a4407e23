//! [`SqliteStore`], the SQLite implementation of [`PurchaseStore`].

use std::path::Path;

use groc_core::{
  purchase::{MonthlyBreakdown, Purchase, PurchaseRow},
  store::{PurchaseQuery, PurchaseStore},
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, params, params_from_iter};
use tracing::debug;

use crate::{
  Error, Result,
  encode::{RawBreakdown, RawPurchase, encode_date, encode_month, encode_year, placeholders},
  schema::SCHEMA,
};

const SELECT_PURCHASES: &str = "
SELECT p.id, p.purchase_date, p.total, s.name, p.description
FROM purchase p
INNER JOIN store s ON p.store_id = s.id";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A groc purchase store backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    let store = Self { conn };
    store.init_schema()?;
    debug!(path = %path.display(), "opened purchase store");
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    let store = Self { conn };
    store.init_schema()?;
    Ok(store)
  }

  fn init_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  fn count(&self, sql: &str) -> Result<u64> {
    let n: i64 = self.conn.query_row(sql, [], |r| r.get(0))?;
    u64::try_from(n).map_err(|_| Error::OutOfRange(format!("count: {n}")))
  }

  fn query_purchases(
    &self,
    sql: &str,
    params: impl rusqlite::Params,
  ) -> Result<Vec<Purchase>> {
    let mut stmt = self.conn.prepare(sql)?;
    let raws = stmt
      .query_map(params, RawPurchase::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawPurchase::into_purchase).collect()
  }
}

/// Whether a purchase with no description already matches this one.
///
/// The UNIQUE constraint never fires for NULL descriptions, so this check
/// stands in for it inside the insert transaction.
fn null_description_exists(
  tx: &Transaction<'_>,
  date: &str,
  total: i64,
  store_id: i64,
) -> Result<bool> {
  Ok(tx.query_row(
    "SELECT EXISTS (
       SELECT 1 FROM purchase
       WHERE purchase_date = ?1
         AND total = ?2
         AND store_id = ?3
         AND description IS NULL
     )",
    params![date, total, store_id],
    |r| r.get(0),
  )?)
}

// ─── PurchaseStore impl ──────────────────────────────────────────────────────

impl PurchaseStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  fn insert_purchase(&mut self, row: &PurchaseRow) -> Result<i64> {
    let date  = encode_date(row.date);
    let total = row.total.as_i64();

    // Dropping `tx` without committing rolls everything back.
    let tx = self.conn.transaction()?;

    tx.execute("INSERT OR IGNORE INTO store (name) VALUES (?1)", params![row.store])?;
    let store_id: Option<i64> = tx
      .query_row(
        "SELECT id FROM store WHERE name = ?1",
        params![row.store],
        |r| r.get(0),
      )
      .optional()?;

    if row.description.is_none()
      && let Some(store_id) = store_id
      && null_description_exists(&tx, &date, total, store_id)?
    {
      return Err(Error::DuplicatePurchase);
    }

    // A missing store id trips the NOT NULL constraint on `store_id`.
    tx.execute(
      "INSERT INTO purchase (purchase_date, total, description, store_id)
       VALUES (?1, ?2, ?3, ?4)",
      params![date, total, row.description, store_id],
    )?;
    let id = tx.last_insert_rowid();

    tx.commit()?;
    Ok(id)
  }

  fn delete_purchases(&mut self, ids: &[i64]) -> Result<usize> {
    if ids.is_empty() {
      return Ok(0);
    }

    let sql = format!("DELETE FROM purchase WHERE id IN ({})", placeholders(ids.len()));
    Ok(self.conn.execute(&sql, params_from_iter(ids))?)
  }

  fn clear(&mut self) -> Result<()> {
    let tx = self.conn.transaction()?;
    tx.execute_batch("DELETE FROM purchase; DELETE FROM store;")?;
    tx.commit()?;
    debug!("cleared all purchases and stores");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  fn purchase_count(&self) -> Result<u64> { self.count("SELECT COUNT(*) FROM purchase") }

  fn store_count(&self) -> Result<u64> { self.count("SELECT COUNT(*) FROM store") }

  fn list_purchases(&self, query: &PurchaseQuery) -> Result<Vec<Purchase>> {
    let month = query.period.map(|p| encode_month(p.month));
    let year  = query.period.map(|p| encode_year(p.year));
    // SQLite treats a negative LIMIT as "no limit".
    let limit = query
      .limit
      .map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));

    let sql = format!(
      "{SELECT_PURCHASES}
       WHERE (?1 IS NULL OR strftime('%m', p.purchase_date) = ?1)
         AND (?2 IS NULL OR strftime('%Y', p.purchase_date) = ?2)
       ORDER BY p.purchase_date DESC, p.id DESC
       LIMIT ?3"
    );

    self.query_purchases(&sql, params![month, year, limit])
  }

  fn get_purchases(&self, ids: &[i64]) -> Result<Vec<Purchase>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let sql = format!(
      "{SELECT_PURCHASES}
       WHERE p.id IN ({})
       ORDER BY p.purchase_date DESC, p.id DESC",
      placeholders(ids.len())
    );

    self.query_purchases(&sql, params_from_iter(ids))
  }

  fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let sql = format!(
      "SELECT id FROM purchase WHERE id IN ({}) ORDER BY id",
      placeholders(ids.len())
    );
    let mut stmt = self.conn.prepare(&sql)?;
    let found = stmt
      .query_map(params_from_iter(ids), |r| r.get(0))?
      .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(found)
  }

  fn breakdown(&self, months: &[u32], years: &[i32]) -> Result<Vec<MonthlyBreakdown>> {
    if months.is_empty() || years.is_empty() {
      return Ok(Vec::new());
    }

    let filters: Vec<String> = months
      .iter()
      .copied()
      .map(encode_month)
      .chain(years.iter().copied().map(encode_year))
      .collect();

    let sql = format!(
      "SELECT
         strftime('%m', p.purchase_date) AS num_month,
         strftime('%Y', p.purchase_date) AS year,
         SUM(p.total),
         COUNT(p.id),
         MIN(p.total),
         MAX(p.total),
         CAST(ROUND(AVG(p.total)) AS INTEGER),
         COUNT(DISTINCT p.store_id)
       FROM purchase p
       WHERE num_month IN ({}) AND year IN ({})
       GROUP BY num_month, year
       ORDER BY year DESC, num_month DESC",
      placeholders(months.len()),
      placeholders(years.len()),
    );

    let mut stmt = self.conn.prepare(&sql)?;
    let raws = stmt
      .query_map(params_from_iter(&filters), RawBreakdown::from_row)?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawBreakdown::into_breakdown).collect()
  }
}
