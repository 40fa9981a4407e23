//! Subcommand implementations.
//!
//! Every command takes the store explicitly and writes its report to `out`,
//! so the whole surface can be driven against an in-memory store.

use std::{io::Write, path::Path};

use anyhow::{Context as _, Result, bail};
use chrono::{Datelike as _, NaiveDate};
use groc_core::{
  import,
  purchase::{MonthlyBreakdown, Purchase},
  row::{FieldValue, RawRow},
  store::{Period, PurchaseQuery, PurchaseStore},
};
use groc_store_sqlite::SqliteStore;

use crate::{
  AddArgs, BreakdownArgs, DeleteArgs, ListArgs,
  settings::expand_tilde,
  table::{self, Column},
};

/// Upper bound on `list --limit`.
pub const MAX_LIMIT: usize = 100;

const EMPTY_HINT: &str =
  "No purchase entries available. You should add some!\nSee groc add --help to add purchases.";

const PLACEHOLDER: &str = "--";

// ─── init / reset ────────────────────────────────────────────────────────────

/// Create the database file and its parent directory.
pub fn init(path: &Path, verbose: bool, out: &mut dyn Write) -> Result<()> {
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    if dir.is_dir() {
      if verbose {
        writeln!(out, "Groc directory exists")?;
      }
    } else {
      if verbose {
        writeln!(out, "Creating groc directory")?;
      }
      std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    }
  }

  if verbose {
    writeln!(out, "Attempting to create database...")?;
  }
  if path.exists() {
    bail!("Database already exists!");
  }

  SqliteStore::open(path)
    .with_context(|| format!("failed to create database at {}", path.display()))?;
  if verbose {
    writeln!(out, "Database created at {}", path.display())?;
  }
  Ok(())
}

pub fn reset<S: PurchaseStore>(store: &mut S, dry_run: bool, out: &mut dyn Write) -> Result<()> {
  let count = store.purchase_count()?;
  writeln!(out, "Database reset will delete {count} purchase entries.")?;

  if !dry_run {
    store.clear()?;
    writeln!(out, "Database reset successful.")?;
  }
  Ok(())
}

// ─── list ────────────────────────────────────────────────────────────────────

pub fn list<S: PurchaseStore>(
  store: &S,
  args: &ListArgs,
  today: NaiveDate,
  out: &mut dyn Write,
) -> Result<()> {
  if store.purchase_count()? == 0 {
    writeln!(out, "{EMPTY_HINT}")?;
    return Ok(());
  }

  let limit = args.limit.min(MAX_LIMIT);
  let period = args.month.map(|month| Period {
    month,
    year: args.year.unwrap_or_else(|| today.year()),
  });

  let query = PurchaseQuery {
    period,
    limit: (!(args.all && period.is_some())).then_some(limit),
  };
  let purchases = store.list_purchases(&query)?;

  if args.json {
    serde_json::to_writer_pretty(&mut *out, &purchases)?;
    writeln!(out)?;
    return Ok(());
  }

  let title = match period {
    Some(p) if args.all => format!("All purchases from {:02}/{:04}", p.month, p.year),
    Some(p) => format!("Last {limit} purchase(s) from {:02}/{:04}", p.month, p.year),
    None => format!("Last {limit} purchase(s)"),
  };

  writeln!(out, "{}", purchase_table(Some(&title), &purchases, args.verbose))?;
  Ok(())
}

fn purchase_table(title: Option<&str>, purchases: &[Purchase], with_id: bool) -> String {
  let mut columns = vec![
    Column::new("date"),
    Column::right("total"),
    Column::right("store"),
    Column::left("description"),
  ];
  if with_id {
    columns.insert(0, Column::new("id"));
  }

  let rows = purchases.iter().map(|p| {
    let mut row = vec![
      p.date.to_string(),
      p.total.dollars(),
      p.store.clone(),
      p.description_or_placeholder().to_owned(),
    ];
    if with_id {
      row.insert(0, p.id.to_string());
    }
    row
  });

  table::render(&table::build(title, &columns, rows))
}

// ─── breakdown ───────────────────────────────────────────────────────────────

pub fn breakdown<S: PurchaseStore>(
  store: &S,
  args: &BreakdownArgs,
  today: NaiveDate,
  out: &mut dyn Write,
) -> Result<()> {
  if store.purchase_count()? == 0 {
    writeln!(out, "{EMPTY_HINT}")?;
    return Ok(());
  }

  let (months, years) = breakdown_filters(&args.months, &args.years, today);
  let stats = store.breakdown(&months, &years)?;

  if args.json {
    serde_json::to_writer_pretty(&mut *out, &stats)?;
    writeln!(out)?;
    return Ok(());
  }

  writeln!(out, "{}", breakdown_table(&stats, args.verbose))?;
  Ok(())
}

/// Resolve the month and year filters. Years alone select every month of
/// those years; anything left unset defaults to `today`.
pub fn breakdown_filters(months: &[u32], years: &[i32], today: NaiveDate) -> (Vec<u32>, Vec<i32>) {
  let months = match (months.is_empty(), years.is_empty()) {
    (true, false) => (1..=12).collect(),
    (true, true) => vec![today.month()],
    (false, _) => months.to_vec(),
  };
  let years = if years.is_empty() { vec![today.year()] } else { years.to_vec() };
  (months, years)
}

fn breakdown_table(stats: &[MonthlyBreakdown], verbose: bool) -> String {
  let mut columns = vec![
    Column::new("year"),
    Column::new("month"),
    Column::new("total"),
    Column::new("purchase count"),
  ];
  if verbose {
    columns.extend([
      Column::new("min purchase"),
      Column::new("max purchase"),
      Column::new("avg purchase"),
      Column::new("store count"),
    ]);
  }

  let mut rows: Vec<Vec<String>> = stats
    .iter()
    .map(|b| {
      let mut row = vec![
        b.year.to_string(),
        month_abbrev(b.year, b.month),
        b.total.dollars(),
        b.purchase_count.to_string(),
      ];
      if verbose {
        row.extend([
          b.min_purchase.dollars(),
          b.max_purchase.dollars(),
          b.avg_purchase.dollars(),
          b.store_count.to_string(),
        ]);
      }
      row
    })
    .collect();

  if rows.is_empty() {
    rows.push(vec![PLACEHOLDER.to_owned(); columns.len()]);
  }
  table::render(&table::build(None, &columns, rows))
}

fn month_abbrev(year: i32, month: u32) -> String {
  NaiveDate::from_ymd_opt(year, month, 1)
    .map_or_else(|| format!("{month:02}"), |d| d.format("%b").to_string())
}

// ─── delete ──────────────────────────────────────────────────────────────────

pub fn delete<S: PurchaseStore>(store: &mut S, args: &DeleteArgs, out: &mut dyn Write) -> Result<()> {
  let found = store.existing_ids(&args.ids)?;

  if found.is_empty() {
    writeln!(out, "No purchases with id(s) {} to be deleted.", join_ids(&args.ids))?;
    return Ok(());
  }

  if args.verbose {
    let purchases = store.get_purchases(&found)?;
    writeln!(out, "{}", purchase_table(None, &purchases, true))?;
  }

  writeln!(out, "Deleting purchases with id(s) {}.", join_ids(&found))?;
  if !args.dry_run {
    store.delete_purchases(&found)?;
    writeln!(out, "Delete successful.")?;
  }
  Ok(())
}

fn join_ids(ids: &[i64]) -> String {
  ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
}

// ─── add ─────────────────────────────────────────────────────────────────────

pub fn add<S: PurchaseStore>(
  store: &mut S,
  args: AddArgs,
  today: NaiveDate,
  out: &mut dyn Write,
) -> Result<()> {
  let count = match (args.source, args.store) {
    (Some(source), _) => {
      import::add_from_path(store, &expand_tilde(&source), args.ignore_duplicate)?
    }
    (None, Some(name)) => {
      let row = RawRow {
        date:        FieldValue::Date(args.date.unwrap_or(today)),
        store:       FieldValue::Text(name),
        total:       FieldValue::from(args.total),
        description: FieldValue::from(args.description),
      };
      usize::from(import::insert_one(store, row, args.ignore_duplicate)?)
    }
    (None, None) => bail!("either --source or --store and --total is required"),
  };

  writeln!(out, "Added {count} purchase(s) successfully.")?;
  Ok(())
}
