//! Batch import: drives rows from manual entry or CSV files through
//! validation, normalization and the insert engine.
//!
//! Rows are committed one at a time. A failing row aborts the batch but
//! leaves every earlier row, in this file and in previous files, committed.

use std::{
  fs::File,
  path::{Path, PathBuf},
};

use csv::StringRecord;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
  Error, Result, engine,
  normalize::validate_row,
  row::{FieldValue, RawRow, RowError},
  store::PurchaseStore,
};

/// Key used for values in a CSV record beyond the header's width.
const UNNAMED_FIELD: &str = "<unnamed>";

// ─── Single row ──────────────────────────────────────────────────────────────

/// Validate, normalize and insert a single row.
///
/// Returns `true` if the purchase was committed and `false` if it was a
/// duplicate skipped because `ignore_duplicate` is set.
pub fn insert_one<S: PurchaseStore>(
  store: &mut S,
  row: RawRow,
  ignore_duplicate: bool,
) -> Result<bool> {
  let row = validate_row(row)?;

  match engine::insert_row(store, &row) {
    Ok(id) => {
      debug!(id, "purchase saved");
      Ok(true)
    }
    Err(err) if ignore_duplicate && err.is_duplicate() => {
      debug!(%err, "skipping duplicate purchase");
      Ok(false)
    }
    Err(err) => Err(err),
  }
}

// ─── CSV files ───────────────────────────────────────────────────────────────

/// Import every row of every CSV file in `paths`, in order, and return how
/// many purchases were committed.
///
/// Header names are lowercased before matching. Files are opened lazily, so a
/// missing second file is only reported after the first has been imported.
pub fn insert_many<S, P>(
  store: &mut S,
  paths: impl IntoIterator<Item = P>,
  ignore_duplicate: bool,
) -> Result<usize>
where
  S: PurchaseStore,
  P: AsRef<Path>,
{
  let mut count = 0;

  for path in paths {
    let path = path.as_ref();
    info!(path = %path.display(), "importing purchases");

    let added = insert_file(store, path, ignore_duplicate)?;
    info!(path = %path.display(), added, "purchase(s) added");
    count += added;
  }

  Ok(count)
}

fn insert_file<S: PurchaseStore>(
  store: &mut S,
  path: &Path,
  ignore_duplicate: bool,
) -> Result<usize> {
  let file = File::open(path).map_err(|source| Error::ReadFile {
    path: path.to_path_buf(),
    source,
  })?;
  let csv_error = |source| Error::Csv { path: path.to_path_buf(), source };

  let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
  let headers: Vec<String> = reader
    .headers()
    .map_err(csv_error)?
    .iter()
    .map(str::to_lowercase)
    .collect();

  let mut added = 0;
  for record in reader.records() {
    let record = record.map_err(csv_error)?;
    let row = record_to_row(&headers, &record)?;
    if insert_one(store, row, ignore_duplicate)? {
      added += 1;
    }
  }

  Ok(added)
}

/// Pair a record with the header names. Short records are padded with
/// [`FieldValue::Null`]; surplus values land under an unnamed key so the
/// schema check rejects them.
fn record_to_row(headers: &[String], record: &StringRecord) -> Result<RawRow, RowError> {
  let mut fields: Vec<(String, FieldValue)> = headers
    .iter()
    .enumerate()
    .map(|(i, name)| (name.clone(), record.get(i).into()))
    .collect();

  if record.len() > headers.len() {
    let surplus: Vec<&str> = record.iter().skip(headers.len()).collect();
    fields.push((UNNAMED_FIELD.to_owned(), surplus.join(",").into()));
  }

  RawRow::from_fields(fields)
}

// ─── Sources ─────────────────────────────────────────────────────────────────

/// Expand a source path into the CSV files to import.
///
/// A file is returned as-is. A directory yields every `.csv` file beneath it,
/// recursively, in sorted order.
pub fn resolve_sources(path: &Path) -> Result<Vec<PathBuf>> {
  if path.is_file() {
    return Ok(vec![path.to_path_buf()]);
  }
  if !path.is_dir() {
    return Err(Error::PathNotFound(path.to_path_buf()));
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(path) {
    let entry = entry.map_err(|source| Error::Walk {
      path: path.to_path_buf(),
      source,
    })?;
    let is_csv = entry.path().extension().is_some_and(|ext| ext == "csv");
    if entry.file_type().is_file() && is_csv {
      files.push(entry.into_path());
    }
  }

  files.sort();
  Ok(files)
}

/// Import a file, or every CSV file in a directory.
pub fn add_from_path<S: PurchaseStore>(
  store: &mut S,
  path: &Path,
  ignore_duplicate: bool,
) -> Result<usize> {
  let files = resolve_sources(path)?;
  insert_many(store, files, ignore_duplicate)
}
