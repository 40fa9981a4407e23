//! Row normalization: string cleaning and conversion of totals and dates to
//! their canonical types.

use std::str::FromStr as _;

use chrono::NaiveDate;
use deunicode::deunicode_with_tofu;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive as _};

use crate::{
  Result,
  money::Cents,
  purchase::PurchaseRow,
  row::{FieldValue, RawRow, RowError, validate},
};

const TOTAL_HINT: &str =
  "Format must be whole or decimal number like 10, 100.00, 1000.01";
const NEGATIVE_TOTAL_HINT: &str = "Total must not be negative";
const LARGE_TOTAL_HINT: &str = "Total must not exceed 1000000000.00";

/// Largest accepted total, in cents. Keeps monthly sums well inside `i64`.
pub const MAX_TOTAL: Cents = Cents(100_000_000_000);
const DATE_HINT: &str = "Format must be YYYY-MM-DD";

// ─── Strings ─────────────────────────────────────────────────────────────────

/// Transliterate to ASCII and trim. Characters with no ASCII form are
/// dropped. Returns `None` if nothing is left.
pub fn clean_text(value: &str) -> Option<String> {
  let ascii = deunicode_with_tofu(value, "");
  let trimmed = ascii.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Clean a text value; any other value passes through unchanged.
pub fn clean_value(value: FieldValue) -> FieldValue {
  match value {
    FieldValue::Text(s) => clean_text(&s).map_or(FieldValue::Null, FieldValue::Text),
    other => other,
  }
}

fn into_text(value: FieldValue) -> Option<String> {
  match value {
    FieldValue::Null => None,
    FieldValue::Text(s) => Some(s),
    other => Some(other.to_string()),
  }
}

// ─── Totals ──────────────────────────────────────────────────────────────────

fn parse_decimal(text: &str) -> Option<Decimal> {
  Decimal::from_str(text)
    .or_else(|_| Decimal::from_scientific(text))
    .ok()
}

/// Convert a dollar amount to whole cents.
///
/// Rounds to the nearest cent in decimal arithmetic with halves rounded away
/// from zero, so `"12.005"` is 1201 cents.
pub fn format_total(value: &FieldValue) -> Result<Cents, RowError> {
  let invalid = |hint| RowError::Value {
    field: "total",
    value: value.to_string(),
    hint,
  };

  let amount = match value {
    FieldValue::Text(s) => parse_decimal(s.trim()),
    FieldValue::Integer(i) => Some(Decimal::from(*i)),
    FieldValue::Float(f) if f.is_finite() => parse_decimal(&f.to_string()),
    FieldValue::Decimal(d) => Some(*d),
    _ => None,
  }
  .ok_or_else(|| invalid(TOTAL_HINT))?;

  if amount.is_sign_negative() && !amount.is_zero() {
    return Err(invalid(NEGATIVE_TOTAL_HINT));
  }

  let cents = amount
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    .checked_mul(Decimal::ONE_HUNDRED)
    .and_then(|cents| cents.to_i64())
    .map(Cents)
    .ok_or_else(|| invalid(LARGE_TOTAL_HINT))?;

  if cents > MAX_TOTAL {
    return Err(invalid(LARGE_TOTAL_HINT));
  }
  Ok(cents)
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Convert a `YYYY-MM-DD` string, date, or datetime to a calendar date. Any
/// time of day is dropped.
pub fn format_date(value: &FieldValue) -> Result<NaiveDate, RowError> {
  let parsed = match value {
    FieldValue::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
    FieldValue::Date(d) => Some(*d),
    FieldValue::DateTime(dt) => Some(dt.date()),
    _ => None,
  };

  parsed.ok_or_else(|| RowError::Value {
    field: "date",
    value: value.to_string(),
    hint:  DATE_HINT,
  })
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Clean and convert a row that has already passed [`validate`].
pub fn normalize(row: RawRow) -> Result<PurchaseRow, RowError> {
  let total = format_total(&clean_value(row.total))?;
  let date = format_date(&clean_value(row.date))?;

  Ok(PurchaseRow {
    date,
    total,
    store: into_text(clean_value(row.store)),
    description: into_text(clean_value(row.description)),
  })
}

/// Validate and normalize a row. Every failure surfaces as
/// [`crate::Error::InvalidRow`].
pub fn validate_row(row: RawRow) -> Result<PurchaseRow> {
  validate(&row)?;
  Ok(normalize(row)?)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use rust_decimal::Decimal;

  use super::*;
  use crate::Error;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn cents(value: impl Into<FieldValue>) -> i64 {
    format_total(&value.into()).unwrap().as_i64()
  }

  #[test]
  fn total_rounds_to_nearest_cent() {
    assert_eq!(cents("12.009"), 1201);
    assert_eq!(cents("12.0"), 1200);
    assert_eq!(cents("12"), 1200);
    assert_eq!(cents("12.004"), 1200);
  }

  #[test]
  fn total_rounds_half_up() {
    assert_eq!(cents("0.005"), 1);
    assert_eq!(cents("12.125"), 1213);
    assert_eq!(cents("2.675"), 268);
  }

  #[test]
  fn total_accepts_numeric_values() {
    assert_eq!(cents(15_i64), 1500);
    assert_eq!(cents(12.5_f64), 1250);
    assert_eq!(cents(2.675_f64), 268);
    assert_eq!(cents(Decimal::new(1999, 2)), 1999);
    assert_eq!(cents("1e2"), 10000);
  }

  #[test]
  fn total_rejects_garbage() {
    for bad in [
      FieldValue::from("abc"),
      FieldValue::from("$12.00"),
      FieldValue::Bool(true),
      FieldValue::Float(f64::NAN),
      FieldValue::Date(ymd(2019, 1, 1)),
    ] {
      let err = format_total(&bad).unwrap_err();
      assert!(
        matches!(err, RowError::Value { field: "total", .. }),
        "{bad:?} gave {err:?}"
      );
    }
  }

  #[test]
  fn total_rejects_negative_amounts() {
    let err = format_total(&"-1.00".into()).unwrap_err();
    assert_eq!(err, RowError::Value {
      field: "total",
      value: "-1.00".into(),
      hint:  NEGATIVE_TOTAL_HINT,
    });
  }

  #[test]
  fn total_rejects_amounts_above_limit() {
    assert_eq!(cents("1000000000.00"), MAX_TOTAL.as_i64());
    for bad in ["1000000000.01", "92233720368547758.07", "1e12"] {
      let err = format_total(&bad.into()).unwrap_err();
      assert_eq!(err, RowError::Value {
        field: "total",
        value: bad.into(),
        hint:  LARGE_TOTAL_HINT,
      });
    }
  }

  #[test]
  fn total_error_message_names_value() {
    let err = format_total(&"ten".into()).unwrap_err();
    assert_eq!(
      err.to_string(),
      "Incorrect value for total: 'ten'. (Format must be whole or decimal \
       number like 10, 100.00, 1000.01)."
    );
  }

  #[test]
  fn date_drops_time_of_day() {
    let from_text = format_date(&"2019-01-01".into()).unwrap();
    let from_datetime =
      format_date(&ymd(2019, 1, 1).and_hms_opt(3, 0, 0).unwrap().into())
        .unwrap();
    assert_eq!(from_text, ymd(2019, 1, 1));
    assert_eq!(from_datetime, ymd(2019, 1, 1));
    assert_eq!(format_date(&ymd(2020, 2, 29).into()).unwrap(), ymd(2020, 2, 29));
  }

  #[test]
  fn date_rejects_other_formats_and_types() {
    for bad in [
      FieldValue::from("01/01/2019"),
      FieldValue::from("2019-02-30"),
      FieldValue::from("2019-01-01 03:00"),
      FieldValue::Integer(20190101),
      FieldValue::Null,
    ] {
      let err = format_date(&bad).unwrap_err();
      assert!(matches!(err, RowError::Value { field: "date", .. }));
    }
  }

  #[test]
  fn clean_text_transliterates_and_trims() {
    assert_eq!(clean_text("  Café Münch  ").as_deref(), Some("Cafe Munch"));
    assert_eq!(clean_text("\t\n"), None);
    assert_eq!(clean_text(""), None);
  }

  #[test]
  fn clean_text_drops_unmappable_characters() {
    assert_eq!(clean_text("Shop\u{E000}").as_deref(), Some("Shop"));
    assert_eq!(clean_text(" \u{E000}\u{E001} "), None);
  }

  #[test]
  fn clean_value_passes_non_text_through() {
    assert_eq!(clean_value(FieldValue::Integer(3)), FieldValue::Integer(3));
    assert_eq!(clean_value(" ".into()), FieldValue::Null);
  }

  #[test]
  fn validate_row_normalizes_every_field() {
    let row = RawRow {
      date:        " 2019-01-01 ".into(),
      store:       "  Épicerie ".into(),
      total:       "4.50".into(),
      description: "   ".into(),
    };

    let out = validate_row(row).unwrap();
    assert_eq!(out, PurchaseRow {
      date:        ymd(2019, 1, 1),
      total:       Cents(450),
      store:       Some("Epicerie".into()),
      description: None,
    });
  }

  #[test]
  fn validate_row_wraps_every_failure_as_invalid_row() {
    let required = RawRow {
      date:        FieldValue::Null,
      store:       "Foo".into(),
      total:       "1".into(),
      description: FieldValue::Null,
    };
    let conversion = RawRow { date: "yesterday".into(), ..required.clone() };

    assert!(matches!(
      validate_row(required),
      Err(Error::InvalidRow(RowError::RequiredValue { .. }))
    ));
    let err = validate_row(conversion).unwrap_err();
    assert!(matches!(err, Error::InvalidRow(RowError::Value { .. })));
    assert_eq!(
      err.to_string(),
      "Incorrect value for date: 'yesterday'. (Format must be YYYY-MM-DD)."
    );
  }

  #[test]
  fn whitespace_store_survives_validation_as_none() {
    let row = RawRow {
      date:        "2019-01-01".into(),
      store:       "  ".into(),
      total:       "1".into(),
      description: FieldValue::Null,
    };
    assert_eq!(validate_row(row).unwrap().store, None);
  }
}
