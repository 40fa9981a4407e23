//! Raw purchase rows and the boundary checks applied before normalization.
//!
//! A [`RawRow`] always has exactly the four declared fields; building one from
//! an arbitrary field map (a CSV record) is where the schema check happens.
//! [`validate`] then rejects rows whose required fields are empty.

use std::{collections::BTreeMap, fmt};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

/// Field names accepted in an input row, in canonical order.
pub const FIELD_NAMES: [&str; 4] = ["date", "store", "total", "description"];

/// Fields that must hold a non-empty value.
pub const REQUIRED_FIELDS: [&str; 3] = ["date", "store", "total"];

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A row-level input failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
  /// The row's field names differ from [`FIELD_NAMES`].
  #[error(
    "Improperly formatted fieldnames: unexpected {{{}}}, missing {{{}}}",
    .unexpected.join(", "),
    .missing.join(", ")
  )]
  Schema {
    unexpected: Vec<String>,
    missing:    Vec<String>,
  },

  /// One or more of [`REQUIRED_FIELDS`] was empty.
  #[error("{} value(s) required: ({})", .fields.join(", "), quoted(.values))]
  RequiredValue {
    fields: Vec<&'static str>,
    values: Vec<String>,
  },

  /// A value could not be converted to its canonical type.
  #[error("Incorrect value for {field}: '{value}'. ({hint}).")]
  Value {
    field: &'static str,
    value: String,
    hint:  &'static str,
  },
}

fn quoted(values: &[String]) -> String {
  values
    .iter()
    .map(|v| format!("'{v}'"))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Field values ────────────────────────────────────────────────────────────

/// A single input value. CSV records only ever produce [`FieldValue::Text`]
/// and [`FieldValue::Null`]; manual entry may pass typed values directly.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Null,
  Text(String),
  Integer(i64),
  Float(f64),
  Decimal(Decimal),
  Bool(bool),
  Date(NaiveDate),
  DateTime(NaiveDateTime),
}

impl FieldValue {
  /// Whether the value counts as "not supplied" for a required field.
  pub fn is_falsy(&self) -> bool {
    match self {
      Self::Null => true,
      Self::Text(s) => s.is_empty(),
      Self::Integer(i) => *i == 0,
      Self::Float(f) => *f == 0.0,
      Self::Decimal(d) => d.is_zero(),
      Self::Bool(b) => !b,
      Self::Date(_) | Self::DateTime(_) => false,
    }
  }
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => f.write_str("None"),
      Self::Text(s) => f.write_str(s),
      Self::Integer(i) => write!(f, "{i}"),
      Self::Float(x) => write!(f, "{x}"),
      Self::Decimal(d) => write!(f, "{d}"),
      Self::Bool(b) => write!(f, "{b}"),
      Self::Date(d) => write!(f, "{d}"),
      Self::DateTime(dt) => write!(f, "{dt}"),
    }
  }
}

impl From<&str> for FieldValue {
  fn from(value: &str) -> Self { Self::Text(value.to_owned()) }
}

impl From<String> for FieldValue {
  fn from(value: String) -> Self { Self::Text(value) }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
  fn from(value: Option<T>) -> Self { value.map_or(Self::Null, Into::into) }
}

impl From<i64> for FieldValue {
  fn from(value: i64) -> Self { Self::Integer(value) }
}

impl From<f64> for FieldValue {
  fn from(value: f64) -> Self { Self::Float(value) }
}

impl From<Decimal> for FieldValue {
  fn from(value: Decimal) -> Self { Self::Decimal(value) }
}

impl From<bool> for FieldValue {
  fn from(value: bool) -> Self { Self::Bool(value) }
}

impl From<NaiveDate> for FieldValue {
  fn from(value: NaiveDate) -> Self { Self::Date(value) }
}

impl From<NaiveDateTime> for FieldValue {
  fn from(value: NaiveDateTime) -> Self { Self::DateTime(value) }
}

// ─── RawRow ──────────────────────────────────────────────────────────────────

/// One candidate purchase before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
  pub date:        FieldValue,
  pub store:       FieldValue,
  pub total:       FieldValue,
  pub description: FieldValue,
}

impl RawRow {
  /// Build a row from named fields, requiring exactly [`FIELD_NAMES`].
  ///
  /// Names are matched as given; callers reading CSV headers lowercase them
  /// first. A repeated name keeps its last value.
  pub fn from_fields<K, I>(fields: I) -> Result<Self, RowError>
  where
    K: Into<String>,
    I: IntoIterator<Item = (K, FieldValue)>,
  {
    let mut map: BTreeMap<String, FieldValue> =
      fields.into_iter().map(|(k, v)| (k.into(), v)).collect();

    let unexpected: Vec<String> = map
      .keys()
      .filter(|k| !FIELD_NAMES.contains(&k.as_str()))
      .cloned()
      .collect();
    let missing: Vec<String> = FIELD_NAMES
      .iter()
      .filter(|name| !map.contains_key(**name))
      .map(|name| (*name).to_owned())
      .collect();

    if !unexpected.is_empty() || !missing.is_empty() {
      return Err(RowError::Schema { unexpected, missing });
    }

    let mut take = |name: &str| map.remove(name).unwrap_or(FieldValue::Null);
    Ok(Self {
      date:        take("date"),
      store:       take("store"),
      total:       take("total"),
      description: take("description"),
    })
  }

  /// Look up a field by its declared name.
  pub fn field(&self, name: &str) -> Option<&FieldValue> {
    match name {
      "date" => Some(&self.date),
      "store" => Some(&self.store),
      "total" => Some(&self.total),
      "description" => Some(&self.description),
      _ => None,
    }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Reject a row whose required fields are missing or falsy.
pub fn validate(row: &RawRow) -> Result<(), RowError> {
  let empty: Vec<(&'static str, &FieldValue)> = REQUIRED_FIELDS
    .iter()
    .filter_map(|name| row.field(name).map(|value| (*name, value)))
    .filter(|(_, value)| value.is_falsy())
    .collect();

  if empty.is_empty() {
    return Ok(());
  }

  Err(RowError::RequiredValue {
    fields: empty.iter().map(|(name, _)| *name).collect(),
    values: empty.iter().map(|(_, value)| value.to_string()).collect(),
  })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use rust_decimal::Decimal;

  use super::*;

  fn fields(extra: &[(&str, &str)]) -> Vec<(String, FieldValue)> {
    let mut out: Vec<(String, FieldValue)> = vec![
      ("date".into(), "2019-01-01".into()),
      ("store".into(), "Foo".into()),
      ("total".into(), "1.00".into()),
      ("description".into(), "bread".into()),
    ];
    out.extend(extra.iter().map(|(k, v)| ((*k).to_owned(), (*v).into())));
    out
  }

  fn row(date: FieldValue, store: FieldValue, total: FieldValue) -> RawRow {
    RawRow { date, store, total, description: FieldValue::Null }
  }

  #[test]
  fn from_fields_accepts_exact_schema() {
    let row = RawRow::from_fields(fields(&[])).unwrap();
    assert_eq!(row.store, FieldValue::Text("Foo".into()));
    assert_eq!(row.description, FieldValue::Text("bread".into()));
  }

  #[test]
  fn from_fields_reports_unexpected_keys() {
    let err = RawRow::from_fields(fields(&[("foo", "x")])).unwrap_err();
    assert_eq!(err, RowError::Schema {
      unexpected: vec!["foo".into()],
      missing:    vec![],
    });
    assert!(err.to_string().contains("foo"));
  }

  #[test]
  fn from_fields_reports_missing_keys() {
    let mut f = fields(&[]);
    f.retain(|(k, _)| k != "description");
    let err = RawRow::from_fields(f).unwrap_err();
    assert_eq!(err, RowError::Schema {
      unexpected: vec![],
      missing:    vec!["description".into()],
    });
  }

  #[test]
  fn from_fields_is_case_sensitive() {
    let mut f = fields(&[]);
    f[0].0 = "Date".into();
    let err = RawRow::from_fields(f).unwrap_err();
    assert!(matches!(err, RowError::Schema { .. }));
  }

  #[test]
  fn validate_accepts_populated_row() {
    let r = row("2019-01-01".into(), "Foo".into(), "1".into());
    assert!(validate(&r).is_ok());
  }

  #[test]
  fn validate_rejects_each_falsy_kind() {
    let falsy = [
      FieldValue::Null,
      FieldValue::Text(String::new()),
      FieldValue::Integer(0),
      FieldValue::Float(0.0),
      FieldValue::Decimal(Decimal::ZERO),
      FieldValue::Bool(false),
    ];

    for value in falsy {
      let r = row("2019-01-01".into(), "Foo".into(), value.clone());
      let err = validate(&r).unwrap_err();
      assert_eq!(
        err,
        RowError::RequiredValue {
          fields: vec!["total"],
          values: vec![value.to_string()],
        },
        "{value:?} should be rejected"
      );
    }
  }

  #[test]
  fn validate_lists_every_missing_field() {
    let r = row(FieldValue::Null, "".into(), FieldValue::Integer(0));
    let err = validate(&r).unwrap_err();
    assert_eq!(
      err.to_string(),
      "date, store, total value(s) required: ('None', '', '0')"
    );
  }

  #[test]
  fn validate_ignores_missing_description() {
    let date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    let r = row(date.into(), "Foo".into(), FieldValue::Float(1.5));
    assert!(validate(&r).is_ok());
  }

  #[test]
  fn whitespace_text_is_not_falsy() {
    assert!(!FieldValue::Text(" ".into()).is_falsy());
    assert!(!FieldValue::Text("0".into()).is_falsy());
  }
}
