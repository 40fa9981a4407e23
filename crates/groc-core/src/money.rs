//! Monetary amounts stored as whole cents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An amount of money in integer cents.
///
/// `Display` renders the plain dollar value (`12.01`); use
/// [`Cents::dollars`] for the report form (`$1,234.56`).
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
  pub fn as_i64(self) -> i64 { self.0 }

  /// Format as a dollar amount with thousands separators, e.g. `$1,234.56`.
  pub fn dollars(self) -> String {
    let abs = self.0.unsigned_abs();
    let whole = (abs / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
      if i > 0 && (whole.len() - i) % 3 == 0 {
        grouped.push(',');
      }
      grouped.push(ch);
    }

    let sign = if self.0 < 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", abs % 100)
  }
}

impl fmt::Display for Cents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let abs = self.0.unsigned_abs();
    let sign = if self.0 < 0 { "-" } else { "" };
    write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
  }
}

impl From<i64> for Cents {
  fn from(value: i64) -> Self { Self(value) }
}
