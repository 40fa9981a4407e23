//! Text tables for command output, laid out by `prettytable`.

use prettytable::{
  Cell, Row, Table,
  format::{Alignment, consts::FORMAT_NO_LINESEP_WITH_TITLE},
};

/// A named column and the alignment of its data cells.
#[derive(Debug, Clone, Copy)]
pub struct Column {
  pub name:  &'static str,
  pub align: Alignment,
}

impl Column {
  pub const fn new(name: &'static str) -> Self { Self { name, align: Alignment::CENTER } }

  pub const fn left(name: &'static str) -> Self { Self { name, align: Alignment::LEFT } }

  pub const fn right(name: &'static str) -> Self { Self { name, align: Alignment::RIGHT } }
}

/// Build a table with an optional title spanning every column. Each row is
/// paired with `columns` in order.
pub fn build<R>(title: Option<&str>, columns: &[Column], rows: R) -> Table
where
  R: IntoIterator<Item = Vec<String>>,
{
  let mut table = Table::new();
  table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);

  let header = Row::new(
    columns
      .iter()
      .map(|c| Cell::new_align(c.name, Alignment::CENTER))
      .collect(),
  );
  match title {
    Some(title) => {
      let span = Cell::new_align(title, Alignment::CENTER).with_hspan(columns.len());
      table.set_titles(Row::new(vec![span]));
      table.add_row(header);
    }
    None => table.set_titles(header),
  }

  for row in rows {
    let cells = columns
      .iter()
      .zip(row)
      .map(|(c, value)| Cell::new_align(&value, c.align))
      .collect();
    table.add_row(Row::new(cells));
  }
  table
}

/// Render without the trailing newline.
pub fn render(table: &Table) -> String { table.to_string().trim_end().to_owned() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn aligns_cells_per_column() {
    let columns = [Column::left("store"), Column::right("total")];
    let rows = vec![
      vec!["Foo".to_owned(), "$1.00".to_owned()],
      vec!["Market".to_owned(), "$12.50".to_owned()],
    ];
    let out = render(&build(None, &columns, rows));

    assert!(out.contains("| store  | total  |"), "{out}");
    assert!(out.contains("| Foo    |  $1.00 |"), "{out}");
    assert!(out.contains("| Market | $12.50 |"), "{out}");
    assert!(!out.ends_with('\n'));
  }

  #[test]
  fn title_sits_above_header() {
    let columns = [Column::new("year"), Column::new("month")];
    let out = render(&build(Some("Breakdown"), &columns, vec![]));

    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[1].contains("Breakdown"), "{out}");
    assert!(lines.iter().skip(2).any(|l| l.contains("year") && l.contains("month")));
  }
}
