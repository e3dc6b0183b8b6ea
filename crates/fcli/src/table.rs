//! Column-aligned table output.

use std::io::{self, Write};

/// A simple left-aligned table with a header row.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders with two spaces between columns; the last column is not
    /// padded so long titles do not produce trailing whitespace.
    pub fn print(&self) {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let mut out = io::stdout().lock();
        let _ = write_row(&mut out, &self.headers, &widths);
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            let _ = write_row(&mut out, &cells, &widths);
        }
    }
}

fn write_row(out: &mut impl Write, cells: &[&str], widths: &[usize]) -> io::Result<()> {
    let last = cells.len().saturating_sub(1);
    for (i, cell) in cells.iter().enumerate() {
        if i == last {
            writeln!(out, "{cell}")?;
        } else {
            let pad = widths[i].saturating_sub(cell.chars().count());
            write!(out, "{cell}{}  ", " ".repeat(pad))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_accumulate() {
        let mut table = Table::new(&["ID", "TITLE"]);
        assert!(table.is_empty());
        table.row(vec!["1".into(), "first".into()]);
        table.row(vec!["23".into(), "second".into()]);
        assert!(!table.is_empty());
        assert_eq!(table.rows.len(), 2);
    }
}
