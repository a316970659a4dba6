// src/table/results.rs
use super::Cell;

/// One row per team per game, columns from the paired team tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamResultTable {
    pub year: i32,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TeamResultTable {
    pub fn new(year: i32, columns: Vec<String>) -> Self {
        TeamResultTable {
            year,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col)
    }
}
