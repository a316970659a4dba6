// src/export/mod.rs
//! Flat string frames for writing extracted tables to disk.

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::sync::Arc;

use crate::table::{Cell, LongGameTable, SeasonTable, TeamResultTable};

mod write;

pub use write::{write_csv, write_parquet};

pub const YEAR_COLUMN: &str = "year";

/// Named columns over rows of cells. Every row is as wide as `columns`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(columns: Vec<String>) -> Self {
        Frame {
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

    /// Stack frames whose columns may differ. The result has the union of
    /// all columns in first-seen order; cells a frame lacks are missing.
    pub fn concat<I>(frames: I) -> Frame
    where
        I: IntoIterator<Item = Frame>,
    {
        let frames: Vec<Frame> = frames.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for frame in &frames {
            for c in &frame.columns {
                if !index.contains_key(c) {
                    index.insert(c.clone(), columns.len());
                    columns.push(c.clone());
                }
            }
        }

        let mut out = Frame::new(columns);
        out.rows.reserve(frames.iter().map(Frame::len).sum());
        for frame in frames {
            let slots: Vec<usize> = frame.columns.iter().map(|c| index[c]).collect();
            for row in frame.rows {
                let mut wide = vec![None; out.columns.len()];
                for (slot, cell) in slots.iter().zip(row) {
                    wide[*slot] = cell;
                }
                out.rows.push(wide);
            }
        }
        out
    }

    /// One nullable Utf8 column per frame column; missing cells are nulls.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(
            self.columns
                .iter()
                .map(|c| Field::new(c, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));
        if self.columns.is_empty() {
            return Ok(RecordBatch::new_empty(schema));
        }

        let arrays: Vec<ArrayRef> = (0..self.columns.len())
            .map(|i| {
                let values: StringArray = self.rows.iter().map(|r| r[i].as_deref()).collect();
                Arc::new(values) as ArrayRef
            })
            .collect();
        RecordBatch::try_new(schema, arrays).context("building record batch")
    }
}

/// Conversion of an extracted table into a frame tagged with its year.
pub trait ToFrame {
    fn to_frame(&self) -> Frame;
}

fn year_cell(year: i32) -> Cell {
    Some(year.to_string())
}

impl ToFrame for SeasonTable {
    fn to_frame(&self) -> Frame {
        let mut columns = vec!["player".to_string()];
        columns.extend(self.columns().iter().cloned());
        columns.push(YEAR_COLUMN.to_string());

        let mut frame = Frame::new(columns);
        for row in self.rows() {
            let mut cells = Vec::with_capacity(row.values.len() + 2);
            cells.push(Some(row.player.clone()));
            cells.extend(row.values.iter().cloned());
            cells.push(year_cell(self.year));
            frame.push_row(cells);
        }
        frame
    }
}

impl ToFrame for LongGameTable {
    fn to_frame(&self) -> Frame {
        let columns = ["player", "team", "round", "opponents", "stat", "value", YEAR_COLUMN]
            .map(String::from)
            .to_vec();
        let mut frame = Frame::new(columns);
        for row in self.rows() {
            frame.push_row(vec![
                Some(row.key.player.clone()),
                Some(row.key.team.clone()),
                Some(row.key.round.to_string()),
                row.key.opponent.clone(),
                Some(row.stat.clone()),
                row.value.clone(),
                year_cell(self.year),
            ]);
        }
        frame
    }
}

impl ToFrame for TeamResultTable {
    fn to_frame(&self) -> Frame {
        let mut columns = self.columns().to_vec();
        columns.push(YEAR_COLUMN.to_string());

        let mut frame = Frame::new(columns);
        for row in self.rows() {
            let mut cells = row.clone();
            cells.push(year_cell(self.year));
            frame.push_row(cells);
        }
        frame
    }
}
