// src/table/mod.rs
//! In-memory tables produced by the extractors.
//!
//! Every value is a [`Cell`]; `None` is the one representation of a value the
//! site marked as absent. It only becomes the literal `"NA"` when rendered.

pub mod game;
pub mod results;
pub mod season;

pub use game::{GameKey, LongGameRow, LongGameTable, WideGameRow, WideGameTable, WideGameTableBuilder};
pub use results::TeamResultTable;
pub use season::{SeasonRow, SeasonTable};

/// A single normalized value.
pub type Cell = Option<String>;

/// How a missing cell is written out.
pub const NA: &str = "NA";

/// Render a cell the way exports write it.
pub fn render(cell: &Cell) -> &str {
    cell.as_deref().unwrap_or(NA)
}
