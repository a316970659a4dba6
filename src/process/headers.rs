// src/process/headers.rs
use scraper::Html;
use tracing::trace;

use super::{sanitize::snake_label, SPAN};
use crate::error::{Error, Result};

pub const PLAYER_FIELD: &str = "player";

/// Normalized field names for a season table, `player` included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpec {
    fields: Vec<String>,
    player_index: usize,
}

impl HeaderSpec {
    /// Normalize `labels` and insert `player` at `player_index`, clamped to
    /// the end of the list.
    pub fn from_labels<I, S>(labels: I, player_index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: Vec<String> = labels
            .into_iter()
            .map(|l| normalize_label(l.as_ref()))
            .collect();
        let player_index = player_index.min(fields.len());
        fields.insert(player_index, PLAYER_FIELD.to_string());
        HeaderSpec {
            fields,
            player_index,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn player_index(&self) -> usize {
        self.player_index
    }

    /// Number of cells a data row must have.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every field except `player`, in order.
    pub fn value_columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.player_index)
            .map(|(_, f)| f.clone())
            .collect()
    }
}

/// `"KI=Kicks"` → `"kicks"`, `"Goal Assists"` → `"goal_assists"`.
pub fn normalize_label(fragment: &str) -> String {
    let tail = fragment.rsplit('=').next().unwrap_or(fragment);
    snake_label(tail)
}

/// The header legend is the second `<span>` of the page; each text fragment
/// in it is a `CODE=Long Name` label.
pub fn infer_headers(doc: &Html, player_index: usize) -> Result<HeaderSpec> {
    let legend = doc
        .select(&SPAN)
        .nth(1)
        .ok_or_else(|| Error::structure("header legend", "fewer than two <span> elements"))?;

    let labels: Vec<&str> = legend
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if labels.is_empty() {
        return Err(Error::structure("header legend", "legend <span> has no labels"));
    }
    trace!(?labels, "header labels");

    Ok(HeaderSpec::from_labels(labels, player_index))
}
