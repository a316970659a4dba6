// src/table/season.rs
use std::collections::HashMap;

use super::Cell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRow {
    pub player: String,
    /// Aligned with [`SeasonTable::columns`].
    pub values: Vec<Cell>,
}

/// One season of per-player totals, keyed by player name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonTable {
    pub year: i32,
    columns: Vec<String>,
    rows: Vec<SeasonRow>,
    index: HashMap<String, usize>,
}

impl SeasonTable {
    pub fn new(year: i32, columns: Vec<String>) -> Self {
        SeasonTable {
            year,
            columns,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a player's row. A name seen before is replaced where it stood.
    pub fn upsert(&mut self, player: String, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.columns.len());
        match self.index.get(&player) {
            Some(&i) => self.rows[i].values = values,
            None => {
                self.index.insert(player.clone(), self.rows.len());
                self.rows.push(SeasonRow { player, values });
            }
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SeasonRow] {
        &self.rows
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.player.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, player: &str, column: &str) -> Option<&Cell> {
        let row = &self.rows[*self.index.get(player)?];
        let col = self.columns.iter().position(|c| c == column)?;
        row.values.get(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_in_place() {
        let mut t = SeasonTable::new(2021, vec!["kicks".into(), "marks".into()]);
        t.upsert("A".into(), vec![Some("1".into()), Some("2".into())]);
        t.upsert("B".into(), vec![Some("3".into()), None]);
        t.upsert("A".into(), vec![Some("9".into()), Some("8".into())]);

        assert_eq!(t.players().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(t.get("A", "kicks"), Some(&Some("9".into())));
        assert_eq!(t.get("B", "marks"), Some(&None));
        assert_eq!(t.get("C", "marks"), None);
        assert_eq!(t.get("A", "goals"), None);
    }
}
