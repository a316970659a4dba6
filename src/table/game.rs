// src/table/game.rs
use std::collections::HashMap;

use tracing::warn;

use super::Cell;
use crate::config::RaggedPolicy;
use crate::error::{Error, Result};

/// Identifying columns shared by the wide and long game tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameKey {
    pub player: String,
    pub team: String,
    /// 0-based position of the game within the team's season.
    pub round: usize,
    pub opponent: Cell,
}

/// Everything one team document says about one player, one column per
/// sub-table, each column holding one cell per round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub player: String,
    pub team: String,
    pub opponents: Vec<Cell>,
    stats: Vec<(String, Vec<Cell>)>,
}

impl PlayerRecord {
    pub fn new(player: String, team: String, opponents: Vec<Cell>) -> Self {
        PlayerRecord {
            player,
            team,
            opponents,
            stats: Vec::new(),
        }
    }

    /// Set the column for `stat`. A repeated name overwrites the earlier
    /// column but keeps its position.
    pub fn set_stat(&mut self, stat: String, values: Vec<Cell>) {
        match self.stats.iter_mut().find(|(name, _)| *name == stat) {
            Some((_, existing)) => *existing = values,
            None => self.stats.push((stat, values)),
        }
    }

    pub fn stats(&self) -> &[(String, Vec<Cell>)] {
        &self.stats
    }

    /// Number of rounds if every column has one cell per opponent.
    pub fn rounds(&self) -> Option<usize> {
        let n = self.opponents.len();
        self.stats
            .iter()
            .all(|(_, values)| values.len() == n)
            .then_some(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideGameRow {
    pub key: GameKey,
    /// Aligned with [`WideGameTable::stats`].
    pub values: Vec<Cell>,
}

/// One row per player per round, one column per statistic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideGameTable {
    pub year: i32,
    stats: Vec<String>,
    rows: Vec<WideGameRow>,
}

impl WideGameTable {
    pub fn empty(year: i32) -> Self {
        WideGameTable {
            year,
            stats: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn stats(&self) -> &[String] {
        &self.stats
    }

    pub fn rows(&self) -> &[WideGameRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Collapse every statistic column into `stat`/`value` pairs. Rows come
    /// out statistic-major: all rows of the first statistic, then the next.
    pub fn melt(&self) -> LongGameTable {
        let mut rows = Vec::with_capacity(self.stats.len() * self.rows.len());
        for (i, stat) in self.stats.iter().enumerate() {
            for row in &self.rows {
                rows.push(LongGameRow {
                    key: row.key.clone(),
                    stat: stat.clone(),
                    value: row.values[i].clone(),
                });
            }
        }
        LongGameTable {
            year: self.year,
            rows,
        }
    }
}

/// Accumulates player records from any number of team documents.
#[derive(Debug)]
pub struct WideGameTableBuilder {
    year: i32,
    policy: RaggedPolicy,
    stats: Vec<String>,
    stat_index: HashMap<String, usize>,
    rows: Vec<(GameKey, Vec<(usize, Cell)>)>,
    dropped: usize,
}

impl WideGameTableBuilder {
    pub fn new(year: i32, policy: RaggedPolicy) -> Self {
        WideGameTableBuilder {
            year,
            policy,
            stats: Vec::new(),
            stat_index: HashMap::new(),
            rows: Vec::new(),
            dropped: 0,
        }
    }

    /// Add one row per round for `record`. Returns `Ok(false)` when a ragged
    /// record was dropped under [`RaggedPolicy::Drop`].
    pub fn push(&mut self, record: PlayerRecord) -> Result<bool> {
        let Some(rounds) = record.rounds() else {
            let lengths: Vec<usize> = record.stats.iter().map(|(_, v)| v.len()).collect();
            match self.policy {
                RaggedPolicy::Drop => {
                    warn!(
                        player = %record.player,
                        team = %record.team,
                        opponents = record.opponents.len(),
                        ?lengths,
                        "unable to parse values, dropping player"
                    );
                    self.dropped += 1;
                    return Ok(false);
                }
                RaggedPolicy::Fail => {
                    return Err(Error::structure(
                        format!("{} ({})", record.player, record.team),
                        format!(
                            "{} opponents but sub-table lengths {:?}",
                            record.opponents.len(),
                            lengths
                        ),
                    ));
                }
            }
        };

        let columns: Vec<usize> = record
            .stats
            .iter()
            .map(|(name, _)| self.stat_slot(name))
            .collect();

        for round in 0..rounds {
            let key = GameKey {
                player: record.player.clone(),
                team: record.team.clone(),
                round,
                opponent: record.opponents[round].clone(),
            };
            let values = columns
                .iter()
                .zip(&record.stats)
                .map(|(&slot, (_, cells))| (slot, cells[round].clone()))
                .collect();
            self.rows.push((key, values));
        }
        Ok(true)
    }

    fn stat_slot(&mut self, name: &str) -> usize {
        if let Some(&i) = self.stat_index.get(name) {
            return i;
        }
        let i = self.stats.len();
        self.stats.push(name.to_string());
        self.stat_index.insert(name.to_string(), i);
        i
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Pad every row out to the full statistic set.
    pub fn finish(self) -> WideGameTable {
        let width = self.stats.len();
        let rows = self
            .rows
            .into_iter()
            .map(|(key, sparse)| {
                let mut values = vec![None; width];
                for (slot, cell) in sparse {
                    values[slot] = cell;
                }
                WideGameRow { key, values }
            })
            .collect();
        WideGameTable {
            year: self.year,
            stats: self.stats,
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongGameRow {
    pub key: GameKey,
    pub stat: String,
    pub value: Cell,
}

/// One row per (player, round, statistic).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongGameTable {
    pub year: i32,
    rows: Vec<LongGameRow>,
}

impl LongGameTable {
    pub fn rows(&self) -> &[LongGameRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inverse of [`WideGameTable::melt`]. Keys and statistics keep the order
    /// they are first seen in.
    pub fn pivot(&self) -> WideGameTable {
        let mut stats: Vec<String> = Vec::new();
        let mut stat_index: HashMap<&str, usize> = HashMap::new();
        let mut keys: Vec<&GameKey> = Vec::new();
        let mut key_index: HashMap<&GameKey, usize> = HashMap::new();

        for row in &self.rows {
            if !stat_index.contains_key(row.stat.as_str()) {
                stat_index.insert(row.stat.as_str(), stats.len());
                stats.push(row.stat.clone());
            }
            if !key_index.contains_key(&row.key) {
                key_index.insert(&row.key, keys.len());
                keys.push(&row.key);
            }
        }

        let mut values = vec![vec![None; stats.len()]; keys.len()];
        for row in &self.rows {
            values[key_index[&row.key]][stat_index[row.stat.as_str()]] = row.value.clone();
        }

        let rows = keys
            .into_iter()
            .zip(values)
            .map(|(key, values)| WideGameRow {
                key: key.clone(),
                values,
            })
            .collect();

        WideGameTable {
            year: self.year,
            stats,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values
            .iter()
            .map(|v| if *v == "NA" { None } else { Some(v.to_string()) })
            .collect()
    }

    fn record(player: &str, team: &str, stats: Vec<(&str, Vec<&str>)>) -> PlayerRecord {
        let rounds = stats.first().map_or(0, |(_, v)| v.len());
        let opponents = (0..rounds).map(|i| Some(format!("Opp{}", i))).collect();
        let mut rec = PlayerRecord::new(player.into(), team.into(), opponents);
        for (name, values) in stats {
            rec.set_stat(name.to_string(), cells(&values));
        }
        rec
    }

    fn sample() -> WideGameTable {
        let mut b = WideGameTableBuilder::new(2021, RaggedPolicy::Drop);
        b.push(record(
            "Smith",
            "geelong",
            vec![("kicks", vec!["10", "12"]), ("marks", vec!["3", "NA"])],
        ))
        .unwrap();
        b.push(record(
            "Jones",
            "carlton",
            vec![("kicks", vec!["7", "8"]), ("goals", vec!["1", "0"])],
        ))
        .unwrap();
        b.finish()
    }

    #[test]
    fn set_stat_overwrites_in_place() {
        let mut rec = record("A", "t", vec![("kicks", vec!["1"]), ("marks", vec!["2"])]);
        rec.set_stat("kicks".into(), cells(&["5"]));
        let names: Vec<&str> = rec.stats().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["kicks", "marks"]);
        assert_eq!(rec.stats()[0].1, cells(&["5"]));
    }

    #[test]
    fn builder_pads_missing_statistics() {
        let wide = sample();
        assert_eq!(wide.stats(), &["kicks", "marks", "goals"]);
        assert_eq!(wide.rows().len(), 4);

        let jones = &wide.rows()[2];
        assert_eq!(jones.key.player, "Jones");
        assert_eq!(jones.key.round, 0);
        assert_eq!(jones.key.opponent.as_deref(), Some("Opp0"));
        assert_eq!(jones.values, vec![Some("7".into()), None, Some("1".into())]);
    }

    #[test]
    fn ragged_record_dropped_or_fatal() {
        let ragged = record("Odd", "t", vec![("kicks", vec!["1", "2"]), ("marks", vec!["3"])]);

        let mut drop = WideGameTableBuilder::new(2021, RaggedPolicy::Drop);
        assert!(!drop.push(ragged.clone()).unwrap());
        assert_eq!(drop.dropped(), 1);
        let wide = drop.finish();
        assert!(wide.is_empty());
        assert!(wide.stats().is_empty());

        let mut fail = WideGameTableBuilder::new(2021, RaggedPolicy::Fail);
        let err = fail.push(ragged).unwrap_err();
        assert!(err.is_structure());
    }

    #[test]
    fn melt_is_statistic_major() {
        let long = sample().melt();
        assert_eq!(long.len(), 3 * 4);
        let order: Vec<(&str, &str, usize)> = long
            .rows()
            .iter()
            .take(5)
            .map(|r| (r.stat.as_str(), r.key.player.as_str(), r.key.round))
            .collect();
        assert_eq!(
            order,
            vec![
                ("kicks", "Smith", 0),
                ("kicks", "Smith", 1),
                ("kicks", "Jones", 0),
                ("kicks", "Jones", 1),
                ("marks", "Smith", 0),
            ]
        );
    }

    #[test]
    fn melt_covers_every_cell_once() {
        let wide = sample();
        let long = wide.melt();

        let mut seen = HashSet::new();
        for row in long.rows() {
            assert!(seen.insert((row.key.player.clone(), row.key.round, row.stat.clone())));
            let w = wide
                .rows()
                .iter()
                .find(|w| w.key == row.key)
                .expect("key present in wide table");
            let col = wide.stats().iter().position(|s| *s == row.stat).unwrap();
            assert_eq!(w.values[col], row.value);
        }
        assert_eq!(seen.len(), wide.rows().len() * wide.stats().len());
    }

    #[test]
    fn pivot_inverts_melt() {
        let wide = sample();
        assert_eq!(wide.melt().pivot(), wide);
    }

    #[test]
    fn empty_round_trip() {
        let wide = WideGameTableBuilder::new(1990, RaggedPolicy::Drop).finish();
        let long = wide.melt();
        assert!(long.is_empty());
        assert_eq!(long.year, 1990);
        assert_eq!(long.pivot(), WideGameTable::empty(1990));
    }
}
