// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Team identifiers as they appear in the per-team stats URLs.
/// `bullldogs` is spelled the way the site spells it.
pub const DEFAULT_TEAMS: &[&str] = &[
    "adelaide",
    "brisbaneb",
    "brisbanel",
    "carlton",
    "collingwood",
    "essendon",
    "fitzroy",
    "fremantle",
    "geelong",
    "goldcoast",
    "gws",
    "hawthorn",
    "melbourne",
    "kangaroos",
    "padelaide",
    "richmond",
    "stkilda",
    "swans",
    "westcoast",
    "bullldogs",
];

pub const DEFAULT_BASE_URL: &str = "https://afltables.com/afl/";

/// What to do with a player whose sub-tables have different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaggedPolicy {
    /// Log a warning and leave the player out.
    #[default]
    Drop,
    /// Abort the whole year with a structure error.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Roster fetched by the game-by-game box-score extractor.
    pub teams: Vec<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Upper bound on in-flight per-team fetches.
    pub concurrency: usize,
    /// Position of the `player` field in season-table headers.
    pub player_index: usize,
    pub ragged_policy: RaggedPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            teams: DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect(),
            user_agent: concat!("afltables/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            concurrency: 4,
            player_index: 1,
            ragged_policy: RaggedPolicy::Drop,
        }
    }
}

impl Config {
    /// Parse YAML; any key left out keeps its default.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing config yaml")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("loading config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_carry_the_full_roster() {
        let cfg = Config::default();
        assert_eq!(cfg.teams.len(), 20);
        assert_eq!(cfg.player_index, 1);
        assert_eq!(cfg.ragged_policy, RaggedPolicy::Drop);
        assert!(cfg.teams.iter().any(|t| t == "bullldogs"));
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> Result<()> {
        let cfg = Config::from_yaml_str(
            "teams: [adelaide, geelong]\nragged_policy: fail\nconcurrency: 2\n",
        )?;
        assert_eq!(cfg.teams, vec!["adelaide", "geelong"]);
        assert_eq!(cfg.ragged_policy, RaggedPolicy::Fail);
        assert_eq!(cfg.concurrency, 2);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs, 30);
        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "base_url: http://localhost:8080/afl/")?;
        writeln!(tmp, "player_index: 0")?;
        let cfg = Config::load(tmp.path())?;
        assert_eq!(cfg.base_url, "http://localhost:8080/afl/");
        assert_eq!(cfg.player_index, 0);
        Ok(())
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Config::from_yaml_str("ragged_policy: ignore").is_err());
    }
}
