// src/client.rs
//! Year-level extraction API: fetch the documents for a year and hand them to
//! the matching extractor.

use futures::{stream, StreamExt};
use std::ops::RangeInclusive;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, FetchError, Result};
use crate::fetch::{urls, Fetcher, Page};
use crate::process::{
    box_score::parse_team_gbg_document, results::parse_results_document,
    season::parse_season_document,
};
use crate::table::{LongGameTable, SeasonTable, TeamResultTable, WideGameTable, WideGameTableBuilder};

/// Seasons with a per-player totals page.
pub const PLAYER_STATS_YEARS: RangeInclusive<i32> = 1897..=2022;
/// Seasons with per-game breakdowns.
pub const GAME_BY_GAME_YEARS: RangeInclusive<i32> = 1965..=2022;

fn check_year(year: i32, range: &RangeInclusive<i32>) -> Result<()> {
    if range.contains(&year) {
        Ok(())
    } else {
        Err(Error::YearOutOfRange {
            year,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

pub struct AflTables<F> {
    fetcher: F,
    config: Config,
    base: Url,
}

impl<F: Fetcher> AflTables<F> {
    pub fn new(fetcher: F, config: Config) -> Result<Self> {
        let base = urls::parse_base(&config.base_url)?;
        Ok(AflTables {
            fetcher,
            config,
            base,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch a document the extraction cannot do without.
    async fn fetch_required(&self, url: &Url) -> Result<String> {
        let page = self.fetcher.fetch(url.as_str()).await?;
        if !page.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: page.status,
            }
            .into());
        }
        Ok(page.text())
    }

    /// Season totals, one row per player.
    #[instrument(level = "info", skip(self))]
    pub async fn get_player_stats(&self, year: i32) -> Result<SeasonTable> {
        check_year(year, &PLAYER_STATS_YEARS)?;
        let url = urls::season_url(&self.base, year)?;
        let html = self.fetch_required(&url).await?;

        let table = parse_season_document(&html, year, self.config.player_index)?;
        info!(year, rows = table.len(), "player stats");
        Ok(table)
    }

    /// Box scores for every configured team, one row per player, round and
    /// statistic. Teams whose page cannot be fetched are skipped.
    #[instrument(level = "info", skip(self))]
    pub async fn get_game_by_game_stats(&self, year: i32) -> Result<LongGameTable> {
        let wide = self.get_game_by_game_wide(year).await?;
        Ok(wide.melt())
    }

    /// The box scores before reshaping: one column per statistic.
    pub async fn get_game_by_game_wide(&self, year: i32) -> Result<WideGameTable> {
        check_year(year, &GAME_BY_GAME_YEARS)?;
        let targets = self
            .config
            .teams
            .iter()
            .map(|team| Ok((team.as_str(), urls::team_gbg_url(&self.base, team, year)?)))
            .collect::<Result<Vec<_>>>()?;

        // in-flight fetches are bounded; results come back in roster order
        let pages: Vec<(&str, Result<Page, FetchError>)> = stream::iter(targets)
            .map(|(team, url)| async move { (team, self.fetcher.fetch(url.as_str()).await) })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut builder = WideGameTableBuilder::new(year, self.config.ragged_policy);
        let mut fetched = 0usize;
        for (team, page) in pages {
            let page = match page {
                Ok(page) if page.is_success() => page,
                Ok(page) => {
                    warn!(year, team, status = page.status, "skipping team: non-success status");
                    continue;
                }
                Err(e) => {
                    warn!(year, team, error = %e, "skipping team: fetch failed");
                    continue;
                }
            };
            fetched += 1;

            let records = parse_team_gbg_document(&page.text(), team)?;
            debug!(year, team, players = records.len(), "team document");
            for record in records {
                builder.push(record)?;
            }
        }

        if builder.dropped() > 0 {
            warn!(year, dropped = builder.dropped(), "players left out with ragged sub-tables");
        }
        let wide = builder.finish();
        info!(
            year,
            teams = fetched,
            rows = wide.rows().len(),
            stats = wide.stats().len(),
            "game-by-game stats"
        );
        Ok(wide)
    }

    /// Per-game team statistics, one row per team per game.
    #[instrument(level = "info", skip(self))]
    pub async fn get_game_by_game_results(&self, year: i32) -> Result<TeamResultTable> {
        check_year(year, &GAME_BY_GAME_YEARS)?;
        let url = urls::results_url(&self.base, year)?;
        let html = self.fetch_required(&url).await?;

        let table = parse_results_document(&html, year)?;
        info!(year, rows = table.len(), "game-by-game results");
        Ok(table)
    }
}
