// src/fetch/urls.rs
use url::Url;

use crate::error::{Error, Result};

/// Parse the configured site root. A missing trailing slash is added so that
/// relative joins land under it rather than replacing its last segment.
pub fn parse_base(base: &str) -> Result<Url> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Url::parse(&normalized).map_err(|source| Error::BaseUrl {
        url: base.to_string(),
        source,
    })
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|source| Error::BaseUrl {
        url: base.to_string(),
        source,
    })
}

/// One row per player for the whole season: `stats/{year}.html`.
pub fn season_url(base: &Url, year: i32) -> Result<Url> {
    join(base, &format!("stats/{}.html", year))
}

/// Per-team game-by-game box scores: `stats/teams/{team}/{year}_gbg.html`.
pub fn team_gbg_url(base: &Url, team: &str, year: i32) -> Result<Url> {
    join(base, &format!("stats/teams/{}/{}_gbg.html", team, year))
}

/// Team statistics per game for every club: `stats/{year}t.html`.
pub fn results_url(base: &Url, year: i32) -> Result<Url> {
    join(base, &format!("stats/{}t.html", year))
}
