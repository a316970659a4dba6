// src/process/season.rs
use scraper::Html;
use tracing::{debug, instrument, warn};

use super::{
    data_cells,
    headers::infer_headers,
    sanitize::{non_blank, normalize, SEASON_SENTINELS},
    TR,
};
use crate::error::Result;
use crate::table::SeasonTable;

/// Build the season table from a `stats/{year}.html` document.
///
/// Every `<tr>` with `<td>` cells is a candidate row. Rows whose width does
/// not match the header legend, and rows without a player name, are skipped.
#[instrument(level = "debug", skip(html), fields(len = html.len()))]
pub fn parse_season_document(html: &str, year: i32, player_index: usize) -> Result<SeasonTable> {
    let doc = Html::parse_document(html);
    let spec = infer_headers(&doc, player_index)?;
    let pidx = spec.player_index();

    let mut table = SeasonTable::new(year, spec.value_columns());
    let mut misaligned = 0usize;

    for row in doc.select(&TR) {
        let mut cells = data_cells(row);
        if cells.is_empty() {
            continue;
        }
        if cells.len() != spec.len() {
            misaligned += 1;
            debug!(
                expected = spec.len(),
                found = cells.len(),
                "row width does not match header"
            );
            continue;
        }

        let Some(player) = non_blank(cells.remove(pidx)) else {
            continue;
        };
        let values = cells
            .into_iter()
            .map(|c| normalize(c, SEASON_SENTINELS))
            .collect();
        table.upsert(player, values);
    }

    if misaligned > 0 {
        warn!(year, misaligned, "skipped rows that do not match the header");
    }
    debug!(year, players = table.len(), "parsed season table");
    Ok(table)
}
