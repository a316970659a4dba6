// src/process/box_score.rs
use std::collections::HashMap;

use scraper::Html;
use tracing::{debug, instrument, trace};

use super::{
    data_rows, own_string,
    sanitize::{non_blank, normalize, snake_label, BOX_SCORE_SENTINELS},
    sections, TFOOT, TH, TR,
};
use crate::error::{Error, Result};
use crate::table::{game::PlayerRecord, Cell};

/// Opponents for each round: the second footer row, minus its first
/// (label) and last (totals) cells.
fn opponents(doc: &Html, team: &str) -> Result<Vec<Cell>> {
    let context = || format!("{} game-by-game footer", team);
    let footer = doc
        .select(&TFOOT)
        .next()
        .ok_or_else(|| Error::structure(context(), "no <tfoot>"))?;
    let row = footer
        .select(&TR)
        .nth(1)
        .ok_or_else(|| Error::structure(context(), "footer has no second row"))?;

    let cells: Vec<Cell> = row.select(&TH).map(own_string).collect();
    if cells.len() < 2 {
        return Ok(Vec::new());
    }
    Ok(cells[1..cells.len() - 1].to_vec())
}

/// Parse one `stats/teams/{team}/{year}_gbg.html` document into one record
/// per player, merging every sub-table (kicks, marks, ...) the player
/// appears in. Records come back in first-seen order.
#[instrument(level = "debug", skip(html), fields(len = html.len()))]
pub fn parse_team_gbg_document(html: &str, team: &str) -> Result<Vec<PlayerRecord>> {
    let doc = Html::parse_document(html);
    let opponents = opponents(&doc, team)?;
    trace!(rounds = opponents.len(), "opponents");

    let mut records: Vec<PlayerRecord> = Vec::new();
    let mut by_player: HashMap<String, usize> = HashMap::new();

    for section in sections(&doc) {
        let title = section
            .head
            .select(&TR)
            .next()
            .and_then(|tr| tr.select(&TH).next())
            .and_then(own_string)
            .ok_or_else(|| {
                Error::structure(
                    format!("{} game-by-game table", team),
                    "header has no title cell",
                )
            })?;
        let stat = snake_label(&title);

        for cells in data_rows(section.body) {
            let mut cells = cells.into_iter();
            let Some(player) = cells.next().and_then(non_blank) else {
                continue;
            };
            // drop the trailing totals column
            let mut values: Vec<Cell> = cells
                .map(|c| normalize(c, BOX_SCORE_SENTINELS))
                .collect();
            values.pop();

            match by_player.get(&player) {
                Some(&i) => records[i].set_stat(stat.clone(), values),
                None => {
                    let mut record =
                        PlayerRecord::new(player.clone(), team.to_string(), opponents.clone());
                    record.set_stat(stat.clone(), values);
                    by_player.insert(player, records.len());
                    records.push(record);
                }
            }
        }
    }

    debug!(team, players = records.len(), "parsed team document");
    Ok(records)
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A per-team game-by-game page: one table per statistic, the first
    /// carrying the opponents footer.
    pub fn team_page(opponents: &[&str], tables: &[(&str, &[&[&str]])]) -> String {
        let mut html = String::from("<html><body>");
        for (i, (title, rows)) in tables.iter().enumerate() {
            html.push_str(&format!(
                "<table><thead><tr><th>{}</th></tr><tr><th>Player</th></tr></thead><tbody>",
                title
            ));
            for row in rows.iter() {
                html.push_str("<tr>");
                for cell in row.iter() {
                    html.push_str(&format!("<td>{}</td>", cell));
                }
                html.push_str("</tr>");
            }
            html.push_str("</tbody>");
            if i == 0 {
                html.push_str("<tfoot><tr><th>Round</th></tr><tr><th>Opponent</th>");
                for opp in opponents {
                    html.push_str(&format!("<th>{}</th>", opp));
                }
                html.push_str("<th>Tot</th></tr></tfoot>");
            }
            html.push_str("</table>");
        }
        html.push_str("</body></html>");
        html
    }
}
