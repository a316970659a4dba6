// src/process/results.rs
use scraper::{node::Node, ElementRef, Html};
use tracing::{debug, instrument};

use super::{data_rows, own_string, sanitize::normalize, sanitize::RESULTS_SENTINELS, sections, TH, TR};
use crate::error::{Error, Result};
use crate::table::{Cell, TeamResultTable};

/// Cells taken from the first table of each team pair, `team` included.
pub const LEADING_WIDTH: usize = 15;
/// Cells taken from the second table of each team pair.
pub const TRAILING_WIDTH: usize = 10;
/// Leading cells of the second table that repeat the round and opponent.
pub const TRAILING_SKIP: usize = 2;

const TEAM_PREFIX: &str = "Team Statistics [";

/// Statistic codes used in the page header and the names we export them as.
pub const STAT_NAMES: &[(&str, &str)] = &[
    ("#", "round"),
    ("KI", "kicks"),
    ("MK", "marks"),
    ("HB", "handballs"),
    ("DI", "disposals"),
    ("GL", "goals"),
    ("BH", "behinds"),
    ("HO", "hit_outs"),
    ("TK", "tackles"),
    ("RB", "rebound_50s"),
    ("IF", "inside_50s"),
    ("CL", "clearances"),
    ("CG", "clangers"),
    ("FF", "freekicks_for"),
    ("FA", "freekicks_against"),
    ("BR", "brownlow_votes"),
    ("CP", "contested_possessions"),
    ("UP", "uncontested_possessions"),
    ("CM", "contested_marks"),
    ("MI", "marks_inside_50"),
    ("1%", "one_percenters"),
    ("BO", "bounces"),
    ("GA", "goal_assist"),
];

/// Long name for a statistic code; unknown labels pass through.
pub fn canonical_name(code: &str) -> &str {
    STAT_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, name)| *name)
}

/// `"Adelaide Team Statistics [<a>Game by Game</a>]"` → `"Adelaide"`: the
/// text just before the first link of the title cell.
fn team_name(head: ElementRef<'_>) -> Option<String> {
    let title = head.select(&TR).next()?.select(&TH).next()?;
    let anchor = title.children().find(|n| {
        n.value()
            .as_element()
            .map_or(false, |e| e.name() == "a")
    })?;
    let prev = anchor.prev_sibling()?;
    let text = match prev.value() {
        Node::Text(text) => String::from(&**text),
        Node::Element(_) => own_string(ElementRef::wrap(prev)?)?,
        _ => return None,
    };
    Some(text.replace(TEAM_PREFIX, "").trim().to_string())
}

/// Column labels from the first two headers, deduplicated in order.
fn column_labels(heads: &[ElementRef<'_>]) -> Vec<String> {
    let mut labels: Vec<String> = vec!["team".to_string()];
    for head in heads.iter().take(2) {
        for th in head.select(&TR).flat_map(|tr| tr.select(&TH)) {
            if let Some(label) = own_string(th) {
                let label = label.trim().to_string();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
    }
    labels
}

fn cells_to_row(cells: impl IntoIterator<Item = Option<String>>) -> impl Iterator<Item = Cell> {
    cells
        .into_iter()
        .map(|c| normalize(c, RESULTS_SENTINELS))
}

/// Parse `stats/{year}t.html`: per team, two tables describe the same games,
/// the first giving the leading columns and the second the trailing ones.
/// Rows are matched by position within the pair.
#[instrument(level = "debug", skip(html), fields(len = html.len()))]
pub fn parse_results_document(html: &str, year: i32) -> Result<TeamResultTable> {
    let doc = Html::parse_document(html);
    let context = format!("{} team results", year);
    let sections = sections(&doc);

    let heads: Vec<ElementRef<'_>> = sections.iter().map(|s| s.head).collect();
    let labels = column_labels(&heads);
    if !sections.is_empty() && labels.len() != LEADING_WIDTH + TRAILING_WIDTH {
        return Err(Error::structure(
            context,
            format!(
                "expected {} column labels, found {}: {:?}",
                LEADING_WIDTH + TRAILING_WIDTH,
                labels.len(),
                labels
            ),
        ));
    }
    let columns = labels
        .iter()
        .map(|l| canonical_name(l).to_string())
        .collect();
    let mut table = TeamResultTable::new(year, columns);

    for (pair_no, pair) in sections.chunks(2).enumerate() {
        let [lead, trail] = pair else {
            return Err(Error::structure(
                context,
                format!("table {} has no trailing partner", pair_no * 2),
            ));
        };
        let team = team_name(lead.head).ok_or_else(|| {
            Error::structure(context.clone(), format!("table {} has no team title", pair_no * 2))
        })?;

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (r, cells) in data_rows(lead.body).enumerate() {
            if cells.len() < LEADING_WIDTH - 1 {
                return Err(Error::structure(
                    context,
                    format!("{} row {}: {} leading cells, need {}", team, r, cells.len(), LEADING_WIDTH - 1),
                ));
            }
            let mut row = Vec::with_capacity(LEADING_WIDTH + TRAILING_WIDTH);
            row.push(Some(team.clone()));
            row.extend(cells_to_row(cells).take(LEADING_WIDTH - 1));
            rows.push(row);
        }

        let trailing: Vec<Vec<Option<String>>> = data_rows(trail.body).collect();
        if trailing.len() != rows.len() {
            return Err(Error::structure(
                context,
                format!(
                    "{}: {} leading rows but {} trailing rows",
                    team,
                    rows.len(),
                    trailing.len()
                ),
            ));
        }
        for (r, (row, cells)) in rows.iter_mut().zip(trailing).enumerate() {
            if cells.len() < TRAILING_SKIP + TRAILING_WIDTH {
                return Err(Error::structure(
                    context,
                    format!(
                        "{} row {}: {} trailing cells, need {}",
                        team,
                        r,
                        cells.len(),
                        TRAILING_SKIP + TRAILING_WIDTH
                    ),
                ));
            }
            row.extend(cells_to_row(cells).skip(TRAILING_SKIP).take(TRAILING_WIDTH));
        }

        debug!(team = %team, games = rows.len(), "assembled team rows");
        for row in rows {
            table.push_row(row);
        }
    }

    Ok(table)
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const LEAD: [&str; 14] = [
        "#", "Opp", "KI", "MK", "HB", "DI", "GL", "BH", "HO", "TK", "RB", "IF", "CL", "CG",
    ];
    pub const TRAIL: [&str; 12] = [
        "#", "Opp", "FF", "FA", "BR", "CP", "UP", "CM", "MI", "1%", "BO", "GA",
    ];

    pub fn table(team: &str, labels: &[&str], rows: &[Vec<String>]) -> String {
        let ths: String = labels.iter().map(|l| format!("<th>{}</th>", l)).collect();
        let trs: String = rows
            .iter()
            .map(|r| {
                let tds: String = r.iter().map(|c| format!("<td>{}</td>", c)).collect();
                format!("<tr>{}</tr>", tds)
            })
            .collect();
        format!(
            "<table><thead><tr><th colspan=\"{}\">{} Team Statistics [<a href=\"#\">Game by Game</a>]</th></tr>\
             <tr>{}</tr></thead><tbody>{}</tbody></table>",
            labels.len(),
            team,
            ths,
            trs
        )
    }

    pub fn lead_row(round: usize, opp: &str, seed: usize) -> Vec<String> {
        let mut r = vec![round.to_string(), opp.to_string()];
        r.extend((0..12).map(|i| (seed + i).to_string()));
        r
    }

    pub fn trail_row(round: usize, opp: &str, seed: usize) -> Vec<String> {
        let mut r = vec![round.to_string(), opp.to_string()];
        r.extend((0..10).map(|i| (seed + 100 + i).to_string()));
        r
    }

    /// Two teams, two games each, as a `stats/{year}t.html` page.
    pub fn results_page() -> String {
        let mut html = String::from("<html><body>");
        for (team, opps, seed) in [("Adelaide", ["CA", "RI"], 0), ("Carlton", ["AD", "GE"], 50)] {
            let lead: Vec<_> = opps
                .iter()
                .enumerate()
                .map(|(i, o)| lead_row(i + 1, o, seed + i * 20))
                .collect();
            let trail: Vec<_> = opps
                .iter()
                .enumerate()
                .map(|(i, o)| trail_row(i + 1, o, seed + i * 20))
                .collect();
            html.push_str(&table(team, &LEAD, &lead));
            html.push_str(&table(team, &TRAIL, &trail));
        }
        html.push_str("</body></html>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn canonical_names() {
        assert_eq!(STAT_NAMES.len(), 23);
        assert_eq!(canonical_name("KI"), "kicks");
        assert_eq!(canonical_name("1%"), "one_percenters");
        assert_eq!(canonical_name("#"), "round");
        assert_eq!(canonical_name("Opp"), "Opp");
    }

    #[test]
    fn one_row_per_team_per_game() {
        let t = parse_results_document(&results_page(), 2019).unwrap();

        assert_eq!(t.len(), 4);
        assert_eq!(t.columns().len(), 25);
        assert_eq!(&t.columns()[..4], &["team", "round", "Opp", "kicks"]);
        assert_eq!(&t.columns()[14..17], &["clangers", "freekicks_for", "freekicks_against"]);
        assert_eq!(t.columns()[24], "goal_assist");

        let teams: Vec<&str> = t.rows().iter().map(|r| r[0].as_deref().unwrap()).collect();
        assert_eq!(teams, vec!["Adelaide", "Adelaide", "Carlton", "Carlton"]);

        // second Carlton game: leading seed 70, trailing seed 170
        assert_eq!(t.get(3, "Opp"), Some(&Some("GE".into())));
        assert_eq!(t.get(3, "kicks"), Some(&Some("70".into())));
        assert_eq!(t.get(3, "freekicks_for"), Some(&Some("170".into())));
        assert_eq!(t.get(3, "goal_assist"), Some(&Some("179".into())));
        assert_eq!(t.get(0, "round"), Some(&Some("1".into())));
    }

    #[test]
    fn nbsp_dash_is_missing() {
        let mut lead = lead_row(1, "CA", 0);
        lead[2] = "&nbsp;-".into();
        let mut trail = trail_row(1, "CA", 0);
        trail[11] = "&nbsp;-".into();
        let html = table("Adelaide", &LEAD, &[lead]) + &table("Adelaide", &TRAIL, &[trail]);

        let t = parse_results_document(&html, 2019).unwrap();
        assert_eq!(t.get(0, "kicks"), Some(&None));
        assert_eq!(t.get(0, "goal_assist"), Some(&None));
        assert_eq!(t.get(0, "marks"), Some(&Some("1".into())));
    }

    #[test]
    fn mismatched_pair_rows_fail() {
        let html = table("Adelaide", &LEAD, &[lead_row(1, "CA", 0), lead_row(2, "RI", 0)])
            + &table("Adelaide", &TRAIL, &[trail_row(1, "CA", 0)]);
        assert!(parse_results_document(&html, 2019).unwrap_err().is_structure());
    }

    #[test]
    fn narrow_slices_fail() {
        let mut short = trail_row(1, "CA", 0);
        short.truncate(8);
        let html = table("Adelaide", &LEAD, &[lead_row(1, "CA", 0)])
            + &table("Adelaide", &TRAIL, &[short]);
        assert!(parse_results_document(&html, 2019).unwrap_err().is_structure());
    }

    #[test]
    fn unpaired_group_fails() {
        let html = results_page() + &table("Geelong", &LEAD, &[lead_row(1, "CA", 0)]);
        let err = parse_results_document(&html, 2019).unwrap_err();
        assert!(err.to_string().contains("trailing partner"));
    }

    #[test]
    fn unexpected_header_width_fails() {
        let html = table("Adelaide", &LEAD[..10], &[lead_row(1, "CA", 0)])
            + &table("Adelaide", &TRAIL, &[trail_row(1, "CA", 0)]);
        assert!(parse_results_document(&html, 2019).unwrap_err().is_structure());
    }

    #[test]
    fn empty_document_gives_empty_table() {
        let t = parse_results_document("<html></html>", 2019).unwrap();
        assert!(t.is_empty());
    }
}
