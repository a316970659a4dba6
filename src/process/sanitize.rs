// src/process/sanitize.rs

use crate::table::Cell;

/// Raw cell values the site uses for "not recorded". Matching is exact: a
/// dash inside a value (a hyphenated name, a margin) is left alone.
pub const SEASON_SENTINELS: &[&str] = &["\u{a0}"];
pub const BOX_SCORE_SENTINELS: &[&str] = &["\u{a0}", "-"];
pub const RESULTS_SENTINELS: &[&str] = &["\u{a0}-"];

/// Map a raw cell to its normalized value. Empty markup and sentinels both
/// become `None`; anything else passes through untouched.
pub fn normalize(raw: Option<String>, sentinels: &[&str]) -> Cell {
    raw.filter(|v| !sentinels.contains(&v.as_str()))
}

/// `"Goal Assists"` → `"goal_assists"`.
pub fn snake_label(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// Text present and not just whitespace (the site pads with `&nbsp;`).
pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
