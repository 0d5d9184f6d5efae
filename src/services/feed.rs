use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::models::{FeedMetrics, FeedRow, SeedTeam};
use crate::services::resolver::NameResolver;

// Field alias tables for the standings feed. Column names vary by snapshot
// and provider; per field, the first non-null alias wins, in this order.
pub const NAME_ALIASES: &[&str] = &["time", "nome", "equipe"];
const WINS_ALIASES: &[&str] = &["v", "vitorias", "V", "wins"];
const LOSSES_ALIASES: &[&str] = &["d", "derrotas", "D", "losses"];
const POINTS_FOR_ALIASES: &[&str] = &["pts", "media_pontos_ataque", "pts_ataque", "PTS_ATAQUE"];
const POINTS_AGAINST_ALIASES: &[&str] =
    &["pts_contra", "media_pontos_defesa", "pts_defesa", "PTS_DEFESA"];
const WIN_PCT_ALIASES: &[&str] = &["pct_vit", "aproveitamento", "pct", "PCT"];
const STREAK_ALIASES: &[&str] = &["ultimos_5", "last_5", "strk", "streak"];

/// Accumulated state for one team while feed rows are folded in. Fields stay
/// raw JSON values until the final coercion pass, so a later partial row can
/// override earlier data without blanking the rest.
#[derive(Debug, Default, Clone)]
struct PartialMetrics {
    team: String,
    wins: Option<Value>,
    losses: Option<Value>,
    points_for: Option<Value>,
    points_against: Option<Value>,
    win_pct: Option<Value>,
    streak: Option<Value>,
}

/// Merge raw feed rows into one canonical metrics entry per team.
///
/// The seed list anchors the key set (key = seed name, lower-cased); rows are
/// matched to an existing key through the injected resolver, and rows naming
/// a team no seed knows get their own key. Rows without a recognizable name
/// field are skipped.
pub fn normalize_feed(
    seed: &[SeedTeam],
    rows: &[FeedRow],
    resolver: &dyn NameResolver,
) -> BTreeMap<String, FeedMetrics> {
    let mut order: Vec<String> = Vec::with_capacity(seed.len());
    let mut entries: HashMap<String, PartialMetrics> = HashMap::new();

    for team in seed {
        let key = team.name.to_lowercase();
        entries.insert(
            key.clone(),
            PartialMetrics {
                team: team.name.clone(),
                ..Default::default()
            },
        );
        order.push(key);
    }

    for row in rows {
        let Some(name) = display_name(row) else {
            tracing::debug!("Feed row without a recognizable name field, skipping");
            continue;
        };

        let keys: Vec<&str> = order.iter().map(String::as_str).collect();
        let key = match resolver.resolve(&name, &keys) {
            Some(idx) => order[idx].clone(),
            None => {
                let key = name.to_lowercase();
                if !entries.contains_key(&key) {
                    entries.insert(key.clone(), PartialMetrics::default());
                    order.push(key.clone());
                }
                key
            }
        };

        // `key` is guaranteed present by now.
        let Some(entry) = entries.get_mut(&key) else {
            continue;
        };
        entry.team = name;
        apply_row(entry, row);
    }

    order
        .into_iter()
        .filter_map(|key| entries.remove(&key).map(|p| (key, finalize(p))))
        .collect()
}

/// Display name from the first present, non-empty name alias.
fn display_name(row: &FeedRow) -> Option<String> {
    NAME_ALIASES.iter().find_map(|key| {
        row.0
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

/// Overlay one row on the accumulated entry. Only fields the row actually
/// supplies replace what is already there.
fn apply_row(entry: &mut PartialMetrics, row: &FeedRow) {
    if let Some(v) = row.first(WINS_ALIASES) {
        entry.wins = Some(v.clone());
    }
    if let Some(v) = row.first(LOSSES_ALIASES) {
        entry.losses = Some(v.clone());
    }
    if let Some(v) = row.first(POINTS_FOR_ALIASES) {
        entry.points_for = Some(v.clone());
    }
    if let Some(v) = row.first(POINTS_AGAINST_ALIASES) {
        entry.points_against = Some(v.clone());
    }
    if let Some(v) = row.first(WIN_PCT_ALIASES) {
        entry.win_pct = Some(v.clone());
    }
    // An empty streak string counts as absent, unlike the numeric fields.
    if let Some(v) = row
        .first(STREAK_ALIASES)
        .filter(|v| v.as_str().map_or(true, |s| !s.is_empty()))
    {
        entry.streak = Some(v.clone());
    }
}

/// Final coercion: numeric fields to numbers (missing/unparseable -> 0),
/// streak to a string ("" when absent).
fn finalize(p: PartialMetrics) -> FeedMetrics {
    FeedMetrics {
        team: p.team,
        wins: to_number(p.wins),
        losses: to_number(p.losses),
        points_for: to_number(p.points_for),
        points_against: to_number(p.points_against),
        win_pct: to_number(p.win_pct),
        last_five: to_text(p.streak),
    }
}

fn to_number(value: Option<Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn to_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
