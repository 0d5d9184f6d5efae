use std::collections::BTreeMap;

use crate::models::{Conference, FeedMetrics, MergedTeam, SeedTeam, TeamRow, TeamStats};
use crate::services::resolver::NameResolver;
use crate::services::streak::parse_streak;

/// Logo substituted when a database row matches no known franchise.
pub const FALLBACK_LOGO: &str = "https://a.espncdn.com/i/teamlogos/nba/500/nba.png";

/// Combine database rows, the static seed list, and normalized feed metrics
/// into one authoritative team per database row.
///
/// Conflicts resolve with the fixed priority DB > feed > seed. Rows with no
/// seed or feed match are never dropped; they fall back to synthesized
/// conservative defaults.
pub fn merge_teams(
    db_rows: &[TeamRow],
    seed: &[SeedTeam],
    metrics: &BTreeMap<String, FeedMetrics>,
    resolver: &dyn NameResolver,
) -> Vec<MergedTeam> {
    let seed_names: Vec<&str> = seed.iter().map(|t| t.name.as_str()).collect();
    db_rows
        .iter()
        .map(|row| merge_one(row, seed, &seed_names, metrics, resolver))
        .collect()
}

fn merge_one(
    row: &TeamRow,
    seed: &[SeedTeam],
    seed_names: &[&str],
    metrics: &BTreeMap<String, FeedMetrics>,
    resolver: &dyn NameResolver,
) -> MergedTeam {
    let row_name = row.name.as_deref().unwrap_or("").trim();

    let initial = resolver
        .resolve(row_name, seed_names)
        .map(|idx| seed[idx].clone())
        .unwrap_or_else(|| SeedTeam {
            name: if row_name.is_empty() {
                "Unknown Team".to_string()
            } else {
                row_name.to_string()
            },
            logo: FALLBACK_LOGO.to_string(),
            record: Vec::new(),
            wins: 0,
            losses: 0,
            conference: row
                .conference
                .as_deref()
                .and_then(Conference::parse)
                .unwrap_or(Conference::East),
        });

    // Feed lookup goes through the resolved seed name, not the raw row name.
    let seed_key = initial.name.to_lowercase();
    let feed = metrics.get(&seed_key).or_else(|| {
        let keys: Vec<&str> = metrics.keys().map(String::as_str).collect();
        resolver
            .resolve(&seed_key, &keys)
            .and_then(|idx| metrics.get(keys[idx]))
    });

    let wins = match (row.wins, feed) {
        (Some(wins), _) => wins,
        (None, Some(m)) => m.wins as i64,
        (None, None) => initial.wins,
    };
    let losses = match (row.losses, feed) {
        (Some(losses), _) => losses,
        (None, Some(m)) => m.losses as i64,
        (None, None) => initial.losses,
    };

    let record = match &row.record {
        Some(record) if !record.is_empty() => record.clone(),
        _ => feed
            .and_then(|m| parse_streak(&m.last_five))
            .map(|r| r.to_vec())
            .unwrap_or_else(|| initial.record.clone()),
    };

    MergedTeam {
        id: row.id,
        name: initial.name,
        logo: initial.logo,
        record,
        wins,
        losses,
        conference: initial.conference,
        stats: feed.map(|m| TeamStats {
            points_for: m.points_for,
            points_against: m.points_against,
            win_pct: m.win_pct,
            last_five: m.last_five.clone(),
        }),
    }
}

/// Flip one game result in a team's record, producing a new team. An
/// out-of-range index leaves the record untouched. Persistence of the new
/// record is the caller's concern (optimistic, fire-and-forget).
pub fn toggle_result(team: &MergedTeam, index: usize) -> MergedTeam {
    let mut record = team.record.clone();
    if let Some(slot) = record.get_mut(index) {
        *slot = slot.opposite();
    }
    MergedTeam {
        record,
        ..team.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameResult::{Loss as D, Win as V};
    use crate::services::feed::normalize_feed;
    use crate::services::resolver::ContainsResolver;
    use serde_json::json;

    fn seed(name: &str, conference: Conference) -> SeedTeam {
        SeedTeam {
            name: name.to_string(),
            logo: format!("https://example.com/{}.png", name.to_lowercase()),
            record: vec![D, D, V, D, D],
            wins: 0,
            losses: 0,
            conference,
        }
    }

    fn feed_metrics(
        seeds: &[SeedTeam],
        rows: &[serde_json::Value],
    ) -> BTreeMap<String, FeedMetrics> {
        let rows: Vec<crate::models::FeedRow> = rows
            .iter()
            .map(|v| serde_json::from_value(v.clone()).unwrap())
            .collect();
        normalize_feed(seeds, &rows, &ContainsResolver)
    }

    fn db_row(value: serde_json::Value) -> TeamRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn wins_priority_is_db_then_feed_then_seed() {
        let seeds = vec![seed("Boston Celtics", Conference::East)];
        let metrics = feed_metrics(&seeds, &[json!({"time": "Celtics", "vitorias": 8})]);

        let with_db = db_row(json!({"id": 1, "name": "Celtics", "wins": 10}));
        let no_db = db_row(json!({"id": 1, "name": "Celtics", "wins": null}));

        let merged = merge_teams(&[with_db, no_db], &seeds, &metrics, &ContainsResolver);
        assert_eq!(merged[0].wins, 10);
        assert_eq!(merged[1].wins, 8);

        let merged = merge_teams(
            &[db_row(json!({"id": 1, "name": "Celtics"}))],
            &seeds,
            &BTreeMap::new(),
            &ContainsResolver,
        );
        assert_eq!(merged[0].wins, 0);
    }

    #[test]
    fn non_empty_db_record_beats_feed_streak() {
        let seeds = vec![seed("Boston Celtics", Conference::East)];
        let metrics = feed_metrics(&seeds, &[json!({"time": "Celtics", "ultimos_5": "W5"})]);

        let row = db_row(json!({"id": 1, "name": "Celtics", "record": ["V", "D", "V"]}));
        let merged = merge_teams(&[row], &seeds, &metrics, &ContainsResolver);

        // The DB array survives verbatim, even at a non-standard length.
        assert_eq!(merged[0].record, vec![V, D, V]);
    }

    #[test]
    fn unparseable_feed_streak_falls_through_to_seed_record() {
        let seeds = vec![seed("Boston Celtics", Conference::East)];
        let metrics = feed_metrics(&seeds, &[json!({"time": "Celtics", "ultimos_5": "???"})]);

        let row = db_row(json!({"id": 1, "name": "Celtics"}));
        let merged = merge_teams(&[row], &seeds, &metrics, &ContainsResolver);
        assert_eq!(merged[0].record, vec![D, D, V, D, D]);
    }

    #[test]
    fn seed_name_and_logo_override_db_values() {
        let seeds = vec![seed("Boston Celtics", Conference::East)];
        let row = db_row(json!({"id": 7, "nome": "celtics"}));
        let merged = merge_teams(&[row], &seeds, &BTreeMap::new(), &ContainsResolver);

        assert_eq!(merged[0].name, "Boston Celtics");
        assert_eq!(merged[0].logo, "https://example.com/boston celtics.png");
        assert_eq!(merged[0].conference, Conference::East);
    }

    #[test]
    fn unmatched_row_synthesizes_a_fallback_team() {
        let seeds = vec![seed("Boston Celtics", Conference::East)];
        let rows = vec![
            db_row(json!({"id": 1, "name": "Harlem Globetrotters", "conference": "West"})),
            db_row(json!({"id": 2})),
        ];
        let merged = merge_teams(&rows, &seeds, &BTreeMap::new(), &ContainsResolver);

        assert_eq!(merged[0].name, "Harlem Globetrotters");
        assert_eq!(merged[0].logo, FALLBACK_LOGO);
        assert_eq!(merged[0].conference, Conference::West);
        assert!(merged[0].record.is_empty());
        assert!(merged[0].stats.is_none());

        assert_eq!(merged[1].name, "Unknown Team");
        assert_eq!(merged[1].conference, Conference::East);
    }

    #[test]
    fn end_to_end_scenario() {
        let seeds = vec![SeedTeam {
            name: "Boston Celtics".to_string(),
            logo: "https://example.com/bos.png".to_string(),
            record: Vec::new(),
            wins: 0,
            losses: 0,
            conference: Conference::East,
        }];
        let metrics = feed_metrics(&seeds, &[json!({"time": "Celtics", "ultimos_5": "W3"})]);
        let row = db_row(json!({"id": 7, "name": "Celtics", "wins": 30, "losses": 10}));

        let merged = merge_teams(&[row], &seeds, &metrics, &ContainsResolver);
        let team = &merged[0];
        assert_eq!(team.id, 7);
        assert_eq!(team.name, "Boston Celtics");
        assert_eq!(team.wins, 30);
        assert_eq!(team.losses, 10);
        assert_eq!(team.record, vec![D, D, V, V, V]);
        let stats = team.stats.as_ref().unwrap();
        assert_eq!(stats.last_five, "W3");
    }

    #[test]
    fn toggle_flips_one_index_and_double_toggle_is_identity() {
        let seeds = vec![seed("Boston Celtics", Conference::East)];
        let row = db_row(json!({"id": 1, "name": "Celtics", "record": ["V","V","D","V","D"]}));
        let team = merge_teams(&[row], &seeds, &BTreeMap::new(), &ContainsResolver).remove(0);

        let once = toggle_result(&team, 2);
        assert_eq!(once.record, vec![V, V, V, V, D]);
        let twice = toggle_result(&once, 2);
        assert_eq!(twice.record, team.record);

        // Out-of-range index is a no-op.
        assert_eq!(toggle_result(&team, 40).record, team.record);
    }
}
