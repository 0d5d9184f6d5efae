use std::cmp::Ordering;

use crate::models::MergedTeam;
use crate::services::streak::momentum_score;

/// Total order for the standings table, best team first.
///
/// Tie-break chain: recent momentum, then season wins, then feed win
/// percentage. A team without feed stats counts as 0.0 win percentage in the
/// final tie-break only.
pub fn standings_order(a: &MergedTeam, b: &MergedTeam) -> Ordering {
    let by_momentum = momentum_score(&b.record).cmp(&momentum_score(&a.record));
    if by_momentum != Ordering::Equal {
        return by_momentum;
    }
    let by_wins = b.wins.cmp(&a.wins);
    if by_wins != Ordering::Equal {
        return by_wins;
    }
    let a_pct = a.stats.as_ref().map_or(0.0, |s| s.win_pct);
    let b_pct = b.stats.as_ref().map_or(0.0, |s| s.win_pct);
    b_pct.total_cmp(&a_pct)
}

/// Sort a merged collection into standings order. Stable, so re-sorting an
/// already sorted list is a no-op.
pub fn sort_standings(teams: &mut [MergedTeam]) {
    teams.sort_by(standings_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Conference, GameResult, TeamStats};
    use crate::models::GameResult::{Loss as D, Win as V};

    fn team(id: i64, record: Vec<GameResult>, wins: i64, win_pct: Option<f64>) -> MergedTeam {
        MergedTeam {
            id,
            name: format!("Team {}", id),
            logo: String::new(),
            record,
            wins,
            losses: 0,
            conference: Conference::East,
            stats: win_pct.map(|pct| TeamStats {
                points_for: 0.0,
                points_against: 0.0,
                win_pct: pct,
                last_five: String::new(),
            }),
        }
    }

    #[test]
    fn momentum_outranks_wins() {
        // 10-win team with a hot streak beats a 50-win team on a cold one.
        let hot = team(1, vec![D, D, D, D, V], 10, None);
        let cold = team(2, vec![V, D, D, D, D], 50, None);
        assert_eq!(standings_order(&hot, &cold), Ordering::Less);
    }

    #[test]
    fn wins_break_momentum_ties() {
        let a = team(1, vec![V, V, D, D, D], 40, None);
        let b = team(2, vec![V, V, D, D, D], 25, None);
        assert_eq!(standings_order(&a, &b), Ordering::Less);
        assert_eq!(standings_order(&b, &a), Ordering::Greater);
    }

    #[test]
    fn win_pct_breaks_remaining_ties_with_missing_stats_as_zero() {
        let with_stats = team(1, vec![V; 5], 30, Some(61.5));
        let without = team(2, vec![V; 5], 30, None);
        assert_eq!(standings_order(&with_stats, &without), Ordering::Less);

        let fully_tied = team(3, vec![V; 5], 30, Some(61.5));
        assert_eq!(standings_order(&with_stats, &fully_tied), Ordering::Equal);
    }

    #[test]
    fn sorting_twice_is_a_no_op() {
        let mut teams = vec![
            team(1, vec![D, D, D, D, V], 10, Some(40.0)),
            team(2, vec![V, V, V, V, V], 50, Some(70.0)),
            team(3, vec![V, V, D, D, D], 30, None),
            team(4, vec![V, V, D, D, D], 30, Some(52.0)),
        ];
        sort_standings(&mut teams);
        let first_pass: Vec<i64> = teams.iter().map(|t| t.id).collect();
        sort_standings(&mut teams);
        let second_pass: Vec<i64> = teams.iter().map(|t| t.id).collect();

        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass, vec![2, 1, 4, 3]);
    }
}
