use crate::models::GameResult;

/// Parse a free-text streak description into the last five game results,
/// oldest first.
///
/// Two formats are recognized: the compact form (`"W4"`, a result letter
/// followed by a run length) and the character-run form (`"V-V-D-V-D"`).
/// Returns `None` when the input contains nothing result-like.
pub fn parse_streak(input: &str) -> Option<[GameResult; 5]> {
    if input.is_empty() {
        return None;
    }
    parse_compact(input).or_else(|| parse_run(input))
}

/// Recency-weighted win count: a win at index `i` (oldest first) contributes
/// `2^i`, so the most recent game dominates.
pub fn momentum_score(record: &[GameResult]) -> u64 {
    record
        .iter()
        .enumerate()
        .fold(0, |score, (idx, res)| match res {
            GameResult::Win => score + 1u64.checked_shl(idx as u32).unwrap_or(0),
            GameResult::Loss => score,
        })
}

fn letter_result(ch: char) -> Option<GameResult> {
    match ch.to_ascii_uppercase() {
        'W' | 'V' => Some(GameResult::Win),
        'L' | 'D' => Some(GameResult::Loss),
        _ => None,
    }
}

/// Compact form: the first result letter immediately followed by a digit run,
/// case-insensitive. The trailing `count` slots get the streak result, the
/// rest its opposite; counts above 5 are truncated to 5.
fn parse_compact(input: &str) -> Option<[GameResult; 5]> {
    for (idx, ch) in input.char_indices() {
        let Some(result) = letter_result(ch) else {
            continue;
        };
        let digits: &str = {
            let rest = &input[idx + ch.len_utf8()..];
            let end = rest
                .char_indices()
                .find(|(_, c)| !c.is_ascii_digit())
                .map_or(rest.len(), |(i, _)| i);
            &rest[..end]
        };
        if digits.is_empty() {
            continue;
        }
        // Absurdly long digit runs overflow the parse; they clamp to 5 anyway.
        let count = digits.parse::<u32>().map_or(5, |n| n.min(5)) as usize;
        let mut record = [result.opposite(); 5];
        for slot in record.iter_mut().skip(5 - count) {
            *slot = result;
        }
        return Some(record);
    }
    None
}

/// Character-run form: every literal `V`/`D`/`W`/`L` in input order (upper
/// case only, matching the feed's formats). Runs longer than 5 keep the most
/// recent 5; shorter runs are left-padded with the opposite of the earliest
/// present result.
fn parse_run(input: &str) -> Option<[GameResult; 5]> {
    let results: Vec<GameResult> = input
        .chars()
        .filter_map(|c| match c {
            'W' | 'V' => Some(GameResult::Win),
            'L' | 'D' => Some(GameResult::Loss),
            _ => None,
        })
        .collect();
    if results.is_empty() {
        return None;
    }

    let mut record = [GameResult::Loss; 5];
    if results.len() >= 5 {
        record.copy_from_slice(&results[results.len() - 5..]);
    } else {
        let pad = results[0].opposite();
        let offset = 5 - results.len();
        record[..offset].fill(pad);
        record[offset..].copy_from_slice(&results);
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameResult::{Loss as D, Win as V};

    #[test]
    fn compact_form_fills_trailing_positions() {
        assert_eq!(parse_streak("W4"), Some([D, V, V, V, V]));
        assert_eq!(parse_streak("V2"), Some([D, D, D, V, V]));
        assert_eq!(parse_streak("L3"), Some([V, V, D, D, D]));
        assert_eq!(parse_streak("D1"), Some([V, V, V, V, D]));
    }

    #[test]
    fn compact_form_is_case_insensitive() {
        assert_eq!(parse_streak("w3"), parse_streak("W3"));
        assert_eq!(parse_streak("d2"), parse_streak("D2"));
    }

    #[test]
    fn compact_form_clamps_long_streaks() {
        assert_eq!(parse_streak("W10"), Some([V; 5]));
        assert_eq!(parse_streak("W10"), parse_streak("W5"));
        assert_eq!(parse_streak("L99"), Some([D; 5]));
    }

    #[test]
    fn compact_form_zero_count_is_all_opposite() {
        assert_eq!(parse_streak("W0"), Some([D; 5]));
        assert_eq!(parse_streak("L0"), Some([V; 5]));
    }

    #[test]
    fn compact_form_found_mid_string() {
        // "Streak: W3" style inputs from the feed.
        assert_eq!(parse_streak("Won W3"), Some([D, D, V, V, V]));
    }

    #[test]
    fn character_run_of_exactly_five_passes_through() {
        assert_eq!(parse_streak("V-V-D-V-D"), Some([V, V, D, V, D]));
        assert_eq!(parse_streak("WWLWL"), Some([V, V, D, V, D]));
    }

    #[test]
    fn character_run_keeps_most_recent_five() {
        assert_eq!(parse_streak("D-D-D-V-V-D-V-D"), Some([V, V, D, V, D]));
    }

    #[test]
    fn character_run_pads_with_opposite_of_first() {
        // Pad character is fixed from the earliest present result.
        assert_eq!(parse_streak("VD"), Some([D, D, D, V, D]));
        assert_eq!(parse_streak("DV"), Some([V, V, V, D, V]));
        assert_eq!(parse_streak("V"), Some([D, D, D, D, V]));
    }

    #[test]
    fn unparseable_inputs_return_none() {
        assert_eq!(parse_streak(""), None);
        assert_eq!(parse_streak("???"), None);
        assert_eq!(parse_streak("123"), None);
        // Lowercase letters without a digit run match neither format.
        assert_eq!(parse_streak("vdv"), None);
    }

    #[test]
    fn momentum_weights_recent_games_exponentially() {
        assert_eq!(momentum_score(&[D, D, D, D, V]), 16);
        assert_eq!(momentum_score(&[V, D, D, D, D]), 1);
        assert_eq!(momentum_score(&[V; 5]), 31);
        assert_eq!(momentum_score(&[D; 5]), 0);
        assert_eq!(momentum_score(&[]), 0);
    }
}
