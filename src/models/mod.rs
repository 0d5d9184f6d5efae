use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Outcome of a single game. Serialized as "V"/"D" (vitória/derrota), the
/// representation the database and the standings feed both use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "V")]
    Win,
    #[serde(rename = "D")]
    Loss,
}

impl GameResult {
    pub fn opposite(self) -> Self {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            GameResult::Win => 'V',
            GameResult::Loss => 'D',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "east" | "leste" => Some(Conference::East),
            "west" | "oeste" => Some(Conference::West),
            _ => None,
        }
    }
}

/// Statically configured franchise metadata, loaded once at startup. The
/// canonical `name` anchors all fuzzy matching; `record`/`wins`/`losses` are
/// last-resort fallbacks only.
#[derive(Debug, Clone, Serialize)]
pub struct SeedTeam {
    pub name: String,
    pub logo: String,
    pub record: Vec<GameResult>,
    pub wins: i64,
    pub losses: i64,
    pub conference: Conference,
}

/// Row from the `teams` table. Every field except `id` is optional by
/// design: rows are written by external tooling and arrive partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRow {
    pub id: i64,
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub wins: Option<i64>,
    #[serde(default)]
    pub losses: Option<i64>,
    #[serde(default)]
    pub record: Option<Vec<GameResult>>,
    #[serde(default)]
    pub conference: Option<String>,
}

/// One raw row from the external standings feed. Column names vary by
/// snapshot/provider, so this stays an untyped JSON object; the feed
/// normalizer resolves the aliases against a declarative table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedRow(pub serde_json::Map<String, serde_json::Value>);

impl FeedRow {
    /// First non-null value among the given field aliases.
    pub fn first(&self, aliases: &[&str]) -> Option<&serde_json::Value> {
        aliases
            .iter()
            .find_map(|key| self.0.get(*key).filter(|v| !v.is_null()))
    }
}

/// Canonical per-team metrics produced by the feed normalizer. Wire names
/// stay as the feed publishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMetrics {
    #[serde(rename = "time")]
    pub team: String,
    #[serde(rename = "vitorias")]
    pub wins: f64,
    #[serde(rename = "derrotas")]
    pub losses: f64,
    #[serde(rename = "media_pontos_ataque")]
    pub points_for: f64,
    #[serde(rename = "media_pontos_defesa")]
    pub points_against: f64,
    #[serde(rename = "aproveitamento")]
    pub win_pct: f64,
    #[serde(rename = "ultimos_5")]
    pub last_five: String,
}

/// Feed-sourced stat block attached to a merged team when a feed match
/// was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    #[serde(rename = "media_pontos_ataque")]
    pub points_for: f64,
    #[serde(rename = "media_pontos_defesa")]
    pub points_against: f64,
    #[serde(rename = "aproveitamento")]
    pub win_pct: f64,
    #[serde(rename = "ultimos_5")]
    pub last_five: String,
}

/// The canonical team entity: one per database row, combining database,
/// feed, and seed data with the fixed priority DB > feed > seed. Derived
/// view only — recomputed from scratch on every read, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct MergedTeam {
    pub id: i64,
    pub name: String,
    pub logo: String,
    pub record: Vec<GameResult>,
    pub wins: i64,
    pub losses: i64,
    pub conference: Conference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TeamStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlayerStat {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub position: Option<String>,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub minutes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UnavailablePlayer {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub reason: String,
    pub expected_return: String,
    pub severity: String, // "leve", "moderada", "grave"
}

// API Response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_result_wire_format_is_v_d() {
        let record = vec![GameResult::Win, GameResult::Loss];
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"["V","D"]"#);
        let parsed: Vec<GameResult> = serde_json::from_str(r#"["D","V"]"#).unwrap();
        assert_eq!(parsed, vec![GameResult::Loss, GameResult::Win]);
    }

    #[test]
    fn team_row_accepts_nome_alias() {
        let row: TeamRow = serde_json::from_str(r#"{"id": 3, "nome": "Celtics"}"#).unwrap();
        assert_eq!(row.name.as_deref(), Some("Celtics"));
        assert!(row.wins.is_none());
        assert!(row.record.is_none());
    }

    #[test]
    fn feed_row_first_skips_nulls() {
        let row: FeedRow =
            serde_json::from_str(r#"{"v": null, "vitorias": 12, "wins": 9}"#).unwrap();
        let value = row.first(&["v", "vitorias", "wins"]).unwrap();
        assert_eq!(value.as_i64(), Some(12));
        assert!(row.first(&["pts", "PTS_ATAQUE"]).is_none());
    }
}
