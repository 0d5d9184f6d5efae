pub mod seed;
pub use seed::{initial_teams, seed_data};

use anyhow::Result;
use chrono::Utc;
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{FeedRow, GameResult, PlayerStat, TeamRow, UnavailablePlayer};

/// Structural contract violations at the ingestion boundary. Missing data is
/// never an error (the merge pipeline falls back), but a column that cannot
/// be decoded at all propagates.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("team {id}: malformed record column: {source}")]
    MalformedRecord {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
    #[error("feed row {id}: malformed payload: {source}")]
    MalformedFeedRow {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

pub async fn create_pool() -> Result<SqlitePool> {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/courtside.db".to_string());

    // Strip the "sqlite:" prefix to get the file path, create parent dir if needed
    let file_path = database_url
        .strip_prefix("sqlite:///")
        .or_else(|| database_url.strip_prefix("sqlite://"))
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(&database_url);

    if let Some(parent) = std::path::Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
    }

    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;
    Ok(pool)
}

/// Called from the CLI where no pool exists yet.
pub async fn init_database() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await
}

/// Called from the server so schema creation shares the main pool.
pub async fn init_database_with_pool(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY,
            name TEXT,
            wins INTEGER,
            losses INTEGER,
            record TEXT,
            conference TEXT,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS standings_feed (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            payload TEXT NOT NULL,
            fetched_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nba_player_stats (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            team TEXT NOT NULL,
            position TEXT,
            points REAL NOT NULL DEFAULT 0,
            rebounds REAL NOT NULL DEFAULT 0,
            assists REAL NOT NULL DEFAULT 0,
            minutes TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nba_injured_players (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            team TEXT NOT NULL,
            reason TEXT NOT NULL,
            expected_return TEXT NOT NULL,
            severity TEXT NOT NULL DEFAULT 'leve'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_player_stats_points ON nba_player_stats(points)")
        .execute(pool)
        .await?;

    tracing::info!("Database initialized successfully");
    Ok(())
}

pub async fn clear_all_data(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM standings_feed").execute(pool).await?;
    sqlx::query("DELETE FROM nba_player_stats").execute(pool).await?;
    sqlx::query("DELETE FROM nba_injured_players").execute(pool).await?;
    sqlx::query("DELETE FROM teams").execute(pool).await?;
    tracing::info!("All data cleared");
    Ok(())
}

// Team row operations

pub async fn get_team_rows(pool: &SqlitePool) -> Result<Vec<TeamRow>> {
    let rows = sqlx::query("SELECT id, name, wins, losses, record, conference FROM teams ORDER BY id")
        .fetch_all(pool)
        .await?;

    let mut teams = Vec::with_capacity(rows.len());
    for row in rows {
        let id: i64 = row.get("id");
        let record = match row.get::<Option<String>, _>("record") {
            Some(raw) if !raw.trim().is_empty() => Some(
                serde_json::from_str::<Vec<GameResult>>(&raw)
                    .map_err(|source| IngestError::MalformedRecord { id, source })?,
            ),
            _ => None,
        };
        teams.push(TeamRow {
            id,
            name: row.get("name"),
            wins: row.get("wins"),
            losses: row.get("losses"),
            record,
            conference: row.get("conference"),
        });
    }
    Ok(teams)
}

pub async fn insert_team_row(pool: &SqlitePool, team: &TeamRow) -> Result<()> {
    let record = team
        .record
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO teams (id, name, wins, losses, record, conference, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(team.id)
    .bind(&team.name)
    .bind(team.wins)
    .bind(team.losses)
    .bind(record)
    .bind(&team.conference)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

/// Point update of one team's record, the only write the merge pipeline
/// issues. Leaves every other column alone.
pub async fn upsert_record(pool: &SqlitePool, id: i64, record: &[GameResult]) -> Result<()> {
    let payload = serde_json::to_string(record)?;
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"INSERT INTO teams (id, record, updated_at)
           VALUES (?, ?, ?)
           ON CONFLICT(id) DO UPDATE SET
               record     = excluded.record,
               updated_at = excluded.updated_at"#,
    )
    .bind(id)
    .bind(&payload)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(())
}

// Feed snapshot operations

pub async fn get_feed_rows(pool: &SqlitePool) -> Result<Vec<FeedRow>> {
    let rows = sqlx::query("SELECT id, payload FROM standings_feed ORDER BY id")
        .fetch_all(pool)
        .await?;

    let mut feed = Vec::with_capacity(rows.len());
    for row in rows {
        let id: i64 = row.get("id");
        let payload: String = row.get("payload");
        let parsed: FeedRow = serde_json::from_str(&payload)
            .map_err(|source| IngestError::MalformedFeedRow { id, source })?;
        feed.push(parsed);
    }
    Ok(feed)
}

/// Replace the whole feed snapshot. The feed has no stable row identity, so
/// partial updates make no sense.
pub async fn replace_feed_snapshot(pool: &SqlitePool, rows: &[FeedRow]) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM standings_feed")
        .execute(&mut *tx)
        .await?;
    for row in rows {
        sqlx::query("INSERT INTO standings_feed (payload, fetched_at) VALUES (?, ?)")
            .bind(serde_json::to_string(row)?)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

// Player operations

pub async fn get_player_stats(pool: &SqlitePool) -> Result<Vec<PlayerStat>> {
    let players = sqlx::query_as::<_, PlayerStat>(
        "SELECT * FROM nba_player_stats ORDER BY points DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(players)
}

pub async fn insert_player_stat(pool: &SqlitePool, player: &PlayerStat) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO nba_player_stats
        (id, name, team, position, points, rebounds, assists, minutes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(player.id)
    .bind(&player.name)
    .bind(&player.team)
    .bind(&player.position)
    .bind(player.points)
    .bind(player.rebounds)
    .bind(player.assists)
    .bind(&player.minutes)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_unavailable_players(pool: &SqlitePool) -> Result<Vec<UnavailablePlayer>> {
    let players = sqlx::query_as::<_, UnavailablePlayer>(
        "SELECT * FROM nba_injured_players ORDER BY team, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(players)
}

pub async fn insert_unavailable_player(pool: &SqlitePool, player: &UnavailablePlayer) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO nba_injured_players
        (id, name, team, reason, expected_return, severity)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(player.id)
    .bind(&player.name)
    .bind(&player.team)
    .bind(&player.reason)
    .bind(&player.expected_return)
    .bind(&player.severity)
    .execute(pool)
    .await?;
    Ok(())
}
