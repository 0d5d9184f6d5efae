use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::{
    create_pool, get_feed_rows, get_player_stats, get_team_rows, get_unavailable_players,
    init_database_with_pool, initial_teams, upsert_record,
};
use crate::models::{ApiResponse, MergedTeam, PlayerStat, SeedTeam, UnavailablePlayer};
use crate::services::{
    merge_teams, normalize_feed, resolver_for, sort_standings, toggle_result, FeedFetcher,
    NameResolver,
};

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    seed: Arc<Vec<SeedTeam>>,
    resolver: Arc<dyn NameResolver>,
}

pub async fn serve(port: u16) -> anyhow::Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;

    let resolver_kind = std::env::var("NAME_RESOLVER").unwrap_or_default();
    let state = AppState {
        pool,
        seed: Arc::new(initial_teams()),
        resolver: Arc::from(resolver_for(&resolver_kind)),
    };

    let app = create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Courtside API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/standings", get(get_standings_handler))
        .route("/teams", get(get_teams_handler))
        .route("/players", get(get_players_handler))
        .route("/injuries", get(get_injuries_handler))
        .route("/teams/{id}/record/{index}", post(toggle_record_handler))
        .route("/data/fetch", post(fetch_feed_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Recompute the merge pipeline from fresh database reads. The merged
/// collection is a derived view with no storage of its own, so every request
/// runs the full pipeline; recomputation is idempotent and cheap at league
/// scale.
pub async fn load_merged_teams(state: &AppState) -> anyhow::Result<Vec<MergedTeam>> {
    let db_rows = get_team_rows(&state.pool).await?;
    let feed_rows = get_feed_rows(&state.pool).await?;
    let metrics = normalize_feed(&state.seed, &feed_rows, state.resolver.as_ref());
    Ok(merge_teams(
        &db_rows,
        &state.seed,
        &metrics,
        state.resolver.as_ref(),
    ))
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("Courtside API is running"))
}

// GET /standings - Merged teams in power-ranking order
async fn get_standings_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MergedTeam>>>, StatusCode> {
    match load_merged_teams(&state).await {
        Ok(mut teams) => {
            sort_standings(&mut teams);
            Ok(Json(ApiResponse::success(teams)))
        }
        Err(e) => {
            tracing::error!("Failed to compute standings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// GET /teams - Merged teams in database order
async fn get_teams_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MergedTeam>>>, StatusCode> {
    match load_merged_teams(&state).await {
        Ok(teams) => Ok(Json(ApiResponse::success(teams))),
        Err(e) => {
            tracing::error!("Failed to merge teams: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// GET /players - Scoring leaderboard
async fn get_players_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlayerStat>>>, StatusCode> {
    match get_player_stats(&state.pool).await {
        Ok(players) => Ok(Json(ApiResponse::success(players))),
        Err(e) => {
            tracing::error!("Failed to fetch player stats: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// GET /injuries - Injury report
async fn get_injuries_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UnavailablePlayer>>>, StatusCode> {
    match get_unavailable_players(&state.pool).await {
        Ok(players) => Ok(Json(ApiResponse::success(players))),
        Err(e) => {
            tracing::error!("Failed to fetch injury report: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// POST /teams/{id}/record/{index} - Toggle one game result
//
// The response carries the toggled team immediately; the database write is
// fire-and-forget. A failed write is logged and swallowed — the next
// successful refresh reconciles the store and the view.
async fn toggle_record_handler(
    State(state): State<AppState>,
    Path((id, index)): Path<(i64, usize)>,
) -> Result<Json<ApiResponse<MergedTeam>>, StatusCode> {
    let teams = match load_merged_teams(&state).await {
        Ok(teams) => teams,
        Err(e) => {
            tracing::error!("Failed to load teams for toggle: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let Some(team) = teams.iter().find(|t| t.id == id) else {
        return Err(StatusCode::NOT_FOUND);
    };
    if index >= team.record.len() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let updated = toggle_result(team, index);

    let pool = state.pool.clone();
    let record = updated.record.clone();
    tokio::spawn(async move {
        if let Err(e) = upsert_record(&pool, id, &record).await {
            tracing::error!("Failed to persist record for team {}: {}", id, e);
        }
    });

    Ok(Json(ApiResponse::success(updated)))
}

// POST /data/fetch - Pull a fresh snapshot from the external feed
async fn fetch_feed_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    let fetcher = FeedFetcher::new();
    if !fetcher.has_feed_url() {
        return Ok(Json(ApiResponse::error("FEED_URL not set".to_string())));
    }

    match fetcher.fetch_snapshot(&state.pool).await {
        Ok(count) => Ok(Json(ApiResponse::success(format!(
            "Stored {} feed rows",
            count
        )))),
        Err(e) => {
            tracing::error!("Feed fetch failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
