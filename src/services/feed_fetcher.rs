use anyhow::{anyhow, Result};
use reqwest::Client;
use sqlx::SqlitePool;
use std::env;

use crate::db::replace_feed_snapshot;
use crate::models::FeedRow;

/// Pulls a full standings snapshot from the external stats feed and replaces
/// the `standings_feed` table with it. Each fetch is a complete snapshot; no
/// row identity persists across fetches.
pub struct FeedFetcher {
    client: Client,
    feed_url: Option<String>,
}

impl FeedFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            feed_url: env::var("FEED_URL").ok(),
        }
    }

    pub fn has_feed_url(&self) -> bool {
        self.feed_url.is_some()
    }

    /// Fetch the feed and store it. Returns the number of rows stored.
    pub async fn fetch_snapshot(&self, pool: &SqlitePool) -> Result<usize> {
        let url = self
            .feed_url
            .as_ref()
            .ok_or_else(|| anyhow!("FEED_URL not set"))?;

        tracing::info!("Fetching standings snapshot from {}…", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Standings feed error {}: {}", status, body));
        }

        // The feed publishes an array of loosely-shaped objects; anything
        // else is a contract violation and fails the whole fetch.
        let rows: Vec<FeedRow> = response.json().await?;
        replace_feed_snapshot(pool, &rows).await?;

        tracing::info!("Stored {} feed rows", rows.len());
        Ok(rows.len())
    }
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}
