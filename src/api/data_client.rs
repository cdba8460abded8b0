//! Polymarket Data API client for fetching leaderboards, positions, and activity.

use std::time::Duration;

use anyhow::{Context, Result};
use backoff::ExponentialBackoffBuilder;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ScorerConfig;
use crate::metrics::MetricsCalculator;
use crate::models::{Activity, ClosedPosition, Position, ScoredMetrics};

use super::pagination::collect_pages;
use super::types::*;

/// Leaderboard pages are capped at this size by the API.
const LEADERBOARD_PAGE_LIMIT: u32 = 50;

/// Closed positions pages are capped at this size by the API.
const CLOSED_POSITIONS_PAGE_LIMIT: u32 = 50;

/// The three inputs the scoring engine needs for one wallet, fetched together.
#[derive(Debug, Clone, Default)]
pub struct TraderSnapshot {
    pub positions: Vec<Position>,
    pub closed_positions: Vec<ClosedPosition>,
    pub activities: Vec<Activity>,
}

impl TraderSnapshot {
    /// Score this snapshot.
    pub fn score(&self) -> ScoredMetrics {
        MetricsCalculator::compute(&self.positions, &self.closed_positions, &self.activities)
    }
}

/// Client for Polymarket Data API (read-only operations).
pub struct DataClient {
    client: Client,
    base_url: String,
    page_size: u32,
    max_records: usize,
    max_retry: Duration,
}

impl DataClient {
    /// Create a data client from resolved configuration.
    pub fn new(config: &ScorerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            max_records: config.max_records,
            max_retry: Duration::from_secs(config.max_retry_secs),
        })
    }

    /// GET a JSON document, retrying transport errors, 429 and 5xx with
    /// exponential backoff. Other statuses and parse failures fail at once.
    async fn get_json<T, Q>(&self, path: &str, query: &Q, what: &str) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let client = &self.client;
        let url = url.as_str();

        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(250))
            .with_max_elapsed_time(Some(self.max_retry))
            .build();

        debug!(url = %url, "Fetching {}", what);

        backoff::future::retry(policy, || async move {
            let response = client
                .get(url)
                .query(query)
                .send()
                .await
                .with_context(|| format!("Failed to fetch {}", what))
                .map_err(|e| {
                    warn!(error = %e, "Transport error, retrying");
                    backoff::Error::transient(e)
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let err = anyhow::anyhow!("{} request failed: {} - {}", what, status, body);

                return if is_retryable(status) {
                    warn!(status = %status, "Retryable {} response", what);
                    Err(backoff::Error::transient(err))
                } else {
                    Err(backoff::Error::permanent(err))
                };
            }

            response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to parse {} response", what))
                .map_err(backoff::Error::permanent)
        })
        .await
    }

    /// Fetch open positions for a trader.
    pub async fn get_positions(&self, address: &str) -> Result<Vec<Position>> {
        let items = collect_pages(self.page_size, self.max_records, move |offset| async move {
            let query = [
                ("user", address.to_string()),
                ("limit", self.page_size.to_string()),
                ("offset", offset.to_string()),
            ];
            self.get_json::<Vec<PositionResponse>, _>("/positions", &query, "positions")
                .await
        })
        .await?;

        Ok(items.into_iter().map(Position::from).collect())
    }

    /// Fetch closed (resolved or exited) positions for a trader.
    pub async fn get_closed_positions(&self, address: &str) -> Result<Vec<ClosedPosition>> {
        let page_size = self.closed_positions_page_size();
        let items = collect_pages(page_size, self.max_records, move |offset| async move {
            let query = [
                ("user", address.to_string()),
                ("limit", page_size.to_string()),
                ("offset", offset.to_string()),
            ];
            self.get_json::<Vec<ClosedPositionResponse>, _>(
                "/closed-positions",
                &query,
                "closed positions",
            )
            .await
        })
        .await?;

        Ok(items.into_iter().map(ClosedPosition::from).collect())
    }

    /// Fetch trader activity (trades, rewards, splits, merges, redemptions).
    pub async fn get_activity(&self, address: &str) -> Result<Vec<Activity>> {
        let items = collect_pages(self.page_size, self.max_records, move |offset| async move {
            let query = [
                ("user", address.to_string()),
                ("limit", self.page_size.to_string()),
                ("offset", offset.to_string()),
            ];
            self.get_json::<Vec<ActivityResponse>, _>("/activity", &query, "activity")
                .await
        })
        .await?;

        Ok(items.into_iter().map(Activity::from).collect())
    }

    /// Fetch positions, closed positions and activity for one wallet concurrently.
    pub async fn get_trader_snapshot(&self, address: &str) -> Result<TraderSnapshot> {
        let (positions, closed_positions, activities) = futures::try_join!(
            self.get_positions(address),
            self.get_closed_positions(address),
            self.get_activity(address),
        )?;

        debug!(
            address = %address,
            positions = positions.len(),
            closed = closed_positions.len(),
            activities = activities.len(),
            "Fetched trader snapshot"
        );

        Ok(TraderSnapshot {
            positions,
            closed_positions,
            activities,
        })
    }

    /// Page size for `/closed-positions`; a larger request would come back
    /// short and end pagination early.
    fn closed_positions_page_size(&self) -> u32 {
        self.page_size.min(CLOSED_POSITIONS_PAGE_LIMIT)
    }

    /// Fetch one leaderboard page.
    pub async fn get_leaderboard(
        &self,
        params: &LeaderboardParams,
    ) -> Result<Vec<LeaderboardEntry>> {
        self.get_json("/v1/leaderboard", params, "leaderboard").await
    }

    /// Fetch the top `limit` leaderboard entries for a period, ordered by P&L.
    pub async fn top_traders(
        &self,
        time_period: &str,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>> {
        collect_pages(LEADERBOARD_PAGE_LIMIT, limit, move |offset| async move {
            let params = LeaderboardParams {
                category: Some("OVERALL".to_string()),
                time_period: Some(time_period.to_string()),
                order_by: Some("PNL".to_string()),
                limit: Some(LEADERBOARD_PAGE_LIMIT),
                offset: Some(offset),
            };
            self.get_leaderboard(&params).await
        })
        .await
    }
}

/// Rate limiting and server-side failures are worth another attempt.
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
