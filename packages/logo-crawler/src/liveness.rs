//! Optional post-ranking liveness filter.
//!
//! Drops ranked candidates whose URL does not answer `200 OK`. Never feeds
//! into scoring; it only runs after ranking and only when enabled.

use async_trait::async_trait;
use logo_finder::RankedCandidate;
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, FetchResult};

#[async_trait]
pub trait LinkChecker: Send + Sync {
    /// Whether `url` currently resolves to a live resource
    async fn is_alive(&self, url: &str) -> bool;
}

/// Probes candidate URLs with a GET request.
pub struct LivenessChecker {
    client: reqwest::Client,
}

impl LivenessChecker {
    pub fn new(timeout: Duration, user_agent: &str) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkChecker for LivenessChecker {
    async fn is_alive(&self, url: &str) -> bool {
        if url.starts_with("data:") {
            return true;
        }

        match self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!(url = %url, error = %e, "Liveness probe failed");
                false
            }
        }
    }
}

/// Keep only rows whose URL is alive, preserving rank order.
pub async fn retain_alive(
    checker: &dyn LinkChecker,
    rows: Vec<RankedCandidate>,
) -> Vec<RankedCandidate> {
    let mut alive = Vec::with_capacity(rows.len());
    for row in rows {
        if checker.is_alive(&row.url).await {
            alive.push(row);
        } else {
            debug!(url = %row.url, "Dropping dead candidate");
        }
    }
    alive
}
