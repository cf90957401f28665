use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Browser-like user agent; many sites serve stripped pages to bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Crawler configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Domains processed at once
    pub concurrency: usize,
    pub page_timeout: Duration,
    pub fetch_attempts: u32,
    /// Pause before retrying a page load that timed out
    pub retry_delay: Duration,
    /// Timeout for liveness probes of candidate URLs
    pub alive_timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            page_timeout: Duration::from_secs(15),
            fetch_attempts: 2,
            retry_delay: Duration::from_secs(15),
            alive_timeout: Duration::from_secs(20),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            concurrency: env_or("LOGO_CONCURRENCY", defaults.concurrency)?.max(1),
            page_timeout: Duration::from_secs(env_or(
                "LOGO_PAGE_TIMEOUT_SECS",
                defaults.page_timeout.as_secs(),
            )?),
            fetch_attempts: env_or("LOGO_FETCH_ATTEMPTS", defaults.fetch_attempts)?.max(1),
            retry_delay: Duration::from_secs(env_or(
                "LOGO_RETRY_DELAY_SECS",
                defaults.retry_delay.as_secs(),
            )?),
            alive_timeout: Duration::from_secs(env_or(
                "LOGO_ALIVE_TIMEOUT_SECS",
                defaults.alive_timeout.as_secs(),
            )?),
            user_agent: env::var("LOGO_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// One worker per CPU, leaving one for the rest of the system
fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}
