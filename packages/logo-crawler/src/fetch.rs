//! Page fetching for the logo pipeline.
//!
//! The pipeline only needs the rendered HTML, the page title and the URL the
//! request finally landed on. Failures are reported upward and turned into
//! "no document" by the batch driver.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::CrawlerConfig;
use crate::error::{FetchError, FetchResult};

/// A fetched page, ready for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: String,
    /// Contents of `<title>`, empty when missing
    pub title: String,
    /// URL after redirects
    pub final_url: String,
}

impl FetchedPage {
    /// Build a page from raw HTML, reading the title from the document.
    pub fn from_html(html: impl Into<String>, final_url: impl Into<String>) -> Self {
        let html = html.into();
        let title = extract_title(&html);
        Self {
            html,
            title,
            final_url: final_url.into(),
        }
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;
}

/// Fetcher over plain HTTP with a browser user agent and retries.
///
/// No JavaScript is executed, so logos injected client-side are missed.
pub struct HttpFetcher {
    client: reqwest::Client,
    attempts: u32,
    retry_delay: std::time::Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> FetchResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(config.page_timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            attempts: config.fetch_attempts.max(1),
            retry_delay: config.retry_delay,
        })
    }

    async fn fetch_once(&self, url: &str) -> FetchResult<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(FetchedPage::from_html(html, final_url))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        let mut attempt = 1;
        loop {
            debug!(url = %url, attempt, "Fetching page");
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) if attempt >= self.attempts => return Err(e),
                Err(e) => {
                    warn!(url = %url, attempt, error = %e, "Page fetch failed, retrying");
                    if e.is_timeout() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
            attempt += 1;
        }
    }
}

/// Extract the trimmed `<title>` text from an HTML document
pub fn extract_title(html: &str) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
