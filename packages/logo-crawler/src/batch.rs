//! Batch driver: one independent pipeline run per domain.
//!
//! Domains are processed concurrently, bounded by a semaphore, and results
//! come back in input order.

use logo_finder::{
    bare_domain, LogoPipeline, PageContext, PipelineOutcome, PublicSuffixExtractor, Ranking,
    Stage,
};
use scraper::Html;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::fetch::{FetchedPage, PageFetcher};
use crate::liveness::{retain_alive, LinkChecker};

/// Outcome for one input domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainResult {
    /// Domain exactly as given on input
    pub domain: String,
    pub outcome: PipelineOutcome,
}

/// Runs the logo pipeline over many domains.
pub struct BatchRunner {
    fetcher: Arc<dyn PageFetcher>,
    pipeline: Arc<LogoPipeline>,
    checker: Option<Arc<dyn LinkChecker>>,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(fetcher: Arc<dyn PageFetcher>, pipeline: Arc<LogoPipeline>) -> Self {
        Self {
            fetcher,
            pipeline,
            checker: None,
            concurrency: 1,
        }
    }

    /// Drop dead candidate URLs after ranking.
    pub fn with_link_checker(mut self, checker: Arc<dyn LinkChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Process every domain; the result vector lines up with `domains`.
    pub async fn run(&self, domains: Vec<String>) -> Vec<DomainResult> {
        info!(
            domains = domains.len(),
            concurrency = self.concurrency,
            "Starting logo batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(domains.len());

        for domain in domains.iter().cloned() {
            let sem = semaphore.clone();
            let fetcher = self.fetcher.clone();
            let pipeline = self.pipeline.clone();
            let checker = self.checker.clone();

            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.ok()?;
                let outcome =
                    process_domain(&domain, fetcher.as_ref(), &pipeline, checker.as_deref()).await;
                Some(outcome)
            }));
        }

        let mut results = Vec::with_capacity(domains.len());
        for (domain, handle) in domains.into_iter().zip(handles) {
            let outcome = match handle.await {
                Ok(Some(outcome)) => outcome,
                Ok(None) => PipelineOutcome::Empty {
                    stage: Stage::NoDocument,
                },
                Err(e) => {
                    error!(domain = %domain, error = %e, "Domain task failed");
                    PipelineOutcome::Empty {
                        stage: Stage::NoDocument,
                    }
                }
            };
            results.push(DomainResult { domain, outcome });
        }

        let found = results
            .iter()
            .filter(|r| r.outcome.best_url().is_some())
            .count();
        info!(domains = results.len(), found, "Logo batch completed");

        results
    }
}

/// Fetch one domain and rank its logo candidates.
pub async fn process_domain(
    domain: &str,
    fetcher: &dyn PageFetcher,
    pipeline: &LogoPipeline,
    checker: Option<&dyn LinkChecker>,
) -> PipelineOutcome {
    let started = Instant::now();
    let outcome = rank_domain(domain, fetcher, pipeline, checker).await;
    info!(
        domain = %domain,
        found = outcome.best_url().is_some(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Processed domain"
    );
    outcome
}

async fn rank_domain(
    domain: &str,
    fetcher: &dyn PageFetcher,
    pipeline: &LogoPipeline,
    checker: Option<&dyn LinkChecker>,
) -> PipelineOutcome {
    let site = bare_domain(domain);
    let url = format!("http://{}", site);

    let fetch_started = Instant::now();
    let page = match fetcher.fetch(&url).await {
        Ok(page) => {
            debug!(
                url = %url,
                final_url = %page.final_url,
                elapsed_ms = fetch_started.elapsed().as_millis() as u64,
                "Fetched page"
            );
            Some(page)
        }
        Err(e) => {
            warn!(
                domain = %domain,
                error = %e,
                elapsed_ms = fetch_started.elapsed().as_millis() as u64,
                "Fetch failed, treating as no document"
            );
            None
        }
    };

    let Some(ctx) = page_context(&site, page.as_ref()) else {
        return PipelineOutcome::Empty {
            stage: Stage::NoDocument,
        };
    };

    let (Some(checker), Some(page)) = (checker, page.as_ref()) else {
        return run_page(pipeline, &ctx, page.as_ref());
    };

    match rank_page(pipeline, &ctx, page) {
        Ok(rows) => {
            let rows = retain_alive(checker, rows).await;
            pipeline.select(rows)
        }
        Err(stage) => PipelineOutcome::Empty { stage },
    }
}

fn page_context(site: &str, page: Option<&FetchedPage>) -> Option<PageContext> {
    let (title, final_url) = page
        .map(|p| (p.title.as_str(), p.final_url.as_str()))
        .unwrap_or(("", ""));

    match PageContext::new(site, title, final_url, &PublicSuffixExtractor::new()) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            warn!(site = %site, error = %e, "Skipping domain");
            None
        }
    }
}

// The parsed document is not `Send`, so parsing and ranking stay in
// synchronous helpers that never hold it across an await.

fn run_page(
    pipeline: &LogoPipeline,
    ctx: &PageContext,
    page: Option<&FetchedPage>,
) -> PipelineOutcome {
    let document = page.map(|p| Html::parse_document(&p.html));
    pipeline.run(document.as_ref(), ctx).unwrap_or_else(|e| {
        error!(website = %ctx.bare_url, error = %e, "Pipeline failed");
        PipelineOutcome::Empty {
            stage: Stage::NoDocument,
        }
    })
}

fn rank_page(pipeline: &LogoPipeline, ctx: &PageContext, page: &FetchedPage) -> Ranking {
    let document = Html::parse_document(&page.html);
    pipeline.rank(Some(&document), ctx).unwrap_or_else(|e| {
        error!(website = %ctx.bare_url, error = %e, "Pipeline failed");
        Err(Stage::NoDocument)
    })
}
