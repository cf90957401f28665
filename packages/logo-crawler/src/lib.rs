//! Batch logo crawler.
//!
//! Fetches each domain's landing page, runs the [`logo_finder`] pipeline on
//! it and renders the results as CSV.
//!
//! - [`fetch`] - `PageFetcher` trait and the reqwest-backed `HttpFetcher`
//! - [`batch`] - Bounded-concurrency driver, results in input order
//! - [`liveness`] - Optional post-ranking dead-link filter
//! - [`output`] - CSV writer for normal and debug modes
//! - [`config`] - Environment-driven settings

pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod liveness;
pub mod output;

pub use batch::{process_domain, BatchRunner, DomainResult};
pub use config::CrawlerConfig;
pub use error::{FetchError, FetchResult};
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use liveness::{retain_alive, LinkChecker, LivenessChecker};
pub use output::write_results;
