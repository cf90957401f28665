//! Heuristic logo detection for rendered HTML pages.
//!
//! Given a parsed document plus page metadata (site, title, final URL), the
//! pipeline collects every plausible image reference, scores it against the
//! page context and returns the most likely logo URL, or the whole ranked
//! table in debug mode.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logo_finder::{LogoPipeline, PageContext, PublicSuffixExtractor};
//! use scraper::Html;
//!
//! let document = Html::parse_document(&html);
//! let ctx = PageContext::new("example.com", &title, &final_url, &PublicSuffixExtractor::new())?;
//! let outcome = LogoPipeline::default().run(Some(&document), &ctx)?;
//! println!("{:?}", outcome.best_url());
//! ```
//!
//! # Modules
//!
//! - [`collector`] - Candidate extraction from `img`, `a > img` and `link` tags
//! - [`scoring`] - Rule-based `(score, score2)` assignment
//! - [`pipeline`] - Dedupe, score, filter, normalize, sort, select
//! - [`size`] - Pixel-area inference from attributes and URLs
//! - [`normalize`] - Absolute URL rewriting
//! - [`similarity`] / [`domain`] - Pluggable fuzzy matching and registrable domains
//!
//! Everything here is synchronous and free of I/O; fetching pages is the
//! caller's job.

pub mod candidate;
pub mod collector;
pub mod context;
pub mod domain;
pub mod error;
pub mod formats;
pub mod normalize;
pub mod pipeline;
pub mod scoring;
pub mod similarity;
pub mod size;

pub use candidate::{Candidate, RankedCandidate, Score, TagSource};
pub use collector::{CollectorConfig, TagCollector};
pub use context::PageContext;
pub use domain::{DomainExtractor, PublicSuffixExtractor};
pub use error::{LogoError, Result};
pub use formats::FormatSet;
pub use normalize::{bare_domain, normalize_url};
pub use pipeline::{LogoPipeline, PipelineConfig, PipelineOutcome, Ranking, Stage};
pub use scoring::{Field, Keyword, Rule, ScoreBreakdown, ScoringConfig, ScoringEngine};
pub use similarity::{IndelSimilarity, Similarity};
pub use size::SizeHints;
