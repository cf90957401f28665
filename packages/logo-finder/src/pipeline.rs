//! Ranking pipeline for one page.
//!
//! `Collected → Deduplicated → Scored → Filtered → Normalized → Ranked`,
//! ending in either a selected logo URL (or the full table in debug mode)
//! or an empty result. An empty result is a normal outcome, not an error.

use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::candidate::{Candidate, RankedCandidate};
use crate::collector::{CollectorConfig, TagCollector};
use crate::context::PageContext;
use crate::error::Result;
use crate::normalize::normalize_url;
use crate::scoring::{ScoringConfig, ScoringEngine};

/// Pipeline state at which a page ran out of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// The fetch/parse collaborator produced no document
    NoDocument,
    Collected,
    Deduplicated,
    Scored,
    Filtered,
    Normalized,
    Ranked,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NoDocument => "no_document",
            Stage::Collected => "collected",
            Stage::Deduplicated => "deduplicated",
            Stage::Scored => "scored",
            Stage::Filtered => "filtered",
            Stage::Normalized => "normalized",
            Stage::Ranked => "ranked",
        };
        f.write_str(name)
    }
}

/// Ranked rows before selection, or the stage at which none were left.
pub type Ranking = std::result::Result<Vec<RankedCandidate>, Stage>;

/// Result of running the pipeline over one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Non-debug mode: URL of the top-ranked candidate
    Selected(String),
    /// Debug mode: every candidate, highest-ranked first
    Table(Vec<RankedCandidate>),
    /// No candidate survived; `stage` is where the set became empty
    Empty { stage: Stage },
}

impl PipelineOutcome {
    /// The selected URL, or the top row of a debug table.
    pub fn best_url(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Selected(url) => Some(url),
            PipelineOutcome::Table(rows) => rows.first().map(|r| r.url.as_str()),
            PipelineOutcome::Empty { .. } => None,
        }
    }
}

/// Configuration for [`LogoPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Skip threshold filtering and return the whole ranked table
    pub debug: bool,
    /// Candidates scoring at or below this are dropped outside debug mode
    pub threshold: i32,
    pub collector: CollectorConfig,
    pub scoring: ScoringConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            threshold: 10,
            collector: CollectorConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_collector(mut self, collector: CollectorConfig) -> Self {
        self.collector = collector;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }
}

/// Collects, scores and ranks logo candidates for one page at a time.
///
/// Holds no per-page state, so one instance can be shared across pages.
#[derive(Debug)]
pub struct LogoPipeline {
    debug: bool,
    threshold: i32,
    collector: TagCollector,
    scorer: ScoringEngine,
}

impl Default for LogoPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl LogoPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            debug: config.debug,
            threshold: config.threshold,
            collector: TagCollector::new(config.collector),
            scorer: ScoringEngine::new(config.scoring),
        }
    }

    /// Replace the scoring engine (e.g. to plug in another similarity measure).
    pub fn with_scorer(mut self, scorer: ScoringEngine) -> Self {
        self.scorer = scorer;
        self
    }

    /// Run the full pipeline and select the outcome for this mode.
    pub fn run(&self, document: Option<&Html>, ctx: &PageContext) -> Result<PipelineOutcome> {
        let Some(document) = document else {
            debug!(website = %ctx.bare_url, "No document, nothing to rank");
            return Ok(PipelineOutcome::Empty {
                stage: Stage::NoDocument,
            });
        };

        let candidates = self.collect(document, ctx)?;
        Ok(self.run_candidates(candidates, ctx))
    }

    /// Run every stage after collection.
    pub fn run_candidates(
        &self,
        candidates: Vec<Candidate>,
        ctx: &PageContext,
    ) -> PipelineOutcome {
        match self.rank_candidates(candidates, ctx) {
            Err(stage) => PipelineOutcome::Empty { stage },
            Ok(rows) => self.select(rows),
        }
    }

    /// Ranked table for a parsed page, before selection.
    ///
    /// The threshold is applied unless the pipeline is in debug mode. When
    /// nothing qualifies, the stage at which the set became empty is returned.
    pub fn rank(&self, document: Option<&Html>, ctx: &PageContext) -> Result<Ranking> {
        let Some(document) = document else {
            return Ok(Err(Stage::NoDocument));
        };
        let candidates = self.collect(document, ctx)?;
        Ok(self.rank_candidates(candidates, ctx))
    }

    fn collect(&self, document: &Html, ctx: &PageContext) -> Result<Vec<Candidate>> {
        let started = Instant::now();
        let candidates = self.collector.collect(document, &ctx.bare_url)?;
        debug!(
            website = %ctx.bare_url,
            candidates = candidates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Collection finished"
        );
        Ok(candidates)
    }

    /// Pick the outcome from an already-ranked table.
    pub fn select(&self, mut rows: Vec<RankedCandidate>) -> PipelineOutcome {
        if rows.is_empty() {
            return PipelineOutcome::Empty {
                stage: Stage::Ranked,
            };
        }
        if self.debug {
            PipelineOutcome::Table(rows)
        } else {
            PipelineOutcome::Selected(rows.swap_remove(0).url)
        }
    }

    /// Dedupe, score, filter, normalize and sort. `Err` carries the stage
    /// at which the candidate set became empty.
    fn rank_candidates(
        &self,
        candidates: Vec<Candidate>,
        ctx: &PageContext,
    ) -> Ranking {
        let started = Instant::now();
        let website = ctx.bare_url.as_str();

        if candidates.is_empty() {
            debug!(website = %website, "No candidates collected");
            return Err(Stage::Collected);
        }

        let candidates = dedupe(candidates);
        debug!(website = %website, remaining = candidates.len(), "Deduplicated candidates");

        let scored: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let score = self.scorer.score(&candidate, ctx);
                RankedCandidate::new(candidate, score)
            })
            .collect();
        debug!(website = %website, remaining = scored.len(), "Scored candidates");

        let filtered = if self.debug {
            scored
        } else {
            apply_threshold(scored, self.threshold)
        };
        if filtered.is_empty() {
            debug!(
                website = %website,
                threshold = self.threshold,
                "No candidate above threshold"
            );
            return Err(Stage::Filtered);
        }
        debug!(website = %website, remaining = filtered.len(), "Filtered candidates");

        let mut ranked = normalize_all(filtered, website);
        sort_ranked(&mut ranked);

        debug!(
            website = %website,
            candidates = ranked.len(),
            top_url = %ranked[0].url,
            top_score = ranked[0].score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ranked logo candidates"
        );

        Ok(ranked)
    }
}

/// Drop repeated `(label, url)` pairs, keeping the first occurrence.
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.label.clone(), c.url.clone())))
        .collect()
}

/// Keep candidates scoring strictly above `threshold`.
pub fn apply_threshold(rows: Vec<RankedCandidate>, threshold: i32) -> Vec<RankedCandidate> {
    rows.into_iter().filter(|r| r.score > threshold).collect()
}

/// Make every URL absolute relative to `bare_url`.
pub fn normalize_all(rows: Vec<RankedCandidate>, bare_url: &str) -> Vec<RankedCandidate> {
    rows.into_iter()
        .map(|mut row| {
            row.url = normalize_url(&row.url, bare_url);
            row
        })
        .collect()
}

/// Stable sort by `score` then `score2`, both descending.
pub fn sort_ranked(rows: &mut [RankedCandidate]) {
    rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| b.score2.cmp(&a.score2)));
}
