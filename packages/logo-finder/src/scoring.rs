//! Heuristic scoring of logo candidates.
//!
//! Each candidate gets a primary `score` and a secondary `score2`:
//!
//! - Short-circuits: an `apple-touch-icon` label scores 31, a `favicon.ico`
//!   URL scores 30, and nothing else is evaluated.
//! - Otherwise `score` sums every rule that fires. Fuzzy rules fire when the
//!   field is at least 3 chars and its partial similarity to the keyword is
//!   at least 90; exact rules fire on a literal substring match.
//! - A title bonus of up to 45 points is added when the label closely matches
//!   one segment of the page title.
//! - `score2` is the larger of the `WxH` area embedded in the URL and the
//!   candidate's inferred size. It only breaks ties.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::candidate::{Candidate, Score};
use crate::context::PageContext;
use crate::similarity::{IndelSimilarity, Similarity};
use crate::size::find_dimensions;

/// Candidate field a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Label text, with hyphens stripped
    Ref,
    Url,
    /// Tag-shape label (`<img>`, `<a><img>`, `<link>`)
    Source,
}

/// Rule keyword, possibly derived from the page context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Keyword {
    Literal { text: String },
    SiteName,
    BareUrl,
    Domain,
    /// `"{site_name} logo"`
    SiteNameLogo,
}

impl Keyword {
    pub fn literal(text: impl Into<String>) -> Self {
        Keyword::Literal { text: text.into() }
    }

    /// Resolve against a page. Empty results disable the rule.
    pub fn resolve(&self, ctx: &PageContext) -> String {
        match self {
            Keyword::Literal { text } => text.clone(),
            Keyword::SiteName => ctx.site_name.clone(),
            Keyword::BareUrl => ctx.bare_url.clone(),
            Keyword::Domain => ctx.domain.clone(),
            Keyword::SiteNameLogo => format!("{} logo", ctx.site_name),
        }
    }
}

/// A weighted `(keyword, weight, field)` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub keyword: Keyword,
    pub weight: i32,
    pub field: Field,
}

impl Rule {
    pub fn new(keyword: Keyword, weight: i32, field: Field) -> Self {
        Self {
            keyword,
            weight,
            field,
        }
    }

    pub fn literal(text: &str, weight: i32, field: Field) -> Self {
        Self::new(Keyword::literal(text), weight, field)
    }
}

/// Rule tables and thresholds for [`ScoringEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub fuzzy_rules: Vec<Rule>,
    pub exact_rules: Vec<Rule>,
    /// Minimum partial similarity for a fuzzy rule to fire
    pub fuzzy_threshold: u8,
    /// Fields shorter than this never fire fuzzy rules or the title bonus
    pub min_field_len: usize,
    /// Minimum partial similarity between label and a title segment
    pub title_threshold: u8,
    /// Title bonus at 100% similarity
    pub title_weight: i32,
    /// Characters the title is split on before matching
    pub title_separators: Vec<char>,
    pub apple_touch_icon_score: i32,
    pub favicon_score: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        use Field::{Ref, Source, Url};

        Self {
            fuzzy_rules: vec![
                Rule::literal("logo", 10, Ref),
                Rule::literal("logo", 10, Url),
                Rule::literal("header logo", 15, Ref),
                Rule::literal("main logo", 15, Ref),
                Rule::literal("footer logo", 10, Ref),
                Rule::new(Keyword::SiteName, 50, Ref),
                Rule::new(Keyword::SiteName, 35, Url),
                Rule::new(Keyword::BareUrl, 20, Ref),
                Rule::new(Keyword::Domain, 40, Ref),
                Rule::new(Keyword::Domain, 30, Url),
                Rule::new(Keyword::SiteNameLogo, 60, Ref),
            ],
            exact_rules: vec![
                Rule::new(Keyword::SiteNameLogo, 100, Ref),
                Rule::literal("logo", 10, Ref),
                Rule::literal("logo", 10, Url),
                Rule::literal("official", 30, Ref),
                Rule::literal("official", 10, Url),
                Rule::literal("icon", 5, Ref),
                Rule::literal("icon", 5, Url),
                Rule::literal("company", 5, Ref),
                Rule::literal("company", 5, Url),
                Rule::literal("svg", 20, Url),
                Rule::literal("<link>", -5, Source),
            ],
            fuzzy_threshold: 90,
            min_field_len: 3,
            title_threshold: 85,
            title_weight: 45,
            title_separators: vec!['\u{2013}', '-', '|', ':'],
            apple_touch_icon_score: 31,
            favicon_score: 30,
        }
    }
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fuzzy_rules(mut self, rules: Vec<Rule>) -> Self {
        self.fuzzy_rules = rules;
        self
    }

    pub fn with_exact_rules(mut self, rules: Vec<Rule>) -> Self {
        self.exact_rules = rules;
        self
    }

    pub fn with_title_separators(mut self, separators: impl IntoIterator<Item = char>) -> Self {
        self.title_separators = separators.into_iter().collect();
        self
    }
}

/// Why a candidate scored what it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: Score,
    /// Human-readable rule hits, e.g. `exact:logo@url+10`
    pub reasons: Vec<String>,
}

/// Assigns `(score, score2)` to candidates.
pub struct ScoringEngine {
    config: ScoringConfig,
    similarity: Box<dyn Similarity>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            similarity: Box::new(IndelSimilarity::new()),
        }
    }

    /// Swap the fuzzy-matching implementation.
    pub fn with_similarity(mut self, similarity: impl Similarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    pub fn score(&self, candidate: &Candidate, ctx: &PageContext) -> Score {
        self.score_breakdown(candidate, ctx).score
    }

    pub fn score_breakdown(&self, candidate: &Candidate, ctx: &PageContext) -> ScoreBreakdown {
        let score2 = secondary_score(candidate);
        let mut reasons = Vec::new();

        if candidate.label.contains("apple-touch-icon") {
            reasons.push("short_circuit:apple-touch-icon".to_string());
            return ScoreBreakdown {
                score: Score {
                    score: self.config.apple_touch_icon_score,
                    score2,
                },
                reasons,
            };
        }
        if candidate.url.contains("favicon.ico") {
            reasons.push("short_circuit:favicon.ico".to_string());
            return ScoreBreakdown {
                score: Score {
                    score: self.config.favicon_score,
                    score2,
                },
                reasons,
            };
        }

        // Scored on a copy: "company-logo" matches as "companylogo"
        let label = candidate.label.replace('-', "");
        let mut score = 0;

        for rule in &self.config.fuzzy_rules {
            let keyword = rule.keyword.resolve(ctx);
            if keyword.is_empty() {
                continue;
            }
            let text = field_text(rule.field, &label, candidate);
            if text.chars().count() < self.config.min_field_len {
                continue;
            }
            if self.similarity.partial_ratio(text, &keyword) >= self.config.fuzzy_threshold {
                score += rule.weight;
                reasons.push(format!("fuzzy:{}@{:?}{:+}", keyword, rule.field, rule.weight));
            }
        }

        for rule in &self.config.exact_rules {
            let keyword = rule.keyword.resolve(ctx);
            if keyword.is_empty() {
                continue;
            }
            if field_text(rule.field, &label, candidate).contains(keyword.as_str()) {
                score += rule.weight;
                reasons.push(format!("exact:{}@{:?}{:+}", keyword, rule.field, rule.weight));
            }
        }

        if let Some(bonus) = self.title_bonus(&label, &ctx.title) {
            score += bonus;
            reasons.push(format!("title{:+}", bonus));
        }

        trace!(
            url = %candidate.url,
            label = %candidate.label,
            score,
            score2,
            "Scored candidate"
        );

        ScoreBreakdown {
            score: Score { score, score2 },
            reasons,
        }
    }

    /// Bonus from the first title segment that the label matches closely.
    fn title_bonus(&self, label: &str, title: &str) -> Option<i32> {
        if label.chars().count() < self.config.min_field_len {
            return None;
        }

        let separators = self.config.title_separators.as_slice();
        title
            .split(separators)
            .chain(std::iter::once(title))
            .map(|segment| self.similarity.partial_ratio(label, segment.trim()))
            .find(|similarity| *similarity >= self.config.title_threshold)
            .map(|similarity| {
                (f64::from(self.config.title_weight) * f64::from(similarity) / 100.0).round() as i32
            })
    }
}

fn field_text<'a>(field: Field, label: &'a str, candidate: &'a Candidate) -> &'a str {
    match field {
        Field::Ref => label,
        Field::Url => &candidate.url,
        Field::Source => candidate.source.as_str(),
    }
}

/// Larger of the URL-embedded `WxH` area and the inferred size; at least 1.
pub fn secondary_score(candidate: &Candidate) -> u64 {
    let (w, h) = find_dimensions(&candidate.url).unwrap_or((1, 1));
    w.saturating_mul(h).max(candidate.size).max(1)
}
