//! Logo candidate records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag shape a candidate was discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagSource {
    #[serde(rename = "<img>")]
    Img,
    #[serde(rename = "<a><img>")]
    AnchorImg,
    #[serde(rename = "<link>")]
    Link,
}

impl TagSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagSource::Img => "<img>",
            TagSource::AnchorImg => "<a><img>",
            TagSource::Link => "<link>",
        }
    }
}

impl fmt::Display for TagSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered image reference, before scoring.
///
/// `label` and `url` are lowercased at collection time; `size` is at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Bare domain of the page the image was found on
    pub website: String,
    /// Alt text, `rel` value or similar; may be empty
    #[serde(rename = "ref")]
    pub label: String,
    /// Raw URL as found in markup, possibly relative
    pub url: String,
    pub source: TagSource,
    /// Inferred pixel area
    pub size: u64,
}

impl Candidate {
    pub fn new(
        website: impl Into<String>,
        label: impl Into<String>,
        url: impl Into<String>,
        source: TagSource,
        size: u64,
    ) -> Self {
        Self {
            website: website.into(),
            label: label.into(),
            url: url.into(),
            source,
            size: size.max(1),
        }
    }

    /// Key used for deduplication within a page.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.label, &self.url)
    }
}

/// Primary and secondary rank keys produced by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub score: i32,
    pub score2: u64,
}

/// A scored candidate as emitted by the ranking pipeline.
///
/// The `size` column is folded into `score2` and no longer carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub website: String,
    #[serde(rename = "ref")]
    pub label: String,
    pub url: String,
    pub source: TagSource,
    pub score: i32,
    pub score2: u64,
}

impl RankedCandidate {
    pub fn new(candidate: Candidate, score: Score) -> Self {
        Self {
            website: candidate.website,
            label: candidate.label,
            url: candidate.url,
            source: candidate.source,
            score: score.score,
            score2: score.score2,
        }
    }
}
