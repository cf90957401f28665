//! Candidate collection from a parsed HTML document.
//!
//! Recognized shapes:
//! - `<img>`: first of `src`, `data-src`, `data-lazy-src` in a recognized format
//! - `<a> … <img>`: the same, tagged as coming from an anchor (optional)
//! - `<link>`: `href` in a recognized format, labelled by its first `rel` value

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::{Candidate, TagSource};
use crate::error::{LogoError, Result};
use crate::formats::FormatSet;
use crate::size::SizeHints;

/// Image attributes checked in priority order (lazy-loading variants last).
const IMG_URL_ATTRS: [&str; 3] = ["src", "data-src", "data-lazy-src"];

/// Configuration for [`TagCollector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub formats: FormatSet,
    /// Also emit `<a><img>` candidates for images nested in anchors
    pub follow_anchors: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            formats: FormatSet::default(),
            follow_anchors: true,
        }
    }
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(mut self, formats: FormatSet) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_follow_anchors(mut self, follow: bool) -> Self {
        self.follow_anchors = follow;
        self
    }
}

/// Walks a document and emits raw (unscored) candidates.
#[derive(Debug, Clone, Default)]
pub struct TagCollector {
    config: CollectorConfig,
}

impl TagCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Collect candidates in document order: anchors and images first, then links.
    pub fn collect(&self, document: &Html, bare_url: &str) -> Result<Vec<Candidate>> {
        let body_selector = parse_selector("a, img")?;
        let img_selector = parse_selector("img")?;
        let link_selector = parse_selector("link")?;

        let mut candidates = Vec::new();

        for element in document.select(&body_selector) {
            match element.value().name() {
                "img" => {
                    if let Some(candidate) = self.from_img(element, bare_url, TagSource::Img) {
                        candidates.push(candidate);
                    }
                }
                "a" if self.config.follow_anchors => {
                    let nested = element
                        .select(&img_selector)
                        .next()
                        .and_then(|img| self.from_img(img, bare_url, TagSource::AnchorImg));
                    if let Some(candidate) = nested {
                        candidates.push(candidate);
                    }
                }
                _ => {}
            }
        }

        for element in document.select(&link_selector) {
            if let Some(candidate) = self.from_link(element, bare_url) {
                candidates.push(candidate);
            }
        }

        debug!(
            website = %bare_url,
            candidates = candidates.len(),
            "Collected logo candidates"
        );

        Ok(candidates)
    }

    fn from_img(
        &self,
        img: ElementRef<'_>,
        bare_url: &str,
        source: TagSource,
    ) -> Option<Candidate> {
        let attrs = img.value();
        let url = IMG_URL_ATTRS
            .iter()
            .filter_map(|name| attrs.attr(name))
            .map(|value| value.trim().to_lowercase())
            .find(|value| self.config.formats.matches(value))?;

        let label = attrs.attr("alt").unwrap_or_default().trim().to_lowercase();
        let size = SizeHints::dimensions(
            Some(attrs.attr("height").unwrap_or("1")),
            Some(attrs.attr("width").unwrap_or("1")),
        )
        .area();

        Some(Candidate::new(bare_url, label, url, source, size))
    }

    fn from_link(&self, link: ElementRef<'_>, bare_url: &str) -> Option<Candidate> {
        let attrs = link.value();
        let href = attrs
            .attr("href")
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())?;
        if !self.config.formats.matches(&href) {
            return None;
        }

        // `rel` is a token list; the first token labels the link
        let label = attrs
            .attr("rel")
            .and_then(|rel| rel.split_whitespace().next())
            .unwrap_or_default()
            .to_lowercase();
        let size = SizeHints::combined(Some(attrs.attr("sizes").unwrap_or("1x1"))).area();

        Some(Candidate::new(bare_url, label, href, TagSource::Link, size))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| LogoError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}
