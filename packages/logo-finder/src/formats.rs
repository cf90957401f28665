//! Recognized image formats for candidate URLs.

use serde::{Deserialize, Serialize};

/// Predicate deciding whether a (lowercased) URL points at a usable image.
///
/// A URL matches when its path ends with one of `extensions`, or when it
/// contains one of `inline_markers` (inline SVG markup, base64 data URLs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSet {
    pub extensions: Vec<String>,
    pub inline_markers: Vec<String>,
}

impl Default for FormatSet {
    fn default() -> Self {
        Self {
            extensions: [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico"]
                .into_iter()
                .map(String::from)
                .collect(),
            inline_markers: ["<svg", ";base64,"].into_iter().map(String::from).collect(),
        }
    }
}

impl FormatSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the recognized extensions.
    pub fn with_extensions(mut self, extensions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Replace the inline-data markers.
    pub fn with_inline_markers(
        mut self,
        markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.inline_markers = markers.into_iter().map(|m| m.into()).collect();
        self
    }

    pub fn matches(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }

        if self
            .inline_markers
            .iter()
            .any(|marker| url.contains(marker.as_str()))
        {
            return true;
        }

        let path = url.split(['?', '#']).next().unwrap_or_default();
        self.extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }
}
