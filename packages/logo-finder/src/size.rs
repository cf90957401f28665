//! Pixel-area estimation from heterogeneous markup.
//!
//! Sizes show up as separate `height`/`width` attributes, as a combined
//! `sizes="32x32"` value, or embedded in the image URL itself
//! (`logo-200x80.png`). Every path here resolves to an area of at least 1;
//! malformed input falls back to `1x1` instead of failing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `WxH` pair, separated by `x` or `-` (e.g. `32x32`, `200-80`)
    static ref DIMENSIONS_REGEX: Regex = Regex::new(r"(?i)(\d+)[x-](\d+)").unwrap();
}

/// Raw size-bearing inputs for one tag, tried in order by [`SizeHints::area`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeHints<'a> {
    pub height: Option<&'a str>,
    pub width: Option<&'a str>,
    pub sizes: Option<&'a str>,
    pub url: Option<&'a str>,
}

impl<'a> SizeHints<'a> {
    /// Hints from explicit `height`/`width` attributes.
    pub fn dimensions(height: Option<&'a str>, width: Option<&'a str>) -> Self {
        Self {
            height,
            width,
            ..Self::default()
        }
    }

    /// Hints from a combined `sizes`-style value.
    pub fn combined(sizes: Option<&'a str>) -> Self {
        Self {
            sizes,
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: &'a str) -> Self {
        self.url = Some(url);
        self
    }

    /// Resolve the area using the first hint present:
    /// explicit attributes, then the combined string, then the URL pattern.
    pub fn area(&self) -> u64 {
        if self.height.is_some() || self.width.is_some() {
            return area_from_dimensions(self.height, self.width);
        }
        if let Some(sizes) = self.sizes {
            return area_from_pattern(sizes);
        }
        if let Some(url) = self.url {
            return area_from_pattern(url);
        }
        1
    }
}

/// Area from two separate numeric strings. A missing or non-numeric
/// dimension counts as `1`; the product is truncated to an integer.
pub fn area_from_dimensions(height: Option<&str>, width: Option<&str>) -> u64 {
    let area = parse_dimension(height) * parse_dimension(width);
    clamp_area(area)
}

/// Area from the first `WxH` match in `text`, or `1` when there is none.
pub fn area_from_pattern(text: &str) -> u64 {
    let (w, h) = find_dimensions(text).unwrap_or((1, 1));
    w.saturating_mul(h).max(1)
}

/// First `WxH` pair in `text`. Digit runs too long for a `u64` count as no match.
pub fn find_dimensions(text: &str) -> Option<(u64, u64)> {
    let caps = DIMENSIONS_REGEX.captures(text)?;
    let w = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let h = caps.get(2)?.as_str().parse::<u64>().ok()?;
    Some((w, h))
}

fn parse_dimension(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(1.0)
}

fn clamp_area(area: f64) -> u64 {
    if area.is_finite() && area >= 1.0 {
        // `as` saturates at u64::MAX
        area as u64
    } else {
        1
    }
}
