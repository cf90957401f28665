//! Typed errors for the logo finder.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Malformed markup never
//! produces one of these: bad sizes, missing attributes and empty pages all
//! resolve to defaults or to an empty result.

use thiserror::Error;

/// Errors that can occur while setting up a page for ranking.
#[derive(Debug, Error)]
pub enum LogoError {
    /// The site identifier is empty after stripping scheme and prefixes
    #[error("invalid domain: {input:?}")]
    InvalidDomain { input: String },

    /// A built-in CSS selector failed to parse
    #[error("invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Result type alias for logo finder operations.
pub type Result<T> = std::result::Result<T, LogoError>;
