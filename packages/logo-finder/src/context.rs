//! Per-page context consumed by scoring.

use crate::domain::DomainExtractor;
use crate::error::{LogoError, Result};
use crate::normalize::bare_domain;

/// Immutable page metadata, built once per fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Domain without scheme, lowercased (`example.com`)
    pub bare_url: String,
    /// First label of `bare_url` (`example`)
    pub site_name: String,
    /// Registrable-domain label of the final resolved URL; differs from
    /// `site_name` when redirects changed the host
    pub domain: String,
    /// Lowercased page title, possibly empty
    pub title: String,
}

impl PageContext {
    /// Build the context for one page.
    ///
    /// `site` may carry a scheme or `www.` prefix; `final_url` is the URL the
    /// fetch ended up at. When no registrable domain can be extracted from it,
    /// `domain` falls back to `site_name`.
    pub fn new(
        site: &str,
        title: &str,
        final_url: &str,
        extractor: &dyn DomainExtractor,
    ) -> Result<Self> {
        let bare_url = bare_domain(site);
        let site_name = bare_url.split('.').next().unwrap_or_default().to_string();
        if site_name.is_empty() {
            return Err(LogoError::InvalidDomain {
                input: site.to_string(),
            });
        }

        let domain = extractor
            .registrable_label(final_url)
            .or_else(|| extractor.registrable_label(&bare_url))
            .unwrap_or_else(|| site_name.clone());

        Ok(Self {
            bare_url,
            site_name,
            domain,
            title: title.trim().to_lowercase(),
        })
    }
}
