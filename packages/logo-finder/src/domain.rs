//! Registrable-domain extraction.

use url::Url;

/// Maps a URL to the label of its registrable domain, one level below the
/// public suffix (`example` for `https://shop.example.co.uk/`).
pub trait DomainExtractor: Send + Sync {
    fn registrable_label(&self, url: &str) -> Option<String>;
}

/// [`DomainExtractor`] backed by the compiled-in public suffix list.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicSuffixExtractor;

impl PublicSuffixExtractor {
    pub fn new() -> Self {
        Self
    }

    fn host_of(url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }

        let parsed = if url.contains("://") {
            Url::parse(url).ok()?
        } else {
            Url::parse(&format!("http://{}", url)).ok()?
        };

        // IP hosts have no registrable domain
        match parsed.host()? {
            url::Host::Domain(domain) => Some(domain.trim_end_matches('.').to_lowercase()),
            url::Host::Ipv4(_) | url::Host::Ipv6(_) => None,
        }
    }
}

impl DomainExtractor for PublicSuffixExtractor {
    fn registrable_label(&self, url: &str) -> Option<String> {
        let host = Self::host_of(url)?;
        let registrable = psl::domain_str(&host)?;
        registrable
            .split('.')
            .next()
            .filter(|label| !label.is_empty())
            .map(str::to_string)
    }
}
