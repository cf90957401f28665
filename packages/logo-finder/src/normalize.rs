//! URL normalization for emitted logo candidates.

/// Rewrite a raw candidate URL into absolute form.
///
/// - `//cdn.example.com/a.png` becomes `https://cdn.example.com/a.png`
/// - `http…` and `data:` URLs are returned unchanged
/// - anything else is treated as relative to `https://{bare_url}`
pub fn normalize_url(raw: &str, bare_url: &str) -> String {
    if raw.starts_with("//") {
        format!("https:{}", raw)
    } else if raw.starts_with("http") || raw.starts_with("data:") {
        raw.to_string()
    } else if raw.starts_with('/') {
        format!("https://{}{}", bare_url, raw)
    } else {
        format!("https://{}/{}", bare_url, raw)
    }
}

/// Reduce a user-supplied site identifier to a bare domain.
///
/// Strips the scheme, a leading `www.`, any path or query, a port and
/// trailing dots, then lowercases: `HTTPS://www.Example.com/about` → `example.com`.
pub fn bare_domain(input: &str) -> String {
    let lower = input.trim().to_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    let host = without_www
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();

    host.trim_end_matches('.').to_string()
}
