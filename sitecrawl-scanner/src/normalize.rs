use crate::error::{Result, ScanError};
use url::Url;

/// Reduce a URL to the key used for visit deduplication: `host + path`.
///
/// The scheme, query and fragment are dropped, the host is lowercased and a
/// single trailing slash is removed from the path. A non-default port stays
/// part of the host.
pub fn normalize_url(input: &str) -> Result<String> {
    let parsed = Url::parse(input)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", input, e)))?;

    let mut host = parsed
        .host_str()
        .ok_or_else(|| ScanError::InvalidUrl(format!("{}: URL has no host", input)))?
        .to_lowercase();
    if let Some(port) = parsed.port() {
        host.push_str(&format!(":{}", port));
    }

    let full = format!("{}{}", host, parsed.path());

    Ok(match full.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => full,
    })
}

/// Hostname of a URL string, if it parses and has one. Ports are ignored.
pub(crate) fn host_of(input: &str) -> Option<String> {
    Url::parse(input).ok()?.host_str().map(str::to_string)
}
