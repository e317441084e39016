use crate::error::{Result, ScanError};
use url::Url;

/// Resolve an `href`/`src` value against `base` into an absolute URL string.
///
/// Follows the standard URL join rules, so absolute references pass through,
/// relative ones are resolved and an empty reference yields the base itself.
pub fn resolve_reference(base: &Url, reference: &str) -> Result<String> {
    base.join(reference)
        .map(|url| url.to_string())
        .map_err(|e| ScanError::MalformedReference {
            reference: reference.to_string(),
            reason: e.to_string(),
        })
}
