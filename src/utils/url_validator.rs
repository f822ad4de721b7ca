//! Validation of target URLs submitted for shortening.

use url::Url;

use crate::error::AppError;

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// The input is not rewritten; the stored value is exactly what the caller
/// submitted, so it must already be in canonical `scheme://host` form.
/// `Url::parse` silently repairs whitespace, tabs, newlines and missing
/// slashes, so those forms are rejected before parsing. Anything accepted
/// here is a valid `Location` header value.
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] for empty input, anything other than
/// printable ASCII, backslashes, unparseable input, any other scheme, a
/// missing `://`, or a missing host.
pub fn validate_url(input: &str) -> Result<(), AppError> {
    if input.is_empty() || input.chars().any(|c| !c.is_ascii_graphic() || c == '\\') {
        return Err(AppError::InvalidUrl);
    }

    let url = Url::parse(input).map_err(|e| {
        tracing::debug!(error = %e, "rejected unparseable url");
        AppError::InvalidUrl
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::InvalidUrl);
    }

    if !input[url.scheme().len()..].starts_with("://") {
        return Err(AppError::InvalidUrl);
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(AppError::InvalidUrl),
    }
}
