//! Bearer token extraction.

const BEARER_PREFIX: &str = "bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let prefix = header.get(..BEARER_PREFIX.len())?;

    if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }

    header
        .get(BEARER_PREFIX.len()..)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
