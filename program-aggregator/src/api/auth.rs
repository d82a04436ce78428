use axum::http::HeaderMap;

use crate::api::errors::ApiError;
use crate::api::types::ProgramsQueryParams;

pub const SECRET_HEADER: &str = "x-ga-secret";

/// The secret a caller supplied: the `X-GA-SECRET` header if it is non-empty,
/// otherwise the `secret` query parameter.
pub fn find_secret<'a>(
    headers: &'a HeaderMap,
    query: &'a ProgramsQueryParams,
) -> Option<&'a str> {
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .or(query.secret.as_deref())
        .filter(|s| !s.is_empty())
}

/// An empty configured secret authorizes nobody, not even a caller sending an empty one.
pub fn authorize(configured: &str, supplied: Option<&str>) -> Result<(), ApiError> {
    match supplied {
        Some(supplied) if !configured.is_empty() && supplied == configured => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
