use axum::http::HeaderMap;

use crate::domain::social::UserId;
use crate::infrastructure::http::rest_gateway::USER_HEADER;
use crate::presentation::http::errors::AppError;

/// Caller identity from the `x-user-id` header, if present and non-blank.
pub fn optional_user(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(UserId::from)
}

pub fn required_user(headers: &HeaderMap) -> Result<UserId, AppError> {
    optional_user(headers).ok_or(AppError::Unauthorized)
}
