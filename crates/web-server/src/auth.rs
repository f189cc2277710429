use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use core_types::UserId;

/// Header carrying the authenticated user id, set by the authenticating proxy.
pub const USER_HEADER: &str = "x-user-id";

/// The authenticated user of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        raw.to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|id| CurrentUser(UserId(id)))
            .ok_or_else(|| AppError::Unauthorized("Malformed user header".to_string()))
    }
}
