use axum::extract::FromRequestParts;

use crate::error::AppError;

/// Session identity for cart endpoints. The front end owns session issuance;
/// this service only needs a stable opaque id per client.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get("x-session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("missing x-session-id header".to_string()))?;

        Ok(SessionId(value.to_string()))
    }
}
