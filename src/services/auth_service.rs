use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::{
    db::DbPool,
    dto::auth::{Claims, LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    response::ApiResponse,
    services::settings_service,
};

/// Compare submitted credentials against the "admin_credentials" settings
/// group. Plaintext comparison, same as the system this replaces; the read
/// goes through to the store every time so a credential change takes effect
/// on the next login attempt.
pub async fn verify_credentials(
    pool: &DbPool,
    username: &str,
    password: &str,
) -> AppResult<bool> {
    let creds = settings_service::admin_credentials(pool).await?;
    Ok(username == creds.username && password == creds.password)
}

pub async fn login(
    pool: &DbPool,
    jwt_secret: &str,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    if !verify_credentials(pool, &payload.username, &payload.password).await? {
        tracing::warn!(username = %payload.username, "failed admin login");
        return Err(AppError::Unauthorized);
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(12))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: payload.username.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(username = %payload.username, "admin logged in");

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
    };
    Ok(ApiResponse::success("Logged in", resp))
}
