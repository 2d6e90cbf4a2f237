use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{dto::auth::Claims, error::AppError, state::AppState};

/// Proof that the caller logged in as the admin. Extracting this guards the
/// handler; there are no other roles.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized);
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(AdminSession {
            username: decoded.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::Request;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::{cart::CartStore, storage::FsImageStore};

    fn test_state(secret: &str) -> AppState {
        let dir = std::env::temp_dir().join(format!("auth-test-{}", Uuid::new_v4()));
        AppState {
            pool: sqlx::postgres::PgPoolOptions::new()
                .connect_lazy("postgres://postgres@localhost/unused")
                .unwrap(),
            orm: Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            carts: CartStore::default(),
            images: Arc::new(FsImageStore::new(dir).unwrap()),
            jwt_secret: secret.to_string(),
        }
    }

    fn parts_with_auth(value: &str) -> axum::http::request::Parts {
        let (parts, ()) = Request::builder()
            .uri("/api/admin/stats")
            .header(header::AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    fn token_for(secret: &[u8]) -> String {
        let claims = Claims {
            sub: "owner".to_string(),
            exp: (Utc::now().timestamp() + 3600) as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[tokio::test]
    async fn accepts_a_token_signed_with_the_configured_secret() {
        let state = test_state("s3cret");
        let mut parts = parts_with_auth(&format!("Bearer {}", token_for(b"s3cret")));

        let session = AdminSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(session.username, "owner");
    }

    #[tokio::test]
    async fn rejects_missing_malformed_or_foreign_tokens() {
        let state = test_state("s3cret");

        let (mut parts, ()) = Request::builder().uri("/x").body(()).unwrap().into_parts();
        assert!(matches!(
            AdminSession::from_request_parts(&mut parts, &state).await,
            Err(AppError::Unauthorized)
        ));

        let mut parts = parts_with_auth("Bearer not-a-token");
        assert!(matches!(
            AdminSession::from_request_parts(&mut parts, &state).await,
            Err(AppError::Unauthorized)
        ));

        // Signed with a different secret.
        let mut parts = parts_with_auth(&format!("Bearer {}", token_for(b"other")));
        assert!(matches!(
            AdminSession::from_request_parts(&mut parts, &state).await,
            Err(AppError::Unauthorized)
        ));
    }
}
