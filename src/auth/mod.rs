use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppError;

const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 32;

pub fn generate_salt() -> String {
    random_hex(SALT_BYTES)
}

/// Opaque bearer token handed out at sign-in.
pub fn generate_token() -> String {
    random_hex(TOKEN_BYTES)
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

pub fn hash_password(password: &str, salt_hex: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, salt_hex: &str, expected_hash: &str) -> bool {
    hash_password(password, salt_hex) == expected_hash
}

/// Strips the `Bearer ` scheme from an `Authorization` header value.
pub fn bearer_token(header_value: Option<&str>) -> Option<&str> {
    header_value?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The authenticated caller, resolved from the bearer session. Handlers
/// that take this extractor reject unauthenticated requests with 401.
#[derive(Debug, Clone, FromRow)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = bearer_token(header_value)
            .ok_or_else(|| AppError::AuthError("missing bearer token".to_string()))?;

        let user = sqlx::query_as::<_, CurrentUser>(
            "SELECT u.id, u.email
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = $1 AND s.expires_at > now()",
        )
        .bind(token)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("invalid or expired session".to_string()))?;

        Ok(user)
    }
}
