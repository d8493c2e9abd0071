use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{self, CurrentUser};
use crate::models::session::Session;
use crate::models::user::{Profile, User};
use crate::state::AppState;
use crate::utils::error::{is_unique_violation, AppError};
use crate::utils::response::{created, empty_success, success};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionPayload {
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
    pub user: Profile,
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Response, AppError> {
    let email = body.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::ValidationError(
            "a valid email address is required".to_string(),
        ));
    }
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let salt = auth::generate_salt();
    let hash = auth::hash_password(&body.password, &salt);

    let user = sqlx::query_as::<_, Profile>(
        "INSERT INTO users (email, password_hash, password_salt)
         VALUES ($1, $2, $3)
         RETURNING id, email, username, avatar_url, updated_at",
    )
    .bind(&email)
    .bind(&hash)
    .bind(&salt)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("an account with this email already exists".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    let session = open_session(&state, user.id).await?;
    tracing::info!(user_id = %user.id, "New account registered");

    Ok(created(
        SessionPayload {
            token: session.token,
            expires_at: session.expires_at,
            user,
        },
        "Account created",
    )
    .into_response())
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Response, AppError> {
    let email = body.email.trim().to_lowercase();

    let account = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, password_salt, username, avatar_url,
                created_at, updated_at
         FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await?;

    // Same failure for unknown email and bad password.
    let account = account
        .ok_or_else(|| AppError::AuthError("invalid email or password".to_string()))?;
    if !auth::verify_password(&body.password, &account.password_salt, &account.password_hash) {
        return Err(AppError::AuthError(
            "invalid email or password".to_string(),
        ));
    }

    let session = open_session(&state, account.id).await?;
    let user = Profile {
        id: account.id,
        email: account.email,
        username: account.username,
        avatar_url: account.avatar_url,
        updated_at: account.updated_at,
    };

    Ok(success(
        SessionPayload {
            token: session.token,
            expires_at: session.expires_at,
            user,
        },
        "Signed in",
    )
    .into_response())
}

pub async fn sign_out(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: axum::http::HeaderMap,
) -> Result<Response, AppError> {
    let token = auth::bearer_token(
        headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )
    .ok_or_else(|| AppError::AuthError("missing bearer token".to_string()))?;

    sqlx::query("DELETE FROM sessions WHERE token = $1 AND user_id = $2")
        .bind(token)
        .bind(user.id)
        .execute(&state.pool)
        .await?;

    Ok(empty_success("Signed out").into_response())
}

pub async fn current_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let profile = fetch_profile(&state, user.id).await?;
    Ok(success(profile, "Session active").into_response())
}

async fn open_session(state: &AppState, user_id: Uuid) -> Result<Session, AppError> {
    // Expired rows are only ever filtered out by the extractor; reap them
    // here so the table does not grow without bound.
    sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(&state.pool)
        .await?;

    let token = auth::generate_token();
    let expires_at = Utc::now() + Duration::hours(state.config.session_ttl_hours);

    let session = sqlx::query_as::<_, Session>(
        "INSERT INTO sessions (token, user_id, expires_at)
         VALUES ($1, $2, $3)
         RETURNING token, user_id, created_at, expires_at",
    )
    .bind(&token)
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(&state.pool)
    .await?;

    Ok(session)
}

async fn fetch_profile(state: &AppState, user_id: Uuid) -> Result<Profile, AppError> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, email, username, avatar_url, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("user not found".to_string()))
}
