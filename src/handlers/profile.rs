use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::RngCore;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::models::user::{Profile, UpdateProfile};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, email, username, avatar_url, updated_at FROM users WHERE id = $1",
    )
    .bind(user.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(success(profile, "Profile").into_response())
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UpdateProfile>,
) -> Result<Response, AppError> {
    if let Some(username) = &body.username {
        if username.trim().is_empty() {
            return Err(AppError::ValidationError(
                "username must not be blank".to_string(),
            ));
        }
    }

    let profile = sqlx::query_as::<_, Profile>(
        "UPDATE users
         SET username = COALESCE($2, username),
             avatar_url = COALESCE($3, avatar_url),
             updated_at = now()
         WHERE id = $1
         RETURNING id, email, username, avatar_url, updated_at",
    )
    .bind(user.id)
    .bind(body.username.as_deref().map(str::trim))
    .bind(body.avatar_url.as_deref())
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(success(profile, "Profile updated").into_response())
}

#[derive(Serialize)]
struct AvatarPayload {
    avatar_url: String,
}

/// Stores an uploaded avatar image under the configured directory and
/// returns the public URL. The profile itself is not touched; the client
/// submits the URL through the profile update, same two-step flow as the
/// original bucket upload.
pub async fn upload_avatar(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("invalid multipart body: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let is_image = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            return Err(AppError::ValidationError(
                "avatar must be an image upload".to_string(),
            ));
        }

        let ext = sanitized_extension(&file_name)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::ValidationError(format!("failed to read upload: {}", e)))?;
        if data.is_empty() {
            return Err(AppError::ValidationError("empty upload".to_string()));
        }

        let mut suffix = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut suffix);
        let stored_name = format!("{}-{}.{}", user.id, hex::encode(suffix), ext);

        tokio::fs::create_dir_all(&state.config.avatar_dir)
            .await
            .map_err(|e| AppError::InternalServerError(format!("avatar dir: {}", e)))?;
        tokio::fs::write(state.config.avatar_dir.join(&stored_name), &data)
            .await
            .map_err(|e| AppError::InternalServerError(format!("avatar write: {}", e)))?;

        tracing::info!(user_id = %user.id, file = %stored_name, "Avatar stored");

        return Ok(success(
            AvatarPayload {
                avatar_url: format!("/avatars/{}", stored_name),
            },
            "Avatar uploaded",
        )
        .into_response());
    }

    Err(AppError::ValidationError(
        "no file field in upload".to_string(),
    ))
}

fn sanitized_extension(file_name: &str) -> Result<String, AppError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext.is_empty() || ext.len() > 8 || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(AppError::ValidationError(
            "file name must have an image extension".to_string(),
        ));
    }
    Ok(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(sanitized_extension("me.PNG").unwrap(), "png");
        assert_eq!(sanitized_extension("photo.v2.jpeg").unwrap(), "jpeg");
    }

    #[test]
    fn missing_or_hostile_extensions_are_rejected() {
        assert!(sanitized_extension("avatar").is_err());
        assert!(sanitized_extension("avatar.").is_err());
        assert!(sanitized_extension("avatar.p/ng").is_err());
        assert!(sanitized_extension("avatar.waytoolongext").is_err());
    }
}
