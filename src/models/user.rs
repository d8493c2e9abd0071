use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full account row, including credential columns. Never serialized to
/// clients as-is; the API exposes [`Profile`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The client-facing view of an account.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Profile update payload. Fields left out (or sent as `null`) keep their
/// current value; clearing a field is not supported. The original profile
/// form always resubmitted both values, so there is no caller that needs
/// the distinction.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_treats_absent_and_null_alike() {
        let absent: UpdateProfile = serde_json::from_str("{}").unwrap();
        let null: UpdateProfile =
            serde_json::from_str(r#"{"username": null, "avatar_url": null}"#).unwrap();

        assert!(absent.username.is_none() && absent.avatar_url.is_none());
        assert!(null.username.is_none() && null.avatar_url.is_none());
    }
}
