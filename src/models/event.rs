use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Decimal,
    pub available_tickets: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for event creation. Mirrors the create-event form: every field
/// is required and the date must lie in the future.
#[derive(Debug, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub price: Decimal,
    pub available_tickets: i32,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::ValidationError("title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::ValidationError(
                "description is required".to_string(),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::ValidationError(
                "location is required".to_string(),
            ));
        }
        if self.price.is_sign_negative() {
            return Err(AppError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }
        if self.available_tickets < 1 {
            return Err(AppError::ValidationError(
                "available_tickets must be at least 1".to_string(),
            ));
        }
        if self.date <= Utc::now() {
            return Err(AppError::ValidationError(
                "date must be in the future".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_event() -> NewEvent {
        NewEvent {
            title: "Rust Meetup".to_string(),
            description: "Monthly meetup".to_string(),
            date: Utc::now() + Duration::days(7),
            location: "Berlin".to_string(),
            price: Decimal::new(2500, 2),
            available_tickets: 100,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_event().validate().is_ok());
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let mut event = valid_event();
        event.title = "  ".to_string();
        assert!(event.validate().is_err());

        let mut event = valid_event();
        event.description = String::new();
        assert!(event.validate().is_err());

        let mut event = valid_event();
        event.location = String::new();
        assert!(event.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut event = valid_event();
        event.price = Decimal::new(-1, 0);
        assert!(event.validate().is_err());
    }

    #[test]
    fn zero_tickets_is_rejected() {
        let mut event = valid_event();
        event.available_tickets = 0;
        assert!(event.validate().is_err());
    }

    #[test]
    fn past_date_is_rejected() {
        let mut event = valid_event();
        event.date = Utc::now() - Duration::hours(1);
        assert!(event.validate().is_err());
    }

    #[test]
    fn free_event_is_allowed() {
        let mut event = valid_event();
        event.price = Decimal::ZERO;
        assert!(event.validate().is_ok());
    }
}
