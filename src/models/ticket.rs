use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// A ticket joined with the event it was bought for, as shown on the
/// dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OwnedTicket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub event_location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"paid\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
