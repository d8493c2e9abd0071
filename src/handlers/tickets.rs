use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::event::Event;
use crate::models::payment::PaymentDetails;
use crate::models::ticket::{OwnedTicket, PaymentStatus, Ticket};
use crate::payments;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

fn default_quantity() -> i32 {
    1
}

#[derive(Deserialize)]
pub struct BookingRequest {
    pub payment: PaymentDetails,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Books tickets for an event: simulated payment first, then ticket insert
/// and availability decrement in one transaction. The decrement is
/// conditional on remaining availability, so the count can never go
/// negative and an oversold booking fails with 409 instead of writing a
/// ticket.
pub async fn book_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(body): Json<BookingRequest>,
) -> Result<Response, AppError> {
    if body.quantity < 1 {
        return Err(AppError::ValidationError(
            "quantity must be at least 1".to_string(),
        ));
    }

    let event = sqlx::query_as::<_, Event>(
        "SELECT id, created_by, title, description, date, location, price,
                available_tickets, created_at
         FROM events WHERE id = $1",
    )
    .bind(event_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("event not found".to_string()))?;

    let receipt = payments::process(
        &body.payment,
        Duration::from_millis(state.config.payment_delay_ms),
    )
    .await?;

    let total_price = event.price * Decimal::from(body.quantity);

    let mut tx = state.pool.begin().await?;

    let decremented = sqlx::query(
        "UPDATE events
         SET available_tickets = available_tickets - $2
         WHERE id = $1 AND available_tickets >= $2",
    )
    .bind(event_id)
    .bind(body.quantity)
    .execute(&mut *tx)
    .await?;

    if decremented.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(AppError::Conflict(
            "not enough tickets available".to_string(),
        ));
    }

    let ticket = sqlx::query_as::<_, Ticket>(
        "INSERT INTO tickets (event_id, user_id, quantity, total_price, payment_status)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, event_id, user_id, quantity, total_price, payment_status, created_at",
    )
    .bind(event_id)
    .bind(user.id)
    .bind(body.quantity)
    .bind(total_price)
    .bind(PaymentStatus::Paid)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        ticket_id = %ticket.id,
        event_id = %event_id,
        user_id = %user.id,
        reference = %receipt.reference,
        "Ticket booked"
    );

    Ok(created(ticket, "Ticket booked").into_response())
}

/// The caller's tickets joined with their events, newest purchase first.
pub async fn list_tickets(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let tickets = sqlx::query_as::<_, OwnedTicket>(
        "SELECT t.id, t.event_id, t.quantity, t.total_price, t.payment_status, t.created_at,
                e.title AS event_title, e.date AS event_date, e.location AS event_location
         FROM tickets t
         JOIN events e ON e.id = t.event_id
         WHERE t.user_id = $1
         ORDER BY t.created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(success(tickets, "Your tickets").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_request_defaults_quantity_to_one() {
        let body: BookingRequest = serde_json::from_str(
            r#"{
                "payment": {
                    "card_number": "4242424242424242",
                    "expiry_date": "09/29",
                    "cvv": "123",
                    "name": "Ada Lovelace"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(body.quantity, 1);
    }

    #[test]
    fn booking_request_accepts_explicit_quantity() {
        let body: BookingRequest = serde_json::from_str(
            r#"{
                "payment": {
                    "card_number": "4242424242424242",
                    "expiry_date": "09/29",
                    "cvv": "123",
                    "name": "Ada Lovelace"
                },
                "quantity": 4
            }"#,
        )
        .unwrap();
        assert_eq!(body.quantity, 4);
    }
}
