use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::CurrentUser;
use crate::models::event::{Event, NewEvent};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// Upcoming events only, soonest first. Public.
pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT id, created_by, title, description, date, location, price,
                available_tickets, created_at
         FROM events
         WHERE date >= now()
         ORDER BY date ASC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(success(events, "Upcoming events").into_response())
}

pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<NewEvent>,
) -> Result<Response, AppError> {
    body.validate()?;

    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO events (created_by, title, description, date, location, price, available_tickets)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, created_by, title, description, date, location, price,
                   available_tickets, created_at",
    )
    .bind(user.id)
    .bind(body.title.trim())
    .bind(body.description.trim())
    .bind(body.date)
    .bind(body.location.trim())
    .bind(body.price)
    .bind(body.available_tickets)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(event_id = %event.id, created_by = %user.id, "Event created");

    Ok(created(event, "Event created").into_response())
}
