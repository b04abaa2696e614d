use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post, put},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use flyhas_core::{CoreError, PassengerRecord, SeatHandoff, SeatNumber};
use flyhas_shared::ResourceId;

use crate::error::AppError;
use crate::sessions::{SeatSession, SeatSessionView};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/seat-sessions", post(open_session))
        .route("/v1/seat-sessions/{id}", get(get_session).delete(close_session))
        .route("/v1/seat-sessions/{id}/passenger-count", put(set_passenger_count))
        .route("/v1/seat-sessions/{id}/seats/{seat_number}/toggle", post(toggle_seat))
        .route("/v1/seat-sessions/{id}/confirm", post(confirm_seats))
        .route("/v1/seat-sessions/{id}/stream", get(hold_stream))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub flight_id: ResourceId,
    pub passenger_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerCountRequest {
    pub passenger_count: i64,
}

/// Seats handed to the passenger page, with one blank form per seat.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatConfirmation {
    #[serde(flatten)]
    pub handoff: SeatHandoff,
    pub passengers: Vec<PassengerRecord>,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<std::sync::Arc<SeatSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFoundError(format!("Seat session {} not found", id)))
}

async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SeatSessionView>), AppError> {
    let detail = state
        .flights
        .get_flight(&req.flight_id)
        .await
        .map_err(|e| AppError::collaborator(e, &format!("Flight {}", req.flight_id)))?;

    let session = state.sessions.open(detail, req.passenger_count).await;
    let view = session.view(&state.rules.fares()).await;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatSessionView>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.view(&state.rules.fares()).await))
}

async fn set_passenger_count(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PassengerCountRequest>,
) -> Result<Json<SeatSessionView>, AppError> {
    let session = find_session(&state, id).await?;
    session.set_passenger_count(req.passenger_count).await;
    Ok(Json(session.view(&state.rules.fares()).await))
}

/// Booked, unknown and over-capacity seats are silently ignored.
async fn toggle_seat(
    State(state): State<AppState>,
    Path((id, seat_number)): Path<(Uuid, String)>,
) -> Result<Json<SeatSessionView>, AppError> {
    let session = find_session(&state, id).await?;
    session.toggle_seat(&SeatNumber::new(seat_number)).await;
    Ok(Json(session.view(&state.rules.fares()).await))
}

async fn confirm_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatConfirmation>, AppError> {
    let session = find_session(&state, id).await?;
    let handoff = session.confirm().await.map_err(|e| match e {
        CoreError::EmptySelection => AppError::ConflictError("Select at least one seat".to_string()),
        other => AppError::from(other),
    })?;
    state.sessions.remove(id).await;

    let passengers = PassengerRecord::sheet_for(&handoff.selected_seats);
    Ok(Json(SeatConfirmation { handoff, passengers }))
}

async fn close_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFoundError(format!("Seat session {} not found", id)))
}

async fn hold_stream(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let session = find_session(&state, id).await?;
    let rx = session.subscribe();
    tracing::debug!("Hold stream subscribed for session {}", session.id());

    let stream = BroadcastStream::new(rx).filter_map(|msg| async move {
        // Lagged receivers skip ahead; the next tick carries the full state.
        let event = msg.ok()?;
        Event::default()
            .event(event.kind.name())
            .json_data(&event)
            .ok()
            .map(Ok)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
