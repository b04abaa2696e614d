use axum::{routing::post, Json, Router};
use serde::Deserialize;

use flyhas_core::{CheckoutHandoff, PassengerRecord, Seat, SeatHandoff};
use flyhas_shared::FlightSummary;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/passengers", post(submit_passengers))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerSubmission {
    pub flight: FlightSummary,
    pub selected_seats: Vec<Seat>,
    #[serde(default)]
    pub passengers: Vec<PassengerRecord>,
}

/// Validates every passenger form and, if all pass, returns the checkout handoff.
async fn submit_passengers(
    Json(submission): Json<PassengerSubmission>,
) -> Result<Json<CheckoutHandoff>, AppError> {
    let seats = SeatHandoff {
        flight: submission.flight,
        selected_seats: submission.selected_seats,
    };
    let today = chrono::Utc::now().date_naive();
    let handoff = CheckoutHandoff::collect(seats, submission.passengers, today)?;

    tracing::info!(
        "Passenger details accepted for {} seats on flight {}",
        handoff.selected_seats.len(),
        handoff.flight.id
    );
    Ok(Json(handoff))
}
