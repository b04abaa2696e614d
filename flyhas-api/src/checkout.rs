use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use flyhas_core::payment::CardDetails;
use flyhas_core::{CheckoutError, CheckoutHandoff, Confirmation};

use crate::error::AppError;
use crate::middleware::auth::Identity;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/checkout", post(checkout))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub handoff: CheckoutHandoff,
    pub card: CardDetails,
}

async fn checkout(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<Confirmation>, AppError> {
    if identity.is_anonymous() {
        tracing::info!("Anonymous checkout for flight {}", req.handoff.flight.id);
    }
    let today = chrono::Utc::now().date_naive();
    let result = state
        .checkout
        .submit(&req.handoff, &req.card, &identity, today)
        .await;

    match &result {
        Ok(_) => state.metrics.reservations_submitted.inc(),
        Err(CheckoutError::PaymentFailed { reservation_code, .. }) => {
            state.metrics.reservations_submitted.inc();
            state.metrics.payments_failed.inc();
            tracing::warn!("Reservation {} left unpaid", reservation_code);
        }
        Err(_) => {}
    }

    Ok(Json(result?))
}
