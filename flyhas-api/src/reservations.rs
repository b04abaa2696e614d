use axum::{extract::State, routing::get, Json, Router};

use flyhas_shared::ReservationSummary;

use crate::error::AppError;
use crate::middleware::auth::SignedInCustomer;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/reservations/my", get(my_reservations))
}

async fn my_reservations(
    State(state): State<AppState>,
    customer: SignedInCustomer,
) -> Result<Json<Vec<ReservationSummary>>, AppError> {
    tracing::debug!("Listing reservations for {}", customer.subject);
    let reservations = state
        .reservations
        .my_reservations(&customer.email)
        .await
        .map_err(|e| AppError::collaborator(e, "Reservations"))?;
    Ok(Json(reservations))
}
