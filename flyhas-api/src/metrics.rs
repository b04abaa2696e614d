use axum::{extract::State, http::header, response::IntoResponse};
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::error::AppError;
use crate::state::AppState;

/// Process-wide booking counters, exported in the Prometheus text format.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub sessions_opened: IntCounter,
    pub sessions_live: IntGauge,
    pub holds_expired: IntCounter,
    pub reservations_submitted: IntCounter,
    pub payments_failed: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let sessions_opened = IntCounter::new(
            "flyhas_seat_sessions_opened_total",
            "Seat selection sessions opened",
        )?;
        let sessions_live = IntGauge::new(
            "flyhas_seat_sessions_live",
            "Seat selection sessions currently held in memory",
        )?;
        let holds_expired = IntCounter::new(
            "flyhas_holds_expired_total",
            "Hold countdowns that reached zero and cleared the selection",
        )?;
        let reservations_submitted = IntCounter::new(
            "flyhas_reservations_submitted_total",
            "Reservation batches accepted by the collaborator",
        )?;
        let payments_failed = IntCounter::new(
            "flyhas_payments_failed_total",
            "Payments that failed after the reservation was created",
        )?;

        registry.register(Box::new(sessions_opened.clone()))?;
        registry.register(Box::new(sessions_live.clone()))?;
        registry.register(Box::new(holds_expired.clone()))?;
        registry.register(Box::new(reservations_submitted.clone()))?;
        registry.register(Box::new(payments_failed.clone()))?;

        Ok(Self {
            registry,
            sessions_opened,
            sessions_live,
            holds_expired,
            reservations_submitted,
            payments_failed,
        })
    }

    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.registry.gather())
    }
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())], body))
}
