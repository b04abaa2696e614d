use std::sync::Arc;

use flyhas_core::repository::{FlightRepository, ReservationRepository};
use flyhas_core::CheckoutSubmitter;
use flyhas_store::app_config::BookingRules;

use crate::metrics::Metrics;
use crate::sessions::SeatSessionRegistry;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<dyn FlightRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub checkout: Arc<CheckoutSubmitter>,
    pub sessions: Arc<SeatSessionRegistry>,
    pub auth: AuthConfig,
    pub rules: BookingRules,
    pub metrics: Arc<Metrics>,
}
