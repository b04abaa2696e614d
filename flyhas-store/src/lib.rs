pub mod app_config;
pub mod api_client;
pub mod flight_repo;
pub mod reservation_repo;

pub use api_client::{ApiClient, ApiClientError};
pub use flight_repo::RestFlightRepository;
pub use reservation_repo::{RestPaymentGateway, RestReservationRepository};
