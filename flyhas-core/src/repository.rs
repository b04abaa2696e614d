use async_trait::async_trait;

use flyhas_shared::{
    City, CreatedReservation, FlightDetail, FlightSummary, ReservationEntry, ReservationSummary,
    ResourceId,
};

use crate::search::FlightSearchQuery;

/// Read side of the flight collaborator.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn list_cities(&self) -> Result<Vec<City>, Box<dyn std::error::Error + Send + Sync>>;

    async fn search_flights(
        &self,
        query: &FlightSearchQuery,
    ) -> Result<Vec<FlightSummary>, Box<dyn std::error::Error + Send + Sync>>;

    /// Flight detail including the seat inventory.
    async fn get_flight(
        &self,
        id: &ResourceId,
    ) -> Result<FlightDetail, Box<dyn std::error::Error + Send + Sync>>;
}

/// Reservation collaborator. It alone decides whether a seat is still free.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn submit_reservation(
        &self,
        entries: &[ReservationEntry],
    ) -> Result<Vec<CreatedReservation>, Box<dyn std::error::Error + Send + Sync>>;

    async fn my_reservations(
        &self,
        email: &str,
    ) -> Result<Vec<ReservationSummary>, Box<dyn std::error::Error + Send + Sync>>;
}
