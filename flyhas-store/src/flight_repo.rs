use async_trait::async_trait;
use std::error::Error;
use tracing::info;

use flyhas_core::repository::FlightRepository;
use flyhas_core::search::FlightSearchQuery;
use flyhas_shared::{City, FlightDetail, FlightSummary, ResourceId};

use crate::ApiClient;

pub struct RestFlightRepository {
    pub client: ApiClient,
}

impl RestFlightRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FlightRepository for RestFlightRepository {
    async fn list_cities(&self) -> Result<Vec<City>, Box<dyn Error + Send + Sync>> {
        let cities: Vec<City> = self.client.get_json("cities").await?;
        Ok(cities)
    }

    async fn search_flights(
        &self,
        query: &FlightSearchQuery,
    ) -> Result<Vec<FlightSummary>, Box<dyn Error + Send + Sync>> {
        let date = query.date.format("%Y-%m-%d").to_string();
        let params = [
            ("origin", query.origin.as_str()),
            ("destination", query.destination.as_str()),
            ("date", date.as_str()),
        ];

        let flights: Vec<FlightSummary> = self.client.get_json_with("flights/search", &params).await?;
        info!(
            "Found {} flights {} -> {} on {}",
            flights.len(),
            query.origin,
            query.destination,
            date
        );
        Ok(flights)
    }

    async fn get_flight(&self, id: &ResourceId) -> Result<FlightDetail, Box<dyn Error + Send + Sync>> {
        let id = id.to_string();
        let flight: FlightDetail = self.client.get_json_at(&["flights", id.as_str()]).await?;
        Ok(flight)
    }
}
