use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use flyhas_core::search::{FlightSearchQuery, FlightSearchRequest};
use flyhas_shared::{City, FlightSummary};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/cities", get(list_cities))
        .route("/v1/flights/search", get(search_flights))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: FlightSearchQuery,
    pub flights: Vec<FlightSummary>,
}

async fn list_cities(State(state): State<AppState>) -> Result<Json<Vec<City>>, AppError> {
    let cities = state
        .flights
        .list_cities()
        .await
        .map_err(|e| AppError::collaborator(e, "Cities"))?;
    Ok(Json(cities))
}

async fn search_flights(
    State(state): State<AppState>,
    Query(request): Query<FlightSearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = request.normalize(state.rules.search_bounds());
    if query.origin.is_empty() || query.destination.is_empty() {
        return Err(AppError::ValidationError("Origin and destination are required".to_string()));
    }

    tracing::info!(
        "Searching flights {} -> {} on {} for {} passengers",
        query.origin, query.destination, query.date, query.passengers
    );

    let flights = state
        .flights
        .search_flights(&query)
        .await
        .map_err(|e| AppError::collaborator(e, "Flight search"))?;

    Ok(Json(SearchResponse { query, flights }))
}
