use axum::{http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod checkout;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod passengers;
pub mod reservations;
pub mod search;
pub mod seat_sessions;
pub mod sessions;
pub mod state;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(search::routes())
        .merge(seat_sessions::routes())
        .merge(passengers::routes())
        .merge(checkout::routes())
        .merge(reservations::routes())
        .route("/metrics", get(metrics::export))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
