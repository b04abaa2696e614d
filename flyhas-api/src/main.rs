use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use flyhas_api::{
    app,
    metrics::Metrics,
    sessions::SeatSessionRegistry,
    state::{AppState, AuthConfig},
    worker::spawn_session_reaper,
};
use flyhas_core::repository::{FlightRepository, ReservationRepository};
use flyhas_core::CheckoutSubmitter;
use flyhas_store::{ApiClient, RestFlightRepository, RestPaymentGateway, RestReservationRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flyhas_api=debug,flyhas_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = flyhas_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting FlyHas API on port {}", config.server.port);

    let client = ApiClient::new(
        &config.collaborator.base_url,
        Duration::from_secs(config.collaborator.timeout_seconds),
    )
    .context("Failed to build collaborator client")?;
    tracing::info!("Booking collaborator at {}", config.collaborator.base_url);

    let flights: Arc<dyn FlightRepository> = Arc::new(RestFlightRepository::new(client.clone()));
    let reservations: Arc<dyn ReservationRepository> =
        Arc::new(RestReservationRepository::new(client.clone()));
    let payments = Arc::new(RestPaymentGateway::new(client));

    let rules = config.booking.clone();
    let metrics = Arc::new(Metrics::new().context("Failed to register metrics")?);
    let sessions = Arc::new(SeatSessionRegistry::new(
        rules.hold_seconds,
        rules.seat_page_bounds(),
        metrics.clone(),
    ));
    let checkout = Arc::new(CheckoutSubmitter::new(reservations.clone(), payments, rules.fares()));

    spawn_session_reaper(
        sessions.clone(),
        Duration::from_secs(rules.reaper_interval_seconds),
        Duration::from_secs(rules.session_idle_seconds),
    );

    let app_state = AppState {
        flights,
        reservations,
        checkout,
        sessions,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
        rules,
        metrics,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(app_state)).await?;
    Ok(())
}
