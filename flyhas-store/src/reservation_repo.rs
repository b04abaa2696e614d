use async_trait::async_trait;
use std::error::Error;
use tracing::info;

use flyhas_core::payment::PaymentGateway;
use flyhas_core::repository::ReservationRepository;
use flyhas_shared::{CreatedReservation, PaymentRequest, ReservationEntry, ReservationSummary};

use crate::ApiClient;

pub struct RestReservationRepository {
    pub client: ApiClient,
}

impl RestReservationRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReservationRepository for RestReservationRepository {
    async fn submit_reservation(
        &self,
        entries: &[ReservationEntry],
    ) -> Result<Vec<CreatedReservation>, Box<dyn Error + Send + Sync>> {
        let created: Vec<CreatedReservation> = self.client.post_json("reservations", entries).await?;
        info!("Submitted {} reservation entries, {} created", entries.len(), created.len());
        Ok(created)
    }

    async fn my_reservations(
        &self,
        email: &str,
    ) -> Result<Vec<ReservationSummary>, Box<dyn Error + Send + Sync>> {
        let reservations: Vec<ReservationSummary> = self
            .client
            .get_json_with("reservations/my", &[("email", email)])
            .await?;
        Ok(reservations)
    }
}

/// The payment service is opaque: a 2xx means paid, anything else does not.
pub struct RestPaymentGateway {
    pub client: ApiClient,
}

impl RestPaymentGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentGateway for RestPaymentGateway {
    async fn checkout(&self, payment: &PaymentRequest) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.client.post_unit("payment/checkout", payment).await?;
        info!("Payment submitted for reservation {}", payment.reservation_id);
        Ok(())
    }
}
