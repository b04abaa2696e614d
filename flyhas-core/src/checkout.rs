use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use flyhas_shared::{FlightSummary, ReservationEntry, ResourceId};

use crate::identity::SessionIdentity;
use crate::passenger::{validate_all, CheckoutHandoff, PassengerErrors};
use crate::payment::{CardDetails, CardErrors, PaymentGateway};
use crate::pricing::FareSchedule;
use crate::repository::ReservationRepository;

/// Where the user goes after a confirmed booking.
pub const RESERVATIONS_PAGE: &str = "/UserProfile/Reservations";

/// Shown when the collaborator omits a code for a created reservation.
const UNKNOWN_RESERVATION_CODE: &str = "UNKNOWN";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Card details are invalid")]
    InvalidCard(CardErrors),
    #[error("Passenger details are invalid")]
    InvalidPassengers(PassengerErrors),
    #[error("{seats} seats selected but {passengers} passengers provided")]
    SeatPassengerMismatch { seats: usize, passengers: usize },
    #[error("No seats selected")]
    NoSeats,
    #[error("Reservation failed: {0}")]
    ReservationFailed(String),
    /// The reservation exists but is unpaid. Nothing is rolled back.
    #[error("Payment failed for reservation {reservation_code}: {reason}")]
    PaymentFailed {
        reservation_id: ResourceId,
        reservation_code: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPassenger {
    pub first_name: String,
    pub last_name: String,
    pub seat_number: String,
}

/// Data printed on a ticket. Rendering is someone else's job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    pub origin: String,
    pub destination: String,
    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    pub passengers: Vec<TicketPassenger>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub reservation_id: ResourceId,
    pub reservation_code: String,
    pub total_cost: u32,
    pub currency: String,
    pub ticket: TicketSummary,
    pub next: &'static str,
}

/// Submits a reservation and then pays for it.
///
/// The two calls are independent: if payment fails after the reservation
/// went through, the reservation stays behind unpaid.
pub struct CheckoutSubmitter {
    reservations: Arc<dyn ReservationRepository>,
    payments: Arc<dyn PaymentGateway>,
    fares: FareSchedule,
}

impl CheckoutSubmitter {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        payments: Arc<dyn PaymentGateway>,
        fares: FareSchedule,
    ) -> Self {
        Self { reservations, payments, fares }
    }

    pub fn total_cost(&self, handoff: &CheckoutHandoff) -> u32 {
        self.fares
            .total_cost(handoff.selected_seats.iter().map(|seat| &seat.seat_number))
    }

    pub async fn submit(
        &self,
        handoff: &CheckoutHandoff,
        card: &CardDetails,
        identity: &SessionIdentity,
        today: NaiveDate,
    ) -> Result<Confirmation, CheckoutError> {
        card.validate(today).map_err(CheckoutError::InvalidCard)?;

        if handoff.selected_seats.is_empty() {
            return Err(CheckoutError::NoSeats);
        }
        if handoff.passengers.len() != handoff.selected_seats.len() {
            return Err(CheckoutError::SeatPassengerMismatch {
                seats: handoff.selected_seats.len(),
                passengers: handoff.passengers.len(),
            });
        }
        validate_all(&handoff.passengers, today).map_err(CheckoutError::InvalidPassengers)?;

        let entries = reservation_entries(handoff, identity);
        let total_cost = self.total_cost(handoff);

        // 1. Reservation
        let created = self
            .reservations
            .submit_reservation(&entries)
            .await
            .map_err(|e| {
                error!("Reservation submit failed: {}", e);
                CheckoutError::ReservationFailed(e.to_string())
            })?;

        let first = created.into_iter().next().ok_or_else(|| {
            error!("Reservation collaborator returned no entries");
            CheckoutError::ReservationFailed("empty reservation response".to_string())
        })?;

        let reservation_code = first.reservation_code.unwrap_or_else(|| {
            warn!("Reservation {} came back without a code", first.id);
            UNKNOWN_RESERVATION_CODE.to_string()
        });
        info!("Reservation created: {} ({})", reservation_code, first.id);

        // 2. Payment, against the first entry only
        let payment = card.payment_for(first.id.clone());
        if let Err(e) = self.payments.checkout(&payment).await {
            error!("Payment failed for reservation {}: {}", first.id, e);
            return Err(CheckoutError::PaymentFailed {
                reservation_id: first.id,
                reservation_code,
                reason: e.to_string(),
            });
        }

        info!("Payment accepted for reservation {}", reservation_code);

        Ok(Confirmation {
            reservation_id: first.id,
            reservation_code,
            total_cost,
            currency: self.fares.currency.clone(),
            ticket: ticket_summary(handoff),
            next: RESERVATIONS_PAGE,
        })
    }
}

fn reservation_entries(handoff: &CheckoutHandoff, identity: &SessionIdentity) -> Vec<ReservationEntry> {
    handoff
        .selected_seats
        .iter()
        .zip(&handoff.passengers)
        .map(|(seat, passenger)| ReservationEntry {
            seat_id: seat.id.clone(),
            first_name: passenger.first_name.clone(),
            last_name: passenger.last_name.clone(),
            email: passenger.email.clone(),
            birth_date: passenger.birth_date.clone(),
            national_id: passenger.national_id.clone(),
            reserved_by: identity.reserved_by().to_string(),
        })
        .collect()
}

fn ticket_summary(handoff: &CheckoutHandoff) -> TicketSummary {
    let FlightSummary { origin, destination, departure_time, .. } = &handoff.flight;
    let departure: Option<&NaiveDateTime> = departure_time.as_ref();

    TicketSummary {
        origin: origin.clone(),
        destination: destination.clone(),
        departure_date: departure.map(|t| t.format("%Y-%m-%d").to_string()),
        departure_time: departure.map(|t| t.format("%H:%M").to_string()),
        passengers: handoff
            .selected_seats
            .iter()
            .zip(&handoff.passengers)
            .map(|(seat, passenger)| TicketPassenger {
                first_name: passenger.first_name.clone(),
                last_name: passenger.last_name.clone(),
                seat_number: seat.seat_number.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passenger::PassengerRecord;
    use crate::seat::Seat;
    use async_trait::async_trait;
    use flyhas_shared::{CreatedReservation, Masked, PaymentRequest, ReservationSummary};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeReservations {
        fail: bool,
        omit_code: bool,
        submitted: Mutex<Vec<ReservationEntry>>,
    }

    #[async_trait]
    impl ReservationRepository for FakeReservations {
        async fn submit_reservation(
            &self,
            entries: &[ReservationEntry],
        ) -> Result<Vec<CreatedReservation>, Box<dyn std::error::Error + Send + Sync>> {
            if self.fail {
                return Err("seat already taken".into());
            }
            self.submitted.lock().unwrap().extend_from_slice(entries);
            Ok(entries
                .iter()
                .enumerate()
                .map(|(i, _)| CreatedReservation {
                    id: ResourceId::Numeric(100 + i as i64),
                    reservation_code: if self.omit_code { None } else { Some(format!("FH{}", 100 + i)) },
                })
                .collect())
        }

        async fn my_reservations(
            &self,
            _email: &str,
        ) -> Result<Vec<ReservationSummary>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct FakePayments {
        fail: bool,
        paid: Mutex<Vec<PaymentRequest>>,
    }

    #[async_trait]
    impl PaymentGateway for FakePayments {
        async fn checkout(
            &self,
            payment: &PaymentRequest,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail {
                return Err("card declined".into());
            }
            self.paid.lock().unwrap().push(payment.clone());
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()
    }

    fn passenger(first: &str) -> PassengerRecord {
        PassengerRecord {
            first_name: first.to_string(),
            last_name: "Demir".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            birth_date: "1988-11-02".to_string(),
            national_id: Masked::from("10987654321"),
        }
    }

    fn handoff(seats: &[&str]) -> CheckoutHandoff {
        CheckoutHandoff {
            flight: FlightSummary {
                id: ResourceId::Numeric(1),
                origin: "Istanbul".to_string(),
                destination: "Ankara".to_string(),
                departure_time: NaiveDate::from_ymd_opt(2025, 4, 25)
                    .and_then(|d| d.and_hms_opt(9, 30, 0)),
                arrival_time: None,
            },
            passengers: seats.iter().map(|s| passenger(&format!("Pax{}", s))).collect(),
            selected_seats: seats
                .iter()
                .enumerate()
                .map(|(i, s)| Seat {
                    id: ResourceId::Numeric(i as i64 + 1),
                    seat_number: (*s).into(),
                    reserved: false,
                })
                .collect(),
        }
    }

    fn card() -> CardDetails {
        CardDetails {
            card_number: Masked::from("4242424242424242"),
            expiry_date: "12/27".to_string(),
            cvv: Masked::from("123"),
        }
    }

    fn submitter(
        reservations: Arc<FakeReservations>,
        payments: Arc<FakePayments>,
    ) -> CheckoutSubmitter {
        CheckoutSubmitter::new(reservations, payments, FareSchedule::default())
    }

    #[tokio::test]
    async fn test_single_premium_seat_checkout() {
        let reservations = Arc::new(FakeReservations::default());
        let payments = Arc::new(FakePayments::default());
        let identity = SessionIdentity::authenticated("user-1", None);

        let confirmation = submitter(reservations.clone(), payments.clone())
            .submit(&handoff(&["1A"]), &card(), &identity, today())
            .await
            .unwrap();

        assert_eq!(confirmation.total_cost, 90);
        assert_eq!(confirmation.reservation_code, "FH100");
        assert_eq!(confirmation.next, RESERVATIONS_PAGE);
        assert_eq!(confirmation.ticket.departure_time.as_deref(), Some("09:30"));
        assert_eq!(confirmation.ticket.passengers[0].seat_number, "1A");

        let submitted = reservations.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].reserved_by, "user-1");
        assert_eq!(submitted[0].seat_id, ResourceId::Numeric(1));

        let paid = payments.paid.lock().unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].reservation_id, ResourceId::Numeric(100));
    }

    #[tokio::test]
    async fn test_one_entry_per_seat_and_payment_on_first() {
        let reservations = Arc::new(FakeReservations::default());
        let payments = Arc::new(FakePayments::default());

        let confirmation = submitter(reservations.clone(), payments.clone())
            .submit(&handoff(&["2A", "2B", "1C"]), &card(), &SessionIdentity::anonymous(), today())
            .await
            .unwrap();

        assert_eq!(confirmation.total_cost, 65 + 11 + 11 + 25);
        let submitted = reservations.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 3);
        assert_eq!(submitted[2].first_name, "Pax1C");
        assert!(submitted.iter().all(|e| e.reserved_by.is_empty()));
        assert_eq!(payments.paid.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_card_never_reaches_network() {
        let reservations = Arc::new(FakeReservations::default());
        let payments = Arc::new(FakePayments::default());
        let mut bad = card();
        bad.cvv = Masked::from("12");

        let result = submitter(reservations.clone(), payments.clone())
            .submit(&handoff(&["1A"]), &bad, &SessionIdentity::anonymous(), today())
            .await;

        assert!(matches!(result, Err(CheckoutError::InvalidCard(_))));
        assert!(reservations.submitted.lock().unwrap().is_empty());
        assert!(payments.paid.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reservation_failure_skips_payment() {
        let reservations = Arc::new(FakeReservations { fail: true, ..Default::default() });
        let payments = Arc::new(FakePayments::default());

        let result = submitter(reservations, payments.clone())
            .submit(&handoff(&["1A"]), &card(), &SessionIdentity::anonymous(), today())
            .await;

        assert!(matches!(result, Err(CheckoutError::ReservationFailed(_))));
        assert!(payments.paid.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_failure_leaves_reservation_in_place() {
        let reservations = Arc::new(FakeReservations::default());
        let payments = Arc::new(FakePayments { fail: true, ..Default::default() });

        let result = submitter(reservations.clone(), payments)
            .submit(&handoff(&["3D"]), &card(), &SessionIdentity::anonymous(), today())
            .await;

        match result {
            Err(CheckoutError::PaymentFailed { reservation_code, .. }) => {
                assert_eq!(reservation_code, "FH100")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(reservations.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_code_reported_as_unknown() {
        let reservations = Arc::new(FakeReservations { omit_code: true, ..Default::default() });
        let confirmation = submitter(reservations, Arc::new(FakePayments::default()))
            .submit(&handoff(&["4A"]), &card(), &SessionIdentity::anonymous(), today())
            .await
            .unwrap();

        assert_eq!(confirmation.reservation_code, "UNKNOWN");
    }

    #[tokio::test]
    async fn test_mismatched_passengers_rejected() {
        let mut handoff = handoff(&["1A", "1B"]);
        handoff.passengers.pop();

        let result = submitter(Arc::new(FakeReservations::default()), Arc::new(FakePayments::default()))
            .submit(&handoff, &card(), &SessionIdentity::anonymous(), today())
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::SeatPassengerMismatch { seats: 2, passengers: 1 })
        ));
    }
}
