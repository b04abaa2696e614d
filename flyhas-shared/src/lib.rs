pub mod models;
pub mod pii;

pub use models::flight::{City, FlightDetail, FlightSummary, ResourceId, SeatRecord};
pub use models::reservation::{CreatedReservation, PaymentRequest, ReservationEntry, ReservationSummary};
pub use pii::Masked;
