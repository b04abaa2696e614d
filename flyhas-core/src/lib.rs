pub mod seat;
pub mod seat_map;
pub mod hold;
pub mod pricing;
pub mod passenger;
pub mod payment;
pub mod search;
pub mod identity;
pub mod repository;
pub mod checkout;

pub use checkout::{CheckoutError, CheckoutSubmitter, Confirmation};
pub use hold::{HoldState, HoldTimer};
pub use passenger::{CheckoutHandoff, PassengerRecord};
pub use pricing::FareSchedule;
pub use seat::{Seat, SeatNumber, SeatTier};
pub use seat_map::{PassengerBounds, SeatHandoff, SeatInventory, SeatSelection, ToggleOutcome};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Passenger details are invalid")]
    PassengerValidation(passenger::PassengerErrors),
    #[error("No seats selected")]
    EmptySelection,
}

pub type CoreResult<T> = Result<T, CoreError>;
