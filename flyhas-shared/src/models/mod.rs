pub mod events;
pub mod flight;
pub mod reservation;
