use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::seat_map::PassengerBounds;

/// Query string of the flight search form.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightSearchRequest {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub passengers: Option<i64>,
}

/// A normalised search: trimmed places and a clamped passenger count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightSearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub passengers: u8,
}

impl FlightSearchRequest {
    pub fn normalize(self, bounds: PassengerBounds) -> FlightSearchQuery {
        FlightSearchQuery {
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            date: self.date,
            passengers: bounds.clamp(self.passengers.unwrap_or(i64::from(bounds.min))),
        }
    }
}
