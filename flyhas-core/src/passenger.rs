use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use flyhas_shared::{FlightSummary, Masked};

use crate::seat::Seat;
use crate::seat_map::SeatHandoff;
use crate::{CoreError, CoreResult};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email regex")
});

/// Form input for one passenger. All fields arrive as raw strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerRecord {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub national_id: Masked<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PassengerField {
    FirstName,
    LastName,
    Email,
    BirthDate,
    NationalId,
}

pub type FieldErrors = BTreeMap<PassengerField, &'static str>;

/// Errors for every passenger, by position. Valid passengers have an empty map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PassengerErrors(pub Vec<FieldErrors>);

impl PassengerErrors {
    pub fn invalid_count(&self) -> usize {
        self.0.iter().filter(|errors| !errors.is_empty()).count()
    }
}

impl PassengerRecord {
    /// One blank record per selected seat, paired by position.
    pub fn sheet_for(seats: &[Seat]) -> Vec<PassengerRecord> {
        seats.iter().map(|_| PassengerRecord::default()).collect()
    }

    /// Checks every field against `today` and returns all failures at once.
    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.first_name.trim().is_empty() {
            errors.insert(PassengerField::FirstName, "First name is required.");
        }
        if self.last_name.trim().is_empty() {
            errors.insert(PassengerField::LastName, "Last name is required.");
        }

        if self.email.is_empty() {
            errors.insert(PassengerField::Email, "Email is required.");
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.insert(PassengerField::Email, "Invalid email address.");
        }

        if self.birth_date.is_empty() {
            errors.insert(PassengerField::BirthDate, "Birth date is required.");
        } else {
            match NaiveDate::parse_from_str(&self.birth_date, "%Y-%m-%d") {
                Ok(date) if date > today => {
                    errors.insert(PassengerField::BirthDate, "Birth date cannot be in the future.");
                }
                Ok(_) => {}
                Err(_) => {
                    errors.insert(PassengerField::BirthDate, "Birth date is invalid.");
                }
            }
        }

        let national_id = self.national_id.expose();
        if national_id.is_empty() {
            errors.insert(PassengerField::NationalId, "National ID is required.");
        } else if national_id.len() != 11 || !national_id.chars().all(|c| c.is_ascii_digit()) {
            errors.insert(PassengerField::NationalId, "National ID must be exactly 11 digits.");
        }

        errors
    }
}

pub fn validate_all(passengers: &[PassengerRecord], today: NaiveDate) -> Result<(), PassengerErrors> {
    let results: Vec<FieldErrors> = passengers.iter().map(|p| p.validate(today)).collect();

    if results.iter().any(|errors| !errors.is_empty()) {
        Err(PassengerErrors(results))
    } else {
        Ok(())
    }
}

/// What the passenger forms pass on to checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutHandoff {
    pub flight: FlightSummary,
    pub passengers: Vec<PassengerRecord>,
    pub selected_seats: Vec<Seat>,
}

impl CheckoutHandoff {
    /// Pairs the seat hand-off with one validated passenger per seat.
    pub fn collect(
        seats: SeatHandoff,
        passengers: Vec<PassengerRecord>,
        today: NaiveDate,
    ) -> CoreResult<Self> {
        if seats.selected_seats.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        if passengers.len() != seats.selected_seats.len() {
            return Err(CoreError::ValidationError(format!(
                "{} seats selected but {} passengers provided",
                seats.selected_seats.len(),
                passengers.len()
            )));
        }

        validate_all(&passengers, today).map_err(CoreError::PassengerValidation)?;

        Ok(Self {
            flight: seats.flight,
            passengers,
            selected_seats: seats.selected_seats,
        })
    }
}
