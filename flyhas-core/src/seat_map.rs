use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use flyhas_shared::{FlightDetail, FlightSummary};

use crate::hold::{HoldState, HoldTimer};
use crate::pricing::FareSchedule;
use crate::seat::{Seat, SeatNumber, SeatTier, COLUMN_LABELS, ROW_LABELS};
use crate::{CoreError, CoreResult};

/// Seats of one flight, fetched once per session.
#[derive(Debug, Clone)]
pub struct SeatInventory {
    flight: FlightSummary,
    seats: Vec<Seat>,
    booked: HashSet<SeatNumber>,
}

impl SeatInventory {
    pub fn from_flight(detail: FlightDetail) -> Self {
        let seats: Vec<Seat> = detail.seats.into_iter().map(Seat::from).collect();
        let booked = seats
            .iter()
            .filter(|seat| seat.reserved)
            .map(|seat| seat.seat_number.clone())
            .collect();

        Self { flight: detail.flight, seats, booked }
    }

    pub fn flight(&self) -> &FlightSummary {
        &self.flight
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn booked(&self) -> &HashSet<SeatNumber> {
        &self.booked
    }

    pub fn is_booked(&self, seat_number: &SeatNumber) -> bool {
        self.booked.contains(seat_number)
    }

    pub fn find(&self, seat_number: &SeatNumber) -> Option<&Seat> {
        self.seats.iter().find(|seat| &seat.seat_number == seat_number)
    }

    pub fn open_seat_count(&self) -> usize {
        self.seats.len() - self.booked.len()
    }
}

/// Inclusive range a passenger count is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerBounds {
    pub min: u8,
    pub max: u8,
}

impl PassengerBounds {
    /// Passenger selector on the seat map.
    pub const SEAT_PAGE: PassengerBounds = PassengerBounds { min: 1, max: 5 };
    /// Passenger selector on the search form.
    pub const SEARCH_FORM: PassengerBounds = PassengerBounds { min: 1, max: 10 };

    pub fn new(min: u8, max: u8) -> Self {
        let min = min.max(1);
        Self { min, max: max.max(min) }
    }

    pub fn clamp(&self, requested: i64) -> u8 {
        requested.clamp(i64::from(self.min), i64::from(self.max)) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Clicks on booked seats, seats missing from the inventory, and seats
    /// beyond the passenger count are swallowed without telling the user.
    IgnoredBooked,
    IgnoredUnknown,
    IgnoredAtCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    Available,
    Booked,
    Selected,
    /// The layout has this label but the flight's inventory does not.
    Unlisted,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatCell {
    pub seat_number: SeatNumber,
    pub state: SeatState,
    pub tier: SeatTier,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRow {
    pub label: String,
    pub cells: Vec<SeatCell>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatGrid {
    pub columns: Vec<char>,
    pub rows: Vec<SeatRow>,
}

/// What the seat map passes on to the passenger forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatHandoff {
    pub flight: FlightSummary,
    pub selected_seats: Vec<Seat>,
}

/// Selection state of one browsing session on one flight.
///
/// Holds three invariants whatever the call sequence: booked seats are never
/// selected, a seat is selected at most once, and the selection never outgrows
/// the passenger count.
#[derive(Debug, Clone)]
pub struct SeatSelection {
    inventory: SeatInventory,
    selected: Vec<Seat>,
    passenger_count: u8,
    bounds: PassengerBounds,
    hold: HoldTimer,
}

impl SeatSelection {
    pub fn new(inventory: SeatInventory, bounds: PassengerBounds, hold: HoldTimer) -> Self {
        Self {
            inventory,
            selected: Vec::new(),
            passenger_count: bounds.min,
            bounds,
            hold,
        }
    }

    pub fn inventory(&self) -> &SeatInventory {
        &self.inventory
    }

    pub fn selected(&self) -> &[Seat] {
        &self.selected
    }

    pub fn passenger_count(&self) -> u8 {
        self.passenger_count
    }

    pub fn bounds(&self) -> PassengerBounds {
        self.bounds
    }

    pub fn hold(&self) -> &HoldTimer {
        &self.hold
    }

    pub fn is_selected(&self, seat_number: &SeatNumber) -> bool {
        self.selected.iter().any(|seat| &seat.seat_number == seat_number)
    }

    /// Clamps `requested` and clears the selection, even if it would still fit.
    pub fn set_passenger_count(&mut self, requested: i64) -> u8 {
        self.passenger_count = self.bounds.clamp(requested);
        self.selected.clear();
        self.passenger_count
    }

    pub fn toggle_seat(&mut self, seat_number: &SeatNumber) -> ToggleOutcome {
        if self.inventory.is_booked(seat_number) {
            return ToggleOutcome::IgnoredBooked;
        }

        let Some(seat) = self.inventory.find(seat_number) else {
            return ToggleOutcome::IgnoredUnknown;
        };

        if let Some(pos) = self.selected.iter().position(|s| &s.seat_number == seat_number) {
            self.selected.remove(pos);
            return ToggleOutcome::Deselected;
        }

        if self.selected.len() >= usize::from(self.passenger_count) {
            return ToggleOutcome::IgnoredAtCapacity;
        }

        self.selected.push(seat.clone());
        ToggleOutcome::Selected
    }

    /// Advances the hold by one second. On expiry the selection is dropped.
    ///
    /// Returns the state alongside the seats released by this tick, if any.
    pub fn tick(&mut self) -> (HoldState, Vec<Seat>) {
        match self.hold.tick() {
            HoldState::Expired => {
                let released = std::mem::take(&mut self.selected);
                debug!(
                    flight = %self.inventory.flight().id,
                    released = released.len(),
                    "Seat hold expired"
                );
                (HoldState::Expired, released)
            }
            running => (running, Vec::new()),
        }
    }

    pub fn total_cost(&self, fares: &FareSchedule) -> u32 {
        fares.total_cost(self.selected.iter().map(|seat| &seat.seat_number))
    }

    pub fn confirm(&self) -> CoreResult<SeatHandoff> {
        if self.selected.is_empty() {
            return Err(CoreError::EmptySelection);
        }

        Ok(SeatHandoff {
            flight: self.inventory.flight().clone(),
            selected_seats: self.selected.clone(),
        })
    }

    /// The fixed cabin layout with the state of each label.
    pub fn grid(&self) -> SeatGrid {
        let rows = ROW_LABELS
            .iter()
            .map(|row| SeatRow {
                label: row.to_string(),
                cells: COLUMN_LABELS
                    .iter()
                    .map(|column| {
                        let seat_number = SeatNumber::new(format!("{}{}", row, column));
                        let state = if self.inventory.is_booked(&seat_number) {
                            SeatState::Booked
                        } else if self.is_selected(&seat_number) {
                            SeatState::Selected
                        } else if self.inventory.find(&seat_number).is_some() {
                            SeatState::Available
                        } else {
                            SeatState::Unlisted
                        };
                        SeatCell {
                            tier: seat_number.tier(),
                            seat_number,
                            state,
                        }
                    })
                    .collect(),
            })
            .collect();

        SeatGrid { columns: COLUMN_LABELS.to_vec(), rows }
    }
}
