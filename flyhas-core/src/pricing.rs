use serde::{Deserialize, Serialize};

use crate::seat::{SeatNumber, SeatTier};

/// Fixed fares. These are configuration, not backend pricing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareSchedule {
    pub base_fare: u32,
    pub premium_seat_rate: u32,
    pub economy_seat_rate: u32,
    pub currency: String,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            base_fare: 65,
            premium_seat_rate: 25,
            economy_seat_rate: 11,
            currency: "GBP".to_string(),
        }
    }
}

impl FareSchedule {
    pub fn seat_rate(&self, tier: SeatTier) -> u32 {
        match tier {
            SeatTier::Premium => self.premium_seat_rate,
            SeatTier::Standard => self.economy_seat_rate,
        }
    }

    /// Base fare plus the tier rate of every seat.
    ///
    /// The seat map and checkout both price through here so the two totals
    /// shown to the user cannot drift apart.
    pub fn total_cost<'a, I>(&self, seats: I) -> u32
    where
        I: IntoIterator<Item = &'a SeatNumber>,
    {
        seats
            .into_iter()
            .fold(self.base_fare, |total, seat| total + self.seat_rate(seat.tier()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_costs_base_fare() {
        let fares = FareSchedule::default();
        assert_eq!(fares.total_cost(std::iter::empty()), 65);
    }

    #[test]
    fn test_tier_rates() {
        let fares = FareSchedule::default();
        assert_eq!(fares.total_cost([&SeatNumber::from("1A")]), 90);
        assert_eq!(fares.total_cost([&SeatNumber::from("3C")]), 76);

        let mixed = [SeatNumber::from("1A"), SeatNumber::from("1B"), SeatNumber::from("4F")];
        assert_eq!(fares.total_cost(mixed.iter()), 65 + 25 + 25 + 11);
    }

    #[test]
    fn test_custom_schedule() {
        let fares = FareSchedule {
            base_fare: 100,
            premium_seat_rate: 40,
            economy_seat_rate: 0,
            currency: "EUR".to_string(),
        };
        let seats = [SeatNumber::from("1C"), SeatNumber::from("2C")];
        assert_eq!(fares.total_cost(seats.iter()), 140);
    }
}
