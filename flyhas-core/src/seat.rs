use serde::{Deserialize, Serialize};
use std::fmt;

use flyhas_shared::{ResourceId, SeatRecord};

/// Row labels of the cabin layout, front to back.
pub const ROW_LABELS: [&str; 6] = ["1", "2", "3", "4", "5", "6"];
pub const COLUMN_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Row whose seats are sold at the premium rate.
const PREMIUM_ROW: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatTier {
    Premium,
    Standard,
}

/// Seat label in `<row><column>` form, e.g. `1A` or `6F`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatNumber(String);

impl SeatNumber {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading digits of the label. Empty when the label does not start with a digit.
    pub fn row_label(&self) -> &str {
        let end = self
            .0
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    pub fn column(&self) -> Option<char> {
        self.0[self.row_label().len()..].chars().next()
    }

    /// Tier is never stored; it always follows from the row label.
    pub fn tier(&self) -> SeatTier {
        if self.row_label() == PREMIUM_ROW {
            SeatTier::Premium
        } else {
            SeatTier::Standard
        }
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeatNumber {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A seat of one flight's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: ResourceId,
    pub seat_number: SeatNumber,
    #[serde(default)]
    pub reserved: bool,
}

impl Seat {
    pub fn tier(&self) -> SeatTier {
        self.seat_number.tier()
    }
}

impl From<SeatRecord> for Seat {
    fn from(record: SeatRecord) -> Self {
        Self {
            id: record.id,
            seat_number: SeatNumber::new(record.seat_number),
            reserved: record.reserved,
        }
    }
}

/// Every label of the fixed cabin layout, row by row.
pub fn cabin_layout() -> impl Iterator<Item = SeatNumber> {
    ROW_LABELS.iter().flat_map(|row| {
        COLUMN_LABELS
            .iter()
            .map(move |column| SeatNumber::new(format!("{}{}", row, column)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_row_is_premium() {
        assert_eq!(SeatNumber::from("1A").tier(), SeatTier::Premium);
        assert_eq!(SeatNumber::from("1F").tier(), SeatTier::Premium);
        assert_eq!(SeatNumber::from("2A").tier(), SeatTier::Standard);
        assert_eq!(SeatNumber::from("6C").tier(), SeatTier::Standard);
    }

    #[test]
    fn test_row_label_uses_all_leading_digits() {
        let seat = SeatNumber::from("12C");
        assert_eq!(seat.row_label(), "12");
        assert_eq!(seat.column(), Some('C'));
        assert_eq!(seat.tier(), SeatTier::Standard);

        assert_eq!(SeatNumber::from("A1").row_label(), "");
    }

    #[test]
    fn test_cabin_layout_covers_grid() {
        let labels: Vec<SeatNumber> = cabin_layout().collect();
        assert_eq!(labels.len(), 36);
        assert_eq!(labels[0].as_str(), "1A");
        assert_eq!(labels[35].as_str(), "6F");
    }
}
