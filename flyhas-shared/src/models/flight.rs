use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier handed out by the collaborator API.
///
/// The backend uses numeric keys today, but nothing here depends on that, so
/// string identifiers are accepted as well and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Numeric(id) => write!(f, "{}", id),
            ResourceId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Numeric(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => ResourceId::Numeric(n),
            Err(_) => ResourceId::Text(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// A flight as listed by `GET /flights/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSummary {
    pub id: ResourceId,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub departure_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub arrival_time: Option<NaiveDateTime>,
}

/// `GET /flights/{id}`: the summary plus its seat inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDetail {
    #[serde(flatten)]
    pub flight: FlightSummary,
    #[serde(default)]
    pub seats: Vec<SeatRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecord {
    pub id: ResourceId,
    pub seat_number: String,
    #[serde(default)]
    pub reserved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_detail_deserialization() {
        let json = r#"
            {
                "id": 42,
                "origin": "Istanbul",
                "destination": "Ankara",
                "departureTime": "2025-04-25T09:30:00",
                "arrivalTime": "2025-04-25T10:45:00",
                "seats": [
                    { "id": 1, "seatNumber": "1A", "reserved": true },
                    { "id": "s-2", "seatNumber": "1B", "reserved": false }
                ]
            }
        "#;
        let detail: FlightDetail = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(detail.flight.id, ResourceId::Numeric(42));
        assert_eq!(detail.flight.origin, "Istanbul");
        assert_eq!(detail.seats.len(), 2);
        assert!(detail.seats[0].reserved);
        assert_eq!(detail.seats[1].id, ResourceId::Text("s-2".to_string()));
    }

    #[test]
    fn test_flight_without_seats_defaults_to_empty() {
        let json = r#"{ "id": 7, "origin": "Izmir", "destination": "Antalya" }"#;
        let detail: FlightDetail = serde_json::from_str(json).unwrap();
        assert!(detail.seats.is_empty());
        assert!(detail.flight.departure_time.is_none());
    }

    #[test]
    fn test_resource_id_from_path_segment() {
        assert_eq!(ResourceId::from("17"), ResourceId::Numeric(17));
        assert_eq!(ResourceId::from("TK-17"), ResourceId::Text("TK-17".to_string()));
        assert_eq!(ResourceId::Numeric(17).to_string(), "17");
    }
}
