use serde::{Deserialize, Serialize};

use super::flight::ResourceId;
use crate::pii::Masked;

/// One passenger/seat pair of a `POST /reservations` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationEntry {
    pub seat_id: ResourceId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: String,
    pub national_id: Masked<String>,
    pub reserved_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservation {
    pub id: ResourceId,
    #[serde(default)]
    pub reservation_code: Option<String>,
}

/// Body of `POST /payment/checkout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub reservation_id: ResourceId,
    pub card_number: Masked<String>,
    pub expiry_date: String,
    pub cvv: Masked<String>,
}

/// An entry of `GET /reservations/my`. Fields the collaborator adds beyond
/// these are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSummary {
    pub id: ResourceId,
    #[serde(default)]
    pub reservation_code: Option<String>,
    #[serde(default)]
    pub seat: Option<SeatRef>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRef {
    pub seat_number: String,
}
