use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pushed to subscribers of a seat session's hold stream.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HoldEvent {
    pub session_id: Uuid,
    pub kind: HoldEventKind,
    pub emitted_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum HoldEventKind {
    Tick { seconds_remaining: u32 },
    /// The hold ran out; the listed seats were released and the countdown restarted.
    Expired { released_seats: Vec<String>, seconds_remaining: u32 },
}

impl HoldEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            HoldEventKind::Tick { .. } => "tick",
            HoldEventKind::Expired { .. } => "expired",
        }
    }
}
