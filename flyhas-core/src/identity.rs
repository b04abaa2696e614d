use serde::{Deserialize, Serialize};

/// Who is booking. Passed into checkout explicitly rather than read from
/// ambient session storage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub subject: Option<String>,
    pub email: Option<String>,
}

impl SessionIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(subject: impl Into<String>, email: Option<String>) -> Self {
        Self { subject: Some(subject.into()), email }
    }

    pub fn is_anonymous(&self) -> bool {
        self.subject.is_none()
    }

    /// Value for the `reservedBy` field. Empty for anonymous checkouts.
    pub fn reserved_by(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }
}
