use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use flyhas_shared::{Masked, PaymentRequest, ResourceId};

/// Card details typed into the checkout form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    #[serde(default)]
    pub card_number: Masked<String>,
    /// `MM/YY`.
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: Masked<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CardField {
    CardNumber,
    ExpiryDate,
    Cvv,
}

pub type CardErrors = BTreeMap<CardField, &'static str>;

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

impl CardDetails {
    /// Local checks only. Nothing is sent anywhere until these pass.
    pub fn validate(&self, today: NaiveDate) -> Result<(), CardErrors> {
        let mut errors = CardErrors::new();

        if !all_digits(self.card_number.expose(), 16) {
            errors.insert(CardField::CardNumber, "Must be 16 digits");
        }

        if let Some(message) = expiry_error(&self.expiry_date, today) {
            errors.insert(CardField::ExpiryDate, message);
        }

        if !all_digits(self.cvv.expose(), 3) {
            errors.insert(CardField::Cvv, "Must be 3 digits");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn payment_for(&self, reservation_id: ResourceId) -> PaymentRequest {
        PaymentRequest {
            reservation_id,
            card_number: self.card_number.clone(),
            expiry_date: self.expiry_date.clone(),
            cvv: self.cvv.clone(),
        }
    }
}

/// A card stays valid through its expiry month.
fn expiry_error(expiry: &str, today: NaiveDate) -> Option<&'static str> {
    let Some((mm, yy)) = expiry.split_once('/') else {
        return Some("MM/YY format required");
    };
    if !all_digits(mm, 2) || !all_digits(yy, 2) {
        return Some("MM/YY format required");
    }

    let month: u32 = mm.parse().ok()?;
    let year: i32 = yy.parse().ok()?;
    let current_year = today.year() % 100;
    let current_month = today.month();

    if !(1..=12).contains(&month) {
        Some("Invalid month")
    } else if year < current_year || (year == current_year && month < current_month) {
        Some("Card expired")
    } else {
        None
    }
}

/// Opaque payment collaborator.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn checkout(
        &self,
        payment: &PaymentRequest,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
