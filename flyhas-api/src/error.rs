use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error;

use flyhas_core::{CheckoutError, CoreError};
use flyhas_store::ApiClientError;

/// What users see when a collaborator call fails. No retry is attempted.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(String),
    /// Per-field problems, reported all at once.
    FieldErrors {
        message: String,
        fields: serde_json::Value,
    },
    NotFoundError(String),
    ConflictError(String),
    UpstreamError(String),
    InternalServerError(String),
}

impl AppError {
    /// Maps a collaborator failure. A 404 upstream stays a 404; anything else
    /// is reported generically.
    pub fn collaborator(err: Box<dyn Error + Send + Sync>, what: &str) -> Self {
        if let Some(api_err) = err.downcast_ref::<ApiClientError>() {
            if api_err.status() == Some(StatusCode::NOT_FOUND) {
                return AppError::NotFoundError(format!("{} not found", what));
            }
        }
        AppError::UpstreamError(format!("{}: {}", what, err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::FieldErrors { message, fields } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "fields": fields }),
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::UpstreamError(msg) => {
                tracing::error!("Collaborator call failed: {}", msg);
                (StatusCode::BAD_GATEWAY, json!({ "error": GENERIC_FAILURE }))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal Server Error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PassengerValidation(errors) => AppError::FieldErrors {
                message: err_message(errors.invalid_count()),
                fields: json!({ "passengers": errors }),
            },
            CoreError::EmptySelection => AppError::ValidationError(err.to_string()),
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
        }
    }
}

fn err_message(invalid: usize) -> String {
    match invalid {
        1 => "1 passenger has invalid details".to_string(),
        n => format!("{} passengers have invalid details", n),
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidCard(errors) => AppError::FieldErrors {
                message: "Card details are invalid".to_string(),
                fields: json!({ "card": errors }),
            },
            CheckoutError::InvalidPassengers(errors) => AppError::FieldErrors {
                message: err_message(errors.invalid_count()),
                fields: json!({ "passengers": errors }),
            },
            CheckoutError::SeatPassengerMismatch { .. } | CheckoutError::NoSeats => {
                AppError::ValidationError(err.to_string())
            }
            CheckoutError::ReservationFailed(_) | CheckoutError::PaymentFailed { .. } => {
                AppError::UpstreamError(err.to_string())
            }
        }
    }
}

impl From<prometheus::Error> for AppError {
    fn from(err: prometheus::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
