use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use flyhas_core::identity::SessionIdentity;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomerClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

pub fn decode_claims(token: &str, secret: &str) -> Result<CustomerClaims, jsonwebtoken::errors::Error> {
    decode::<CustomerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Whoever is calling. A missing Authorization header means an anonymous
/// caller; a present but invalid one is rejected.
#[derive(Debug, Clone)]
pub struct Identity(pub SessionIdentity);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(Identity(SessionIdentity::anonymous()));
        }

        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| AppError::AuthenticationError("Expected a Bearer token".to_string()))?;

        let claims = decode_claims(bearer.token(), &state.auth.secret).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::AuthenticationError("Invalid or expired token".to_string())
        })?;

        Ok(Identity(SessionIdentity::authenticated(claims.sub, claims.email)))
    }
}

/// A signed-in caller with an email on their token.
#[derive(Debug, Clone)]
pub struct SignedInCustomer {
    pub subject: String,
    pub email: String,
}

impl FromRequestParts<AppState> for SignedInCustomer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Identity(identity) = Identity::from_request_parts(parts, state).await?;
        match (identity.subject, identity.email) {
            (Some(subject), Some(email)) => Ok(SignedInCustomer { subject, email }),
            _ => Err(AppError::AuthenticationError("Sign in to view reservations".to_string())),
        }
    }
}
