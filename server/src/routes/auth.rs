//! Caregiver authorization
//!
//! Caregiver-only endpoints take a [`Caregiver`] argument. The PIN travels in
//! the `x-caregiver-pin` header and is checked against the stored Argon2
//! hash. Without a stored PIN every request is treated as a caregiver.

use super::SharedState;
use crate::error::AppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const CAREGIVER_PIN_HEADER: &str = "x-caregiver-pin";
pub const CAREGIVER_NAME_HEADER: &str = "x-caregiver-name";

const DEFAULT_CAREGIVER_NAME: &str = "caregiver";
const MAX_CAREGIVER_NAME_LENGTH: usize = 50;

/// A request that carried a valid caregiver PIN
#[derive(Debug, Clone)]
pub struct Caregiver {
    /// Recorded as `created_by` on ledger rows
    pub name: String,
}

#[axum::async_trait]
impl FromRequestParts<SharedState> for Caregiver {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let pin = parts
            .headers
            .get(CAREGIVER_PIN_HEADER)
            .and_then(|v| v.to_str().ok());

        if !state.settings.verify_caregiver_pin(pin).await? {
            tracing::warn!("Rejected caregiver request to {}", parts.uri.path());
            return Err(AppError::Unauthorized);
        }

        let name = parts
            .headers
            .get(CAREGIVER_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| n.chars().take(MAX_CAREGIVER_NAME_LENGTH).collect())
            .unwrap_or_else(|| DEFAULT_CAREGIVER_NAME.to_string());

        Ok(Caregiver { name })
    }
}
