//! Custom Axum extractors for request authentication.
//!
//! Provides `BearerAuth`, which checks the `Authorization: Bearer` header
//! against the token the server was configured with. Servers without a
//! token accept every request.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Marker extractor for an authenticated API request.
pub struct BearerAuth;

/// Errors returned by the [`BearerAuth`] extractor.
#[derive(Debug, thiserror::Error)]
pub enum BearerAuthError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("invalid Authorization header format")]
    InvalidHeader,
    #[error("invalid bearer token")]
    WrongToken,
}

impl IntoResponse for BearerAuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = BearerAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.token.as_deref() else {
            return Ok(BearerAuth);
        };

        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(BearerAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| BearerAuthError::InvalidHeader)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(BearerAuthError::InvalidHeader)?;

        if token.trim() != expected {
            tracing::debug!("Rejected request with wrong bearer token");
            return Err(BearerAuthError::WrongToken);
        }
        Ok(BearerAuth)
    }
}
