//! HTTP handlers for the catalog API.
//!
//! All routes here sit behind [`extractors::BearerAuth`] and are mounted
//! under the configured API version by [`crate::server::build_router`].

pub mod catalog;
pub mod extractors;
pub mod objects;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::store::StoreError;

/// All API routes, without the version prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(objects::router())
        .merge(catalog::router())
}

/// Error returned from API handlers. The body is the plain-text message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Locked(_)) => StatusCode::LOCKED,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Invalid(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, error = %self, "Request refused");
        (status, self.to_string()).into_response()
    }
}
