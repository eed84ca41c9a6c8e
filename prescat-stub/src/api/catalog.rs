//! `catalog` endpoints: registering objects and recording new versions.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
};

use prescat_sdk::objects::{CatalogUpdate, PreservedObject};

use super::ApiError;
use super::extractors::BearerAuth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", post(create))
        .route("/catalog/{druid}", patch(update))
}

/// `POST catalog` – register a new object. 409 if it already exists.
async fn create(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Json(update): Json<CatalogUpdate>,
) -> Result<(StatusCode, Json<PreservedObject>), ApiError> {
    let mut store = state.store.write().await;
    let object = store.create(update)?;
    tracing::info!(
        druid = %object.druid,
        version = object.current_version,
        "Object registered"
    );
    Ok((StatusCode::CREATED, Json(object.record())))
}

/// `PATCH catalog/{druid}` – record a new version.
async fn update(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(druid): Path<String>,
    Json(update): Json<CatalogUpdate>,
) -> Result<Json<PreservedObject>, ApiError> {
    let mut store = state.store.write().await;
    let object = store.update(&druid, update)?;
    tracing::info!(
        druid = %object.druid,
        version = object.current_version,
        "Object version recorded"
    );
    Ok(Json(object.record()))
}
