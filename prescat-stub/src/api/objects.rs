//! `objects` endpoints: records, checksums, files, diffs and moab checks.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::{get, post},
};
use bytes::Bytes;
use prescat_sdk::objects::{
    ChecksumFormat, DRUID_PREFIX, DiffSubset, FileCategory, FileChecksum, PreservedObject,
};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::ApiError;
use super::extractors::BearerAuth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/objects/checksums", post(checksums))
        .route("/objects/{druid}", get(object))
        .route("/objects/{druid}/checksum", get(checksum))
        .route("/objects/{druid}/file", get(file))
        .route("/objects/{druid}/content_diff", post(content_diff))
        .route(
            "/objects/{druid}/primary_moab_location",
            get(primary_moab_location),
        )
        .route("/objects/{druid}/validate_moab", get(validate_moab))
}

/// `GET objects/{druid}` and `GET objects/{druid}.json`.
async fn object(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(druid): Path<String>,
) -> Result<Json<PreservedObject>, ApiError> {
    let druid = druid.strip_suffix(".json").unwrap_or(&druid);
    let store = state.store().await;
    Ok(Json(store.get(druid)?.record()))
}

#[derive(Debug, Deserialize)]
struct ChecksumsRequest {
    #[serde(default)]
    druids: Vec<String>,
    #[serde(default)]
    format: ChecksumFormat,
}

const CSV_HEADER: &str = "druid,filename,md5,sha1,sha256,filesize";

/// `POST objects/checksums` – checksums for many objects, as CSV (default)
/// or JSON keyed by druid.
async fn checksums(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Json(request): Json<ChecksumsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.druids.is_empty() {
        return Err(ApiError::BadRequest("no druids given".to_string()));
    }
    let store = state.store().await;
    let found = store.checksums(&request.druids)?;

    match request.format {
        ChecksumFormat::Csv => {
            let mut csv = String::from(CSV_HEADER);
            csv.push('\n');
            for (druid, files) in &found {
                for file in files.iter() {
                    csv.push_str(&csv_row(druid, file));
                    csv.push('\n');
                }
            }
            Ok(([(CONTENT_TYPE, "text/csv")], csv).into_response())
        }
        ChecksumFormat::Json => {
            let keyed: BTreeMap<String, &[FileChecksum]> = found
                .into_iter()
                .map(|(druid, files)| (format!("{DRUID_PREFIX}{druid}"), files))
                .collect();
            Ok(Json(keyed).into_response())
        }
    }
}

fn csv_row(druid: &str, file: &FileChecksum) -> String {
    format!(
        "{DRUID_PREFIX}{druid},{},{},{},{},{}",
        file.filename, file.md5, file.sha1, file.sha256, file.filesize
    )
}

/// `GET objects/{druid}/checksum`
async fn checksum(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(druid): Path<String>,
) -> Result<Json<Vec<FileChecksum>>, ApiError> {
    let store = state.store().await;
    Ok(Json(store.get(&druid)?.checksums.clone()))
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    category: FileCategory,
    filepath: String,
    version: Option<u64>,
}

/// `GET objects/{druid}/file?category=..&filepath=..[&version=..]`
async fn file(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(druid): Path<String>,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store().await;
    let contents = store.file(&druid, query.category, &query.filepath, query.version)?;
    Ok((
        [(CONTENT_TYPE, "application/octet-stream")],
        Bytes::copy_from_slice(contents),
    ))
}

#[derive(Debug, Deserialize)]
struct ContentDiffRequest {
    content_metadata: String,
    #[serde(default)]
    subset: DiffSubset,
    #[serde(default)]
    version: Option<u64>,
}

/// `POST objects/{druid}/content_diff` – an (always empty) inventory
/// difference report.
async fn content_diff(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(druid): Path<String>,
    Json(request): Json<ContentDiffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subset = request.subset.as_str();
    if request.content_metadata.trim().is_empty() {
        return Err(ApiError::BadRequest("content_metadata is empty".to_string()));
    }

    let store = state.store().await;
    let object = store.get(&druid)?;
    let version = request.version.unwrap_or(object.current_version);
    if version > object.current_version {
        return Err(ApiError::BadRequest(format!(
            "version {version} is above current version {}",
            object.current_version
        )));
    }

    let report = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<fileInventoryDifference objectId="druid:{}" differenceCount="0" basis="v{version}" other="new-contentMetadata-{subset}"/>
"#,
        object.druid
    );
    Ok(([(CONTENT_TYPE, "application/xml")], report))
}

/// `GET objects/{druid}/primary_moab_location`
async fn primary_moab_location(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(druid): Path<String>,
) -> Result<String, ApiError> {
    let store = state.store().await;
    Ok(store.get(&druid)?.storage_location.clone())
}

/// `GET objects/{druid}/validate_moab`
async fn validate_moab(
    _auth: BearerAuth,
    State(state): State<AppState>,
    Path(druid): Path<String>,
) -> Result<&'static str, ApiError> {
    state.store().await.validate(&druid)?;
    tracing::info!(druid, "Moab validation queued");
    Ok("ok")
}
