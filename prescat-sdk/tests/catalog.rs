mod common;

use std::sync::{Arc, Mutex};

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use common::{DRUID, LOCKED_DRUID};
use prescat_sdk::objects::CatalogUpdate;
use prescat_sdk::{ClientError, ErrorKind};
use prescat_stub::AppState;

type Log = Arc<Mutex<Vec<String>>>;

async fn record(State(log): State<Log>, request: Request, next: Next) -> Response {
    log.lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

/// Stub catalog that also records every request line it receives.
async fn recording_stub() -> (std::net::SocketAddr, Log) {
    let log = Log::default();
    let state = AppState::new(common::fixture_store(), None);
    let router = prescat_stub::build_router(state, "v1")
        .layer(middleware::from_fn_with_state(log.clone(), record));
    (common::spawn(router).await, log)
}

#[tokio::test]
async fn test_first_version_is_posted_without_lookup() {
    let (addr, log) = recording_stub().await;
    let client = common::client(addr);

    client
        .catalog()
        .update("druid:cd123ef4567", 1, 2342, "/services-disk01/sdr2objects")
        .await
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["POST /v1/catalog".to_string()]);

    assert_eq!(
        client.objects().current_version("druid:cd123ef4567").await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_later_version_is_patched() {
    let (addr, log) = recording_stub().await;
    let client = common::client(addr);

    client
        .catalog()
        .update(DRUID, 4, 4096, "/services-disk02/sdr2objects")
        .await
        .unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["PATCH /v1/catalog/bj102hs9687".to_string()]
    );
    assert_eq!(client.objects().current_version(DRUID).await.unwrap(), 4);
}

#[tokio::test]
async fn test_stale_version_conflicts() {
    let (addr, _) = recording_stub().await;
    let err = common::client(addr)
        .catalog()
        .update(DRUID, 3, 4096, "/services-disk02/sdr2objects")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Conflict(_)));
    assert!(err.message().starts_with("PreservationClient.update for druid:bj102hs9687 got Conflict (409)"));
}

#[tokio::test]
async fn test_existing_object_cannot_be_registered_again() {
    let (addr, _) = recording_stub().await;
    let err = common::client(addr)
        .catalog()
        .submit(&CatalogUpdate::new(DRUID, 1, 10, "/services-disk02/sdr2objects"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_locked_and_unknown_objects() {
    let (addr, _) = recording_stub().await;
    let client = common::client(addr);

    let err = client
        .catalog()
        .update(LOCKED_DRUID, 2, 10, "/services-disk03/sdr2objects")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Locked);

    let err = client
        .catalog()
        .update("druid:xx000xx0000", 2, 10, "/services-disk03/sdr2objects")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_dot_segment_druids_never_reach_the_catalog() {
    let (addr, log) = recording_stub().await;
    let client = common::client(addr);

    let err = client
        .catalog()
        .update("..", 2, 10, "/services-disk03/sdr2objects")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    for druid in [".", "..", "druid:%2e%2e"] {
        let err = client
            .objects()
            .primary_moab_location(druid)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration, "{druid:?}");
    }
    assert!(log.lock().unwrap().is_empty());
}
