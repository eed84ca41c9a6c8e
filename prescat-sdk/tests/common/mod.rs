#![allow(dead_code)]

use std::net::SocketAddr;

use axum::Router;
use prescat_sdk::objects::{FileCategory, FileChecksum};
use prescat_sdk::{ClientConfig, PreservationClient};
use prescat_stub::{AppState, CatalogStore, StoredObject};
use tokio::net::TcpListener;

pub const DRUID: &str = "druid:bj102hs9687";
pub const LOCKED_DRUID: &str = "druid:zz999zz9999";
pub const SIGNATURE_CATALOG: &str =
    r#"<signatureCatalog objectId="druid:bj102hs9687" versionId="3"/>"#;

/// Serve `router` on an ephemeral local port for the rest of the test.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        prescat_stub::serve(listener, router, std::future::pending())
            .await
            .unwrap();
    });
    addr
}

pub fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(&format!("http://{addr}")).unwrap()
}

pub fn client(addr: SocketAddr) -> PreservationClient {
    PreservationClient::new(config(addr)).unwrap()
}

pub fn fixture_store() -> CatalogStore {
    let mut store = CatalogStore::new();
    store.insert(
        StoredObject::new(DRUID, 3, 1024, "/services-disk02/sdr2objects")
            .with_file(
                FileCategory::Manifest,
                "signatureCatalog.xml",
                3,
                SIGNATURE_CATALOG,
            )
            .with_file(
                FileCategory::Content,
                "eric-smith-dissertation.pdf",
                3,
                "%PDF-1.4 v3",
            )
            .with_file(
                FileCategory::Content,
                "eric-smith-dissertation.pdf",
                1,
                "%PDF-1.4 v1",
            )
            .with_file(FileCategory::Metadata, "descMetadata.xml", 3, "<mods/>")
            .with_checksum(FileChecksum {
                filename: "eric-smith-dissertation.pdf".to_string(),
                md5: "aead2f6f734355c59af2d5b2689e4fb3".to_string(),
                sha1: "22dc6464e25dc9a7d600b1de6e3848bf63970595".to_string(),
                sha256: "e49957d53fb2a46e3652f4d399bd14d019600cf496b98d11ebcdf2d10a8ffd2f"
                    .to_string(),
                filesize: 1000217,
            }),
    );
    store.insert(
        StoredObject::new(LOCKED_DRUID, 1, 10, "/services-disk03/sdr2objects").locked(true),
    );
    store
}

/// A stub catalog serving [`fixture_store`] under `/v1`.
pub async fn spawn_stub(token: Option<&str>) -> SocketAddr {
    let state = AppState::new(fixture_store(), token.map(str::to_string));
    spawn(prescat_stub::build_router(state, "v1")).await
}

/// Parser that keeps the document as text.
pub fn utf8(bytes: &[u8]) -> Result<String, std::str::Utf8Error> {
    std::str::from_utf8(bytes).map(str::to_owned)
}
