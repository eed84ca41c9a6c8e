mod common;

use std::sync::Arc;

use prescat_sdk::{ErrorKind, configure, default_client};

// The default slot is process-wide, so everything touching it lives in one
// test to keep the steps ordered.
#[tokio::test]
async fn test_default_client_lifecycle() {
    let err = default_client().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.message(), "url has not yet been configured");

    let first_addr = common::spawn_stub(None).await;
    let first = configure(common::config(first_addr)).unwrap();
    assert!(Arc::ptr_eq(&first, &default_client().unwrap()));
    assert_eq!(
        default_client()
            .unwrap()
            .objects()
            .current_version(common::DRUID)
            .await
            .unwrap(),
        3
    );

    // Reconfiguring swaps the whole client; holders of the old one keep it.
    let second_addr = common::spawn_stub(None).await;
    let second = configure(common::config(second_addr).with_api_version("")).unwrap();
    let current = default_client().unwrap();
    assert!(Arc::ptr_eq(&second, &current));
    assert!(!Arc::ptr_eq(&first, &current));
    assert_eq!(current.config().api_version, "");
    assert_eq!(first.config().api_version, "v1");
    assert_eq!(first.objects().current_version(common::DRUID).await.unwrap(), 3);
}
