//! Store failures surface as typed errors and no snapshot is built.

use integration_tests::{
    fixtures,
    mocks::{Failure, FailingStore},
    setup,
};
use metrics_core::{Error, Snapshot};

#[tokio::test]
async fn test_unavailable_store_is_fatal() {
    setup::init_test_tracing();
    let store = FailingStore::new(Failure::Unavailable, fixtures::users());

    let err = Snapshot::load(&store).await.unwrap_err();
    assert!(matches!(err, Error::StorageUnavailable { backend: "mock", .. }));
    assert_eq!(err.error_code(), "STORE_001");
    assert!(err.is_fatal());
    // No retry after the first failure
    assert_eq!(store.reads(), 1);
}

#[tokio::test]
async fn test_schema_mismatch_names_the_column() {
    setup::init_test_tracing();
    let store = FailingStore::new(Failure::BadEventsSchema, fixtures::users());

    let err = Snapshot::load(&store).await.unwrap_err();
    match &err {
        Error::SchemaMismatch { table, column, .. } => {
            assert_eq!(table, "events");
            assert_eq!(column, "timestamp");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.error_code(), "SCHEMA_001");
    assert!(err.to_string().contains("events.timestamp"));
    assert_eq!(store.reads(), 2);
}
