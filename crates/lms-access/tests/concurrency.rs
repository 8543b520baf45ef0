//! Overlapping operations against a gated store.
//!
//! The gate holds store calls open so a test can observe the coordinator
//! while an operation is genuinely in flight.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use lms_access::store::{AccessStore, StoreError};
use lms_access::{AccessApi, AccessError, OperationKey, StatusCode};
use lms_access_testkit::{admin, class, ScriptedStore, StoreOp};

use common::{coordinator, coordinator_with, fast_config};

#[tokio::test]
async fn test_duplicate_grant_rejected_while_pending() {
    let store = Arc::new(ScriptedStore::gated());
    let c = coordinator(&store);

    let first = tokio::spawn({
        let c = Arc::clone(&c);
        async move { c.grant_access(&admin("A1"), &class("C1")).await }
    });
    store.wait_entered(1).await;
    assert!(c.is_in_flight(&OperationKey::grant(admin("A1"), class("C1"))));

    let err = c.grant_access(&admin("A1"), &class("C1")).await.unwrap_err();
    assert!(err.is_concurrent());
    assert_eq!(err.code(), StatusCode::ConcurrentOperation);
    match err {
        AccessError::ConcurrentOperation(key) => {
            assert_eq!(key, OperationKey::grant(admin("A1"), class("C1")));
        }
        other => panic!("expected concurrent operation, got {:?}", other),
    }
    // Not confirmed yet.
    assert!(c.snapshot(&admin("A1")).is_empty());

    store.open();
    first.await.unwrap().unwrap();

    assert_eq!(store.count(StoreOp::Grant), 1);
    assert!(c.snapshot(&admin("A1")).contains(&class("C1")));
    assert!(c.in_flight().is_empty());
}

#[tokio::test]
async fn test_distinct_resources_proceed_in_parallel() {
    let store = Arc::new(ScriptedStore::gated());
    let c = coordinator(&store);

    let handles: Vec<_> = ["C1", "C2", "C3"]
        .into_iter()
        .map(|id| {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.grant_access(&admin("A1"), &class(id)).await })
        })
        .collect();

    store.wait_entered(3).await;
    assert_eq!(c.in_flight().len(), 3);

    store.open();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(c.snapshot(&admin("A1")).len(), 3);
}

#[tokio::test]
async fn test_revoke_all_holds_the_whole_principal() {
    let store = Arc::new(ScriptedStore::with_grants([(admin("A1"), class("C1"))]));
    let c = coordinator(&store);
    c.refresh(&admin("A1")).await.unwrap();
    store.hold();

    let wipe = tokio::spawn({
        let c = Arc::clone(&c);
        async move { c.revoke_all(&admin("A1")).await }
    });
    store.wait_entered(2).await;

    // Neither a grant nor a revoke on A1 slips in.
    let grant = c.grant_access(&admin("A1"), &class("C2")).await.unwrap_err();
    assert!(grant.is_concurrent());
    let revoke = c.revoke_access(&admin("A1"), &class("C1")).await.unwrap_err();
    assert!(revoke.is_concurrent());
    assert!(c.refresh(&admin("A1")).await.unwrap_err().is_concurrent());

    // Other principals are unaffected.
    let other = tokio::spawn({
        let c = Arc::clone(&c);
        async move { c.grant_access(&admin("A2"), &class("C1")).await }
    });
    store.wait_entered(3).await;

    store.open();
    wipe.await.unwrap().unwrap();
    other.await.unwrap().unwrap();

    assert!(c.snapshot(&admin("A1")).is_empty());
    assert_eq!(c.snapshot(&admin("A2")), BTreeSet::from([class("C1")]));
    assert_eq!(store.count(StoreOp::Grant), 1);
    assert_eq!(store.count(StoreOp::Revoke), 0);
}

#[tokio::test]
async fn test_pending_grant_blocks_revoke_all() {
    let store = Arc::new(ScriptedStore::gated());
    let c = coordinator(&store);

    let grant = tokio::spawn({
        let c = Arc::clone(&c);
        async move { c.grant_access(&admin("A1"), &class("C1")).await }
    });
    store.wait_entered(1).await;

    let err = c.revoke_all(&admin("A1")).await.unwrap_err();
    assert!(err.is_concurrent());
    assert_eq!(err.to_string(), "operation already in flight: revoke_all(A1, *)");

    store.open();
    grant.await.unwrap().unwrap();

    c.revoke_all(&admin("A1")).await.unwrap();
    assert!(c.snapshot(&admin("A1")).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_store_timeout_releases_claim() {
    let store = Arc::new(ScriptedStore::gated());
    let c = coordinator_with(&store, fast_config());

    let err = c.grant_access(&admin("A1"), &class("C1")).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(err.is_retryable());
    assert_eq!(err.code().as_u8(), 3);
    assert!(c.in_flight().is_empty());
    assert!(c.snapshot(&admin("A1")).is_empty());
    assert_eq!(store.inner().grant_count().unwrap(), 0);

    // A retry is admitted straight away.
    store.open();
    c.grant_access(&admin("A1"), &class("C1")).await.unwrap();
    assert_eq!(store.inner().grant_count().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_revoke_all_times_out_and_keeps_grants() {
    let store = Arc::new(ScriptedStore::with_grants([
        (admin("A1"), class("C1")),
        (admin("A1"), class("C2")),
    ]));
    let c = coordinator_with(&store, fast_config());
    c.refresh(&admin("A1")).await.unwrap();
    store.hold();

    let err = c.revoke_all(&admin("A1")).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(c.snapshot(&admin("A1")).len(), 2);
    assert!(!c.is_in_flight(&OperationKey::revoke_all(admin("A1"))));
}

#[tokio::test]
async fn test_aborted_operation_releases_claim() {
    let store = Arc::new(ScriptedStore::gated());
    let c = coordinator(&store);

    let pending = tokio::spawn({
        let c = Arc::clone(&c);
        async move { c.revoke_all(&admin("A1")).await }
    });
    store.wait_entered(1).await;
    assert_eq!(c.in_flight(), vec![OperationKey::revoke_all(admin("A1"))]);

    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());
    assert!(c.in_flight().is_empty());

    store.open();
    c.grant_access(&admin("A1"), &class("C1")).await.unwrap();
}

#[tokio::test]
async fn test_api_reports_concurrent_code() {
    let store = Arc::new(ScriptedStore::gated());
    let api = AccessApi::new(coordinator(&store));

    let first = tokio::spawn({
        let api = api.clone();
        async move { api.grant("A1", "C1").await }
    });
    store.wait_entered(1).await;

    let second = api.grant("A1", "C1").await;
    assert!(!second.is_ok());
    assert_eq!(second.code, StatusCode::ConcurrentOperation);

    let json = serde_json::to_value(&second).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], 2);

    store.open();
    assert!(first.await.unwrap().is_ok());
    assert_eq!(
        serde_json::to_value(api.snapshot("A1")).unwrap(),
        serde_json::json!({ "resourceIds": ["C1"] })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_grants_reach_store_once() {
    let store = Arc::new(ScriptedStore::new().with_latency(Duration::from_millis(20)));
    let c = coordinator(&store);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.grant_access(&admin("A1"), &class("C2")).await })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => granted += 1,
            // Losers either overlapped the winner or arrived after it confirmed.
            Err(e) => assert!(e.is_concurrent() || e.is_conflict(), "unexpected: {}", e),
        }
    }

    assert_eq!(granted, 1);
    assert_eq!(store.count(StoreOp::Grant), 1);
    assert_eq!(c.snapshot(&admin("A1")), BTreeSet::from([class("C2")]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_jittered_workload_keeps_registry_and_store_in_step() {
    let store = Arc::new(ScriptedStore::new().with_jitter(Duration::from_millis(5)));
    let c = coordinator(&store);
    let admins = ["A1", "A2", "A3"];
    let classes = ["C1", "C2", "C3"];

    for round in 0..4 {
        let mut handles = Vec::new();
        for (i, a) in admins.iter().enumerate() {
            for (j, r) in classes.iter().enumerate() {
                let c = Arc::clone(&c);
                let (a, r) = (admin(a), class(r));
                let pick = (round + i + j) % 4;
                handles.push(tokio::spawn(async move {
                    match pick {
                        0 | 1 => c.grant_access(&a, &r).await,
                        2 => c.revoke_access(&a, &r).await,
                        _ => c.revoke_all(&a).await,
                    }
                }));
            }
        }
        for handle in handles {
            if let Err(e) = handle.await.unwrap() {
                assert_ne!(e.code(), StatusCode::Remote, "unexpected: {}", e);
            }
        }
    }

    assert!(c.in_flight().is_empty());
    for a in admins {
        let listed = store.inner().list_grants(&admin(a)).await.unwrap();
        assert_eq!(c.snapshot(&admin(a)), listed, "diverged for {}", a);
    }
}

#[tokio::test]
async fn test_failure_during_overlap_leaves_other_principal_alone() {
    let store = Arc::new(ScriptedStore::gated());
    let c = coordinator(&store);
    store.fail_next(StoreOp::RevokeAll, StoreError::Unavailable("connection reset".into()));

    let wipe = tokio::spawn({
        let c = Arc::clone(&c);
        async move { c.revoke_all(&admin("A1")).await }
    });
    let grant = tokio::spawn({
        let c = Arc::clone(&c);
        async move { c.grant_access(&admin("A2"), &class("C3")).await }
    });
    store.wait_entered(2).await;
    store.open();

    assert_eq!(wipe.await.unwrap().unwrap_err().code(), StatusCode::Remote);
    grant.await.unwrap().unwrap();

    assert_eq!(c.snapshot(&admin("A2")), BTreeSet::from([class("C3")]));
    assert!(c.in_flight().is_empty());
}
