use chunk_router_rs::{HttpMethod, Router, RouterError};
use std::sync::Arc;
use std::thread;

#[test]
fn router_when_find_called_before_seal_then_returns_error() {
    let router = Router::new();
    router
        .add(HttpMethod::Get, "/pending", "pending")
        .expect("route should register");

    let err = router.find(HttpMethod::Get, "/pending");
    match err.expect_err("expected find while mutable error") {
        RouterError::FindWhileMutable => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn router_when_add_called_after_seal_then_returns_error() {
    let router = Router::new();
    router
        .add(HttpMethod::Get, "/once", "once")
        .expect("initial add should succeed");
    router.seal();

    let err = router.add(HttpMethod::Get, "/twice", "twice");
    match err.expect_err("expected add while sealed error") {
        RouterError::AddWhileSealed { path } => {
            assert_eq!(path, "/twice");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn router_when_bulk_add_called_after_seal_then_reports_count() {
    let router: Router<u8> = Router::new();
    router.seal();

    let entries = vec![
        (HttpMethod::Get, "/a".to_string(), 1),
        (HttpMethod::Get, "/b".to_string(), 2),
    ];
    match router.add_bulk(entries).expect_err("expected bulk add error") {
        RouterError::BulkAddWhileSealed { count } => assert_eq!(count, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn router_when_get_readonly_called_before_seal_then_returns_error() {
    let router = Router::new();
    router
        .add(HttpMethod::Get, "/pending", "pending")
        .expect("route should register");

    let err = router.get_readonly();
    match err.expect_err("expected readonly unavailable error") {
        RouterError::ReadOnlyUnavailable => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn router_when_sealed_twice_then_keeps_first_snapshot() {
    let router = Router::new();
    router
        .get("/stable", "stable")
        .expect("route should register");
    router.seal();
    let first = router.get_readonly().expect("snapshot should exist");
    router.seal();
    let second = router.get_readonly().expect("snapshot should exist");

    assert!(router.is_sealed());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.route_count(), 1);
}

#[test]
fn router_when_readonly_shared_across_threads_then_all_threads_dispatch() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Arc<chunk_router_rs::RouterReadOnly<&'static str>>>();

    let router = Router::new();
    router
        .get("/users/:id", "user")
        .expect("route should register");
    router.seal();
    let readonly = router.get_readonly().expect("snapshot should exist");

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let readonly = Arc::clone(&readonly);
            thread::spawn(move || {
                let path = format!("/users/{worker}");
                let dispatch = readonly
                    .find(HttpMethod::Get, &path)
                    .expect("dispatch should not fail");
                assert_eq!(dispatch.handler(), Some(&&"user"));
                assert_eq!(dispatch.params(), &[worker.to_string()]);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker should not panic");
    }
}

#[test]
fn router_when_routes_registered_then_metrics_track_chunks() {
    let options = chunk_router_rs::RouterOptions::builder()
        .chunk_capacity(2)
        .build()
        .expect("options should build");
    let router = Router::with_options(options).expect("router should build");
    router.get("/a", 1).expect("route should register");
    router.post("/a", 2).expect("route should register");
    router.get("/b", 3).expect("route should register");
    router.get("/c", 4).expect("route should register");

    let metrics = router.metrics();
    assert_eq!(metrics.total_routes_registered, 4);
    assert_eq!(metrics.total_branches, 4);
    assert_eq!(metrics.chunks_opened, 3);
    assert_eq!(metrics.chunks_closed_early, 0);
}
