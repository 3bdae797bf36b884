use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tokio::time::{sleep, Duration};
use wayfinder_router::prelude::*;

mod common;
use common::*;

#[tokio::test]
async fn pop_redirect_to_prev_url() {
    let table = RouteTable::builder()
        .route(Route::First, "/")
        .guarded(Route::Second, "/second", |cx| async move {
            if cx.prev_route.route != Route::Third {
                return Ok(None);
            }
            sleep(Duration::from_millis(1)).await;
            Ok(Some(Redirect::to(Route::First)))
        })
        .route(Route::Third, "/third")
        .build()
        .unwrap();
    let harness = start(table, RouterConfig::new(Route::First));

    harness.router.dispatch(Route::Second).await.unwrap();
    harness.router.dispatch(Route::Third).await.unwrap();
    harness.back().await;

    let location = harness.router.location();
    assert_eq!(location.route, Route::First);
    assert_eq!(location.index, 0);
    assert_eq!(location.entries[0].url, "/");
    assert_eq!(location.entries[1].url, "/second");

    assert_eq!(harness.browser.current_url(), "/");
    assert_eq!(harness.browser.index(), 0);
}

#[tokio::test]
async fn pop_without_guard_moves_index() {
    let harness = start(plain_table(), RouterConfig::new(Route::First));

    harness.router.dispatch(Route::Second).await.unwrap();
    harness.router.dispatch(Route::Third).await.unwrap();
    harness.back().await;

    let location = harness.router.location();
    assert_eq!(location.route, Route::Second);
    assert_eq!(location.index, 1);
    assert_eq!(urls(&location), vec!["/", "/second", "/third"]);

    harness.forward().await;
    let location = harness.router.location();
    assert_eq!(location.route, Route::Third);
    assert_eq!(location.index, 2);
    assert_eq!(location.entries.len(), 3);
}

#[tokio::test]
async fn pop_redirect_elsewhere_replaces_entry() {
    let table = RouteTable::builder()
        .route(Route::First, "/")
        .guarded(Route::Second, "/second", |cx| async move {
            Ok((cx.kind == NavigationKind::Pop).then(|| Redirect::to(Route::Fourth)))
        })
        .route(Route::Third, "/third")
        .route(Route::Fourth, "/fourth")
        .build()
        .unwrap();
    let harness = start(table, RouterConfig::new(Route::First));

    harness.router.dispatch(Route::Second).await.unwrap();
    harness.router.dispatch(Route::Third).await.unwrap();
    harness.back().await;

    let location = harness.router.location();
    assert_eq!(location.route, Route::Fourth);
    assert_eq!(location.index, 1);
    assert_eq!(urls(&location), vec!["/", "/fourth", "/third"]);

    assert_eq!(harness.browser.urls(), vec!["/", "/fourth", "/third"]);
    assert_eq!(harness.browser.index(), 1);
}

#[tokio::test]
async fn forward_pop_redirected_back_stays_put() {
    let table = RouteTable::builder()
        .route(Route::First, "/")
        .guarded(Route::Second, "/second", |cx| async move {
            Ok((cx.kind == NavigationKind::Pop).then(|| Redirect::to(Route::First)))
        })
        .build()
        .unwrap();
    let harness = start(table, RouterConfig::new(Route::First));

    harness.router.dispatch(Route::Second).await.unwrap();
    harness.back().await;
    assert_eq!(harness.router.location().index, 0);

    harness.forward().await;

    let location = harness.router.location();
    assert_eq!(location.route, Route::First);
    assert_eq!(location.index, 0);
    assert_eq!(location.entries.len(), 2);
    assert_eq!(harness.browser.index(), 0);
    assert_eq!(harness.browser.current_url(), "/");
}

#[tokio::test]
async fn guards_see_the_location_being_left() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let record = seen.clone();
    let table = RouteTable::builder()
        .route(Route::First, "/")
        .guarded(Route::Second, "/second", move |cx| {
            record.lock().push((cx.prev_route.route, cx.next_route.route, cx.kind));
            async { Ok(None) }
        })
        .route(Route::Third, "/third")
        .build()
        .unwrap();
    let harness = start(table, RouterConfig::new(Route::First));

    harness.router.dispatch(Route::Second).await.unwrap();
    harness.router.dispatch(Route::Third).await.unwrap();
    harness.back().await;

    assert_eq!(
        *seen.lock(),
        vec![
            (Route::First, Route::Second, NavigationKind::Dispatch),
            (Route::Third, Route::Second, NavigationKind::Pop),
        ]
    );
}

#[tokio::test]
async fn failed_pop_restores_native_history() {
    let table = RouteTable::builder()
        .route(Route::First, "/")
        .guarded(Route::Second, "/second", |cx| async move {
            match cx.kind {
                NavigationKind::Pop => Err(GuardError::new("no way back")),
                NavigationKind::Dispatch => Ok(None),
            }
        })
        .route(Route::Third, "/third")
        .build()
        .unwrap();
    let harness = start(table, RouterConfig::new(Route::First));

    harness.router.dispatch(Route::Second).await.unwrap();
    let before = harness.router.dispatch(Route::Third).await.unwrap();
    harness.back().await;

    assert_eq!(harness.router.location(), before);
    assert_eq!(harness.browser.index(), 2);
    assert_eq!(harness.browser.current_url(), "/third");

    // the router keeps working
    harness.router.dispatch(Route::First).await.unwrap();
    assert_eq!(harness.router.location().index, 3);
}

#[tokio::test]
async fn programmatic_pop_reports_errors() {
    let table = RouteTable::builder()
        .route(Route::First, "/")
        .guarded(Route::Second, "/second", |cx| async move {
            match cx.kind {
                NavigationKind::Pop => Err(GuardError::new("no way back")),
                NavigationKind::Dispatch => Ok(None),
            }
        })
        .route(Route::Third, "/third")
        .build()
        .unwrap();
    let harness = start(table, RouterConfig::new(Route::First));

    harness.router.dispatch(Route::Second).await.unwrap();
    harness.router.dispatch(Route::Third).await.unwrap();

    let err = harness.router.pop(1).await.unwrap_err();
    let NavigationError::Guard { route, source } = err else {
        panic!("expected a guard error");
    };
    assert_eq!(route, Route::Second);
    assert_eq!(source.message(), "no way back");

    let err = harness.router.pop(7).await.unwrap_err();
    assert!(matches!(err, NavigationError::InvalidIndex { index: 7, len: 3 }));

    assert_eq!(harness.router.location().index, 2);
}

#[tokio::test]
async fn pop_to_current_index_is_a_no_op() {
    let calls = Arc::new(Mutex::new(0));

    let counter = calls.clone();
    let table = RouteTable::builder()
        .guarded(Route::First, "/", move |_| {
            *counter.lock() += 1;
            async { Ok(None) }
        })
        .route(Route::Second, "/second")
        .build()
        .unwrap();
    let harness = start(table, RouterConfig::new(Route::First));

    let location = harness.router.pop(0).await.unwrap();

    assert_eq!(location, harness.router.location());
    assert_eq!(*calls.lock(), 0);
}
