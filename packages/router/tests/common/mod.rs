#![allow(dead_code)]

use tokio::task::JoinHandle;
use wayfinder_router::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    First,
    Second,
    Third,
    Fourth,
    Unregistered,
}

pub struct Harness {
    pub router: Router<Route>,
    pub browser: MemoryBrowser,
    pub service: JoinHandle<()>,
}

/// Spawn a router service over `table`, backed by a fresh [`MemoryBrowser`].
pub fn start(table: RouteTable<Route>, config: RouterConfig<Route>) -> Harness {
    let browser = MemoryBrowser::default();
    let (service, router) =
        RouterService::new(table, config, browser.clone()).expect("initial route resolves");

    Harness {
        router,
        browser,
        service: tokio::spawn(service.run()),
    }
}

/// Routes without any guards.
pub fn plain_table() -> RouteTable<Route> {
    RouteTable::builder()
        .route(Route::First, "/")
        .route(Route::Second, "/second")
        .route(Route::Third, "/third")
        .route(Route::Fourth, "/fourth")
        .build()
        .unwrap()
}

pub fn urls(location: &Location<Route>) -> Vec<&str> {
    location.entries.iter().map(|e| e.url.as_str()).collect()
}

impl Harness {
    /// Press back in the browser and wait until the router handled the pop.
    pub async fn back(&self) {
        self.browser.back();
        self.router.idle().await;
    }

    /// Press forward in the browser and wait until the router handled the pop.
    pub async fn forward(&self) {
        self.browser.forward();
        self.router.idle().await;
    }
}
