//! Test utilities for routing tests
//!
//! Provides route tree fixtures, a session helper and assertion utilities for
//! the integration tests.

#![allow(dead_code)]

use frame_navigator::*;
use std::sync::{Arc, Mutex};

/// Builder that renders a single label.
pub fn page(text: &'static str) -> Builder {
    Builder::new(move |scope, _| scope.label(text))
}

/// Builder that renders `"<prefix> <value of param>"`.
pub fn param_page(prefix: &'static str, param: &'static str) -> Builder {
    Builder::new(move |scope, kwargs| {
        let value = kwargs.get_str(param).unwrap_or("<missing>");
        scope.label(format!("{prefix} {value}"));
    })
    .accepts([param])
}

/// Open a session on `tree` at `url` and return it with its backend.
pub fn open(tree: Arc<RouteTree>, url: &str) -> (Session, MemoryBackend) {
    open_with(tree, url, SessionOptions::default())
}

pub fn open_with(
    tree: Arc<RouteTree>,
    url: &str,
    options: SessionOptions,
) -> (Session, MemoryBackend) {
    init_logging();
    let backend = MemoryBackend::new();
    let mut session = Session::with_options(tree, backend.clone(), options);
    session.open(url).expect("session should open");
    pollster::block_on(session.run_pending()).expect("initial builds should succeed");
    (session, backend)
}

/// Navigate the root router and run the queued builds.
pub fn navigate(session: &mut Session, url: &str) -> NavigationResult {
    let result = session.navigate_to(url).expect("navigation should succeed");
    pollster::block_on(session.run_pending()).expect("builds should succeed");
    result
}

/// A cloud console style tree:
///
/// ```text
/// /                                   home
/// /about                              about
/// /services/{service_name}            outlet
///     /                               service overview
///     /vm/{vm}                        vm details
///     /storage                        outlet (container only)
///         /                           buckets
///         /{bucket}                   bucket details
/// ```
pub fn cloud_tree() -> Arc<RouteTree> {
    RouteTree::build(
        Outlet::new("/")
            .add(View::new("/", page("home")).title("Home"))
            .add(View::new("/about", page("about")).title("About").name("about"))
            .outlet(
                Outlet::new("/services/{service_name}")
                    .add(
                        View::new("/", param_page("service", "service_name"))
                            .title("Service")
                            .name("service"),
                    )
                    .add(View::new("/vm/{vm}", param_page("vm", "vm")).title("VM"))
                    .outlet(
                        Outlet::new("/storage")
                            .add(View::new("/", page("buckets")).title("Buckets"))
                            .add(
                                View::new("/{bucket}", param_page("bucket", "bucket"))
                                    .title("Bucket")
                                    .name("bucket"),
                            ),
                    ),
            ),
    )
    .expect("cloud tree is valid")
}

/// Shared, thread-safe event log for hooks.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// The router whose base path is `base`, searching below `router`.
pub fn router_at(session: &Session, router: RouterId, base: &str) -> Option<RouterId> {
    let current = session.router(router)?;
    if current.base_path() == base {
        return Some(router);
    }
    current
        .child_routers()
        .values()
        .find_map(|child| router_at(session, *child, base))
}

/// Assert that the session's root router shows `url`.
pub fn assert_root_url(session: &Session, url: &str) {
    let root = session.root().expect("session is open");
    assert_eq!(
        session.target_url(root).as_deref(),
        Some(url),
        "root router should show '{}'",
        url
    );
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
