//! Background and asynchronous builds.

mod common;

use common::*;
use frame_navigator::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn counting_page(text: &'static str, counter: &Arc<AtomicUsize>) -> Builder {
    let counter = Arc::clone(counter);
    Builder::new(move |scope, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        scope.label(text);
    })
}

fn report_builder() -> Builder {
    Builder::new_async(|kwargs| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        let id = kwargs.get_str("id").unwrap_or_default().to_string();
        mount(move |scope| scope.label(format!("report {id}")))
    })
}

#[test]
fn test_superseded_build_is_discarded() {
    let a_builds = Arc::new(AtomicUsize::new(0));
    let b_builds = Arc::new(AtomicUsize::new(0));
    let tree = RouteTree::build(
        Outlet::new("/")
            .view("/", page("home"))
            .view("/a", counting_page("a", &a_builds))
            .view("/b", counting_page("b", &b_builds)),
    )
    .unwrap();
    let (mut session, backend) = open(tree, "/");

    session.navigate_to("/a").unwrap();
    session.navigate_to("/b").unwrap();
    assert_eq!(session.pending_builds(), 2);

    let committed = pollster::block_on(session.run_pending()).unwrap();

    assert_eq!(committed, 1);
    assert_eq!(a_builds.load(Ordering::SeqCst), 0);
    assert_eq!(b_builds.load(Ordering::SeqCst), 1);
    assert_eq!(backend.render(), vec!["b"]);
    assert_root_url(&session, "/b");
}

#[test]
fn test_superseded_async_build_never_starts() {
    let slow_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&slow_calls);
    let tree = RouteTree::build(
        Outlet::new("/")
            .view("/", page("home"))
            .view(
                "/slow",
                Builder::new_async(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async move { mount(|scope| scope.label("slow")) }
                }),
            )
            .view("/fast", page("fast")),
    )
    .unwrap();
    let (mut session, backend) = open(tree, "/");

    session.navigate_to("/slow").unwrap();
    session.navigate_to("/fast").unwrap();
    pollster::block_on(session.run_pending()).unwrap();

    assert_eq!(slow_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.render(), vec!["fast"]);
}

#[test]
fn test_async_builder_is_queued_even_when_sync_requested() {
    let tree = RouteTree::build(
        Outlet::new("/")
            .view("/", page("home"))
            .view(
                "/lazy",
                Builder::new_async(|_| async { mount(|scope| scope.label("lazy")) }),
            ),
    )
    .unwrap();
    let (mut session, backend) = open(tree, "/");
    let root = session.root().unwrap();

    session
        .navigate(root, "/lazy", NavigateOptions::default().sync(true))
        .unwrap();
    assert_eq!(session.pending_builds(), 1);
    assert!(backend.render().is_empty());

    pollster::block_on(session.run_pending()).unwrap();
    assert_eq!(backend.render(), vec!["lazy"]);
}

#[test]
fn test_builder_requested_navigation_runs_after_commit() {
    let tree = RouteTree::build(
        Outlet::new("/")
            .view("/", page("home"))
            .view(
                "/login",
                Builder::new(|scope, _| {
                    scope.label("login");
                    scope.navigate_to("/dashboard");
                }),
            )
            .view("/dashboard", page("dashboard")),
    )
    .unwrap();
    let (mut session, backend) = open(tree, "/");

    session.navigate_to("/login").unwrap();
    let committed = pollster::block_on(session.run_pending()).unwrap();

    assert_eq!(committed, 2);
    assert_eq!(backend.render(), vec!["dashboard"]);
    assert_root_url(&session, "/dashboard");
}

#[test]
fn test_build_failure_aborts_run() {
    let tree = RouteTree::build(
        Outlet::new("/")
            .view("/", page("home"))
            .view(
                "/broken",
                Builder::new(|scope, _| scope.fail(RouterError::UnknownRoute("widget".into()))),
            ),
    )
    .unwrap();
    let (mut session, _backend) = open(tree, "/");

    session.navigate_to("/broken").unwrap();
    let err = pollster::block_on(session.run_pending()).unwrap_err();
    assert_eq!(err, RouterError::UnknownRoute("widget".into()));
}

#[tokio::test]
async fn test_async_builder_awaits_before_mounting() {
    init_logging();
    let tree = RouteTree::build(
        Outlet::new("/")
            .view("/", page("home"))
            .add(View::new("/reports/{id}", report_builder()).title("Report")),
    )
    .unwrap();
    let backend = MemoryBackend::new();
    let mut session = Session::new(tree, backend.clone());
    session.open("/").unwrap();

    session.navigate_to("/reports/q3").unwrap();
    assert_eq!(backend.title().as_deref(), None);

    session.run_pending().await.unwrap();

    assert_eq!(backend.render(), vec!["report q3"]);
    assert_eq!(backend.title().as_deref(), Some("Report"));
}

#[tokio::test]
async fn test_async_view_inside_nested_outlet() {
    init_logging();
    let tree = RouteTree::build(
        Outlet::new("/").view("/", page("home")).outlet(
            Outlet::new("/finance")
                .layout(Layout::new(|scope, _| {
                    scope.label("finance menu");
                    Kwargs::new()
                }))
                .add(View::new("/reports/{id}", report_builder()).title("Report")),
        ),
    )
    .unwrap();
    let backend = MemoryBackend::new();
    let mut session = Session::new(tree, backend.clone());
    session.open("/").unwrap();

    session.navigate_to("/finance/reports/q4").unwrap();
    let committed = session.run_pending().await.unwrap();

    assert_eq!(committed, 2);
    assert_eq!(backend.render(), vec!["finance menu", "report q4"]);
    assert_eq!(backend.title().as_deref(), Some("Report"));
}

#[tokio::test]
async fn test_async_open_builds_initial_page() {
    init_logging();
    let tree = RouteTree::build(
        Outlet::new("/").add(View::new("/reports/{id}", report_builder()).title("Report")),
    )
    .unwrap();
    let backend = MemoryBackend::new();
    let mut session = Session::new(tree, backend.clone());

    session.open("/reports/q1").unwrap();
    assert_eq!(session.pending_builds(), 1);
    assert!(backend.render().is_empty());

    session.run_pending().await.unwrap();
    assert_eq!(backend.render(), vec!["report q1"]);
}
