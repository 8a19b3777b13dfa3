//! Per-visitor navigation sessions.
//!
//! A [`Session`] is the single logical event queue of one UI session. It owns
//! the arena of live routers and frames, the UI backend and the queue of
//! background builds. Every mutation goes through `&mut Session`, so two
//! navigations can never interleave on the same frame.
//!
//! Builders do not reach the session directly. They receive a [`Scope`]
//! naming the frame being built and the router that owns it.
//!
//! ```
//! use frame_navigator::{Builder, Element, MemoryBackend, Outlet, RouteTree, Session};
//!
//! let tree = RouteTree::build(
//!     Outlet::new("/")
//!         .view("/", Builder::new(|scope, _| scope.add(Element::label("home"))))
//!         .view("/about", Builder::new(|scope, _| scope.add(Element::label("about")))),
//! )
//! .unwrap();
//!
//! let backend = MemoryBackend::new();
//! let mut session = Session::new(tree, backend.clone());
//! session.open("/").unwrap();
//! assert_eq!(backend.render(), vec!["home".to_string()]);
//!
//! session.navigate_to("/about").unwrap();
//! pollster::block_on(session.run_pending()).unwrap();
//! assert_eq!(backend.render(), vec!["about".to_string()]);
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ResolveCache};
use crate::backend::{Element, Slot, UiBackend};
use crate::builder::{BuildFn, Builder};
use crate::config::{ConfigId, RouteTree};
use crate::error::{NavigationResult, RouterError};
use crate::frame::{FrameId, FrameOptions, PendingBuild, RouterFrame};
use crate::history::location_script;
use crate::kwargs::Kwargs;
use crate::params::RouteParams;
use crate::router::{NavigateOptions, NavigationTarget, Router, RouterId, DEFAULT_MAX_REDIRECTS};
use crate::{debug_log, info_log, warn_log};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Session-wide settings.
///
/// ```
/// use frame_navigator::{Builder, SessionOptions};
///
/// let options = SessionOptions::new()
///     .default_title("My App")
///     .max_redirects(4)
///     .not_found(Builder::new(|_, _| {}));
/// assert_eq!(options.default_title.as_deref(), Some("My App"));
/// ```
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Title used by views that declare none. `None` leaves the title alone.
    pub default_title: Option<String>,
    /// Redirects one resolution may follow before failing.
    pub max_redirects: usize,
    /// Capacity of the resolution cache.
    pub cache_capacity: usize,
    /// Replacement for the built-in not-found page.
    pub not_found: Option<Builder>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_title: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            cache_capacity: 1000,
            not_found: None,
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, limit: usize) -> Self {
        self.max_redirects = limit;
        self
    }

    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn not_found(mut self, builder: Builder) -> Self {
        self.not_found = Some(builder);
        self
    }
}

/// One visitor's router tree.
pub struct Session {
    pub(crate) tree: Arc<RouteTree>,
    pub(crate) backend: Box<dyn UiBackend>,
    pub(crate) options: SessionOptions,
    pub(crate) routers: HashMap<RouterId, Router>,
    pub(crate) frames: HashMap<FrameId, RouterFrame>,
    pub(crate) root: Option<RouterId>,
    pub(crate) pending: VecDeque<PendingBuild>,
    pub(crate) deferred: VecDeque<String>,
    pub(crate) build_error: Option<RouterError>,
    #[cfg(feature = "cache")]
    pub(crate) cache: ResolveCache,
    next_id: u64,
}

impl Session {
    pub fn new(tree: Arc<RouteTree>, backend: impl UiBackend + 'static) -> Self {
        Self::with_options(tree, backend, SessionOptions::default())
    }

    pub fn with_options(
        tree: Arc<RouteTree>,
        backend: impl UiBackend + 'static,
        options: SessionOptions,
    ) -> Self {
        Self {
            tree,
            backend: Box::new(backend),
            #[cfg(feature = "cache")]
            cache: ResolveCache::with_capacity(options.cache_capacity),
            options,
            routers: HashMap::new(),
            frames: HashMap::new(),
            root: None,
            pending: VecDeque::new(),
            deferred: VecDeque::new(),
            build_error: None,
            next_id: 0,
        }
    }

    pub(crate) fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Build the page for `initial_url`.
    ///
    /// Renders the root layout, creates the root router and navigates it to
    /// `initial_url` synchronously. Opening again tears the previous page
    /// down first.
    pub fn open(&mut self, initial_url: &str) -> Result<RouterId, RouterError> {
        #[cfg(feature = "cache")]
        self.cache.clear();
        if let Some(root) = self.root.take() {
            if let Some(frame) = self.routers.get(&root).map(|router| router.frame) {
                self.remove_frame_subtree(frame);
            }
        }
        self.backend.clear(Slot::Page);
        self.pending.clear();
        self.deferred.clear();
        self.build_error = None;
        info_log!("Opening session at '{}'", initial_url);

        let tree = Arc::clone(&self.tree);
        let template = tree.root().template().cloned();
        let kwargs = Kwargs::new().with("url_path", initial_url.to_string());

        let mut user_data = Kwargs::new();
        if let Some(template) = &template {
            let mut scope = Scope::new(self, Slot::Page, None);
            user_data.extend(&template.header(&mut scope, &kwargs));
        }
        let root = self.instantiate(
            ConfigId::ROOT,
            None,
            Slot::Page,
            user_data,
            Some(initial_url.to_string()),
        )?;
        self.root = Some(root);
        if let Some(template) = &template {
            let mut scope = Scope::new(self, Slot::Page, Some(root));
            let footer = template.footer(&mut scope, &kwargs);
            self.update_user_data(root, &footer)?;
        }
        if let Some(err) = self.build_error.take() {
            return Err(err);
        }
        self.drain_deferred()?;
        Ok(root)
    }

    /// Navigate the root router to `url` with default options.
    ///
    /// The new content is built by the next [`Session::run_pending`].
    pub fn navigate_to(&mut self, url: &str) -> Result<NavigationResult, RouterError> {
        let root = self.root.ok_or(RouterError::NotOpen)?;
        self.navigate(root, url, NavigateOptions::default())
    }

    /// Navigate the root router to the view registered as `name`.
    pub fn navigate_named(
        &mut self,
        name: &str,
        params: &RouteParams,
    ) -> Result<NavigationResult, RouterError> {
        let url = self.tree.url_for(name, params)?;
        self.navigate_to(&url)
    }

    /// Handle a browser "open" event raised by `frame`.
    ///
    /// Paths outside the frame's masks are handed back to the browser as a
    /// full page load. Everything else is navigated without pushing history.
    pub fn handle_open_event(
        &mut self,
        frame: FrameId,
        path: &str,
    ) -> Result<NavigationResult, RouterError> {
        let Some(record) = self.frames.get(&frame) else {
            debug_log!("Open event for unknown {} ignored", frame);
            return Ok(NavigationResult::Suppressed {
                path: path.to_string(),
            });
        };
        if !path.starts_with('#') && !record.handles(path) {
            debug_log!("'{}' is outside {}; loading the page", path, frame);
            self.backend.run_javascript(&location_script(path));
            return Ok(NavigationResult::External {
                path: path.to_string(),
            });
        }
        self.navigate_frame(frame, path, false, false)
    }

    /// Run queued builds until the queue is empty.
    ///
    /// Builds whose frame was cleared or removed since they were queued are
    /// discarded. Asynchronous builders are awaited here. The session stays
    /// borrowed across the await, so nothing can clear the frame while a
    /// builder is pending. Returns the number of builds committed.
    pub async fn run_pending(&mut self) -> Result<usize, RouterError> {
        let mut committed = 0;
        while let Some(PendingBuild {
            frame,
            generation,
            request,
        }) = self.pending.pop_front()
        {
            if !self.is_current(frame, generation) {
                debug_log!("Discarding stale build for {} (generation {})", frame, generation);
                continue;
            }
            let kwargs = request.builder.prepare(&request.kwargs);
            match request.builder.func().clone() {
                BuildFn::Sync(func) => {
                    let mut scope = Scope::new(self, Slot::Frame(frame), request.router);
                    func(&mut scope, &kwargs);
                }
                BuildFn::Async(func) => {
                    let mount = func(kwargs).await;
                    let mut scope = Scope::new(self, Slot::Frame(frame), request.router);
                    mount(&mut scope);
                }
            }
            self.finish_build(frame, generation, request.title, request.fragment);
            committed += 1;
            if let Some(err) = self.build_error.take() {
                return Err(err);
            }
            self.drain_deferred()?;
        }
        Ok(committed)
    }

    /// Run navigations requested from inside builders.
    pub(crate) fn drain_deferred(&mut self) -> Result<(), RouterError> {
        let limit = self.options.max_redirects;
        let mut steps = 0;
        while let Some(path) = self.deferred.pop_front() {
            steps += 1;
            if steps > limit {
                self.deferred.clear();
                return Err(RouterError::RedirectLoop { path, limit });
            }
            let Some(root) = self.root else {
                warn_log!("Dropping navigation to '{}' requested before open", path);
                continue;
            };
            self.navigate_inner(root, NavigationTarget::Path(path), NavigateOptions::default())?;
        }
        Ok(())
    }

    pub fn root(&self) -> Option<RouterId> {
        self.root
    }

    pub fn router(&self, router: RouterId) -> Option<&Router> {
        self.routers.get(&router)
    }

    pub fn frame(&self, frame: FrameId) -> Option<&RouterFrame> {
        self.frames.get(&frame)
    }

    /// The URL `router` currently shows.
    pub fn target_url(&self, router: RouterId) -> Option<String> {
        let frame = self.routers.get(&router)?.frame;
        self.frames.get(&frame)?.target_url.clone()
    }

    pub fn update_user_data(&mut self, router: RouterId, data: &Kwargs) -> Result<(), RouterError> {
        self.router_mut(router)?.update_user_data(data);
        Ok(())
    }

    pub fn tree(&self) -> &Arc<RouteTree> {
        &self.tree
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Number of builds waiting for [`Session::run_pending`].
    pub fn pending_builds(&self) -> usize {
        self.pending.len()
    }

    /// Number of live routers.
    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("root", &self.root)
            .field("routers", &self.routers.len())
            .field("frames", &self.frames.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

// ============================================================================
// Scope
// ============================================================================

/// The build context handed to builders, layouts and mount closures.
pub struct Scope<'a> {
    session: &'a mut Session,
    slot: Slot,
    router: Option<RouterId>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(session: &'a mut Session, slot: Slot, router: Option<RouterId>) -> Self {
        Self {
            session,
            slot,
            router,
        }
    }

    /// Where elements added through this scope are mounted.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// The router owning the frame being built.
    pub fn router(&self) -> Option<RouterId> {
        self.router
    }

    pub fn frame(&self) -> Option<FrameId> {
        match self.slot {
            Slot::Frame(frame) => Some(frame),
            Slot::Page => None,
        }
    }

    pub fn add(&mut self, element: Element) {
        self.session.backend.mount(self.slot, element);
    }

    pub fn label(&mut self, text: impl Into<String>) {
        self.add(Element::label(text));
    }

    pub fn run_javascript(&mut self, script: &str) {
        self.session.backend.run_javascript(script);
    }

    /// URL currently shown by the scope's router.
    pub fn target_url(&self) -> Option<String> {
        self.session.target_url(self.router?)
    }

    pub fn user_data(&self) -> Option<&Kwargs> {
        Some(self.session.router(self.router?)?.user_data())
    }

    pub fn update_user_data(&mut self, data: &Kwargs) -> Result<(), RouterError> {
        let router = self.router.ok_or(RouterError::OutsideRouter)?;
        self.session.update_user_data(router, data)
    }

    /// Request a navigation of the root router.
    ///
    /// It runs after the current navigation or build has finished.
    pub fn navigate_to(&mut self, url: impl Into<String>) {
        self.session.deferred.push_back(url.into());
    }

    /// Render the nested outlet `child` into this scope: its layout header,
    /// a new router and frame, and the layout footer.
    ///
    /// The new router navigates synchronously to the URL the parent router
    /// shows, or to `url_path` from `kwargs` when the parent has none.
    pub fn mount_outlet(&mut self, child: ConfigId, kwargs: &Kwargs) -> Result<RouterId, RouterError> {
        let parent = self.router.ok_or(RouterError::OutsideRouter)?;
        let tree = Arc::clone(&self.session.tree);
        let config = tree.config(child)?;
        let initial_url = self
            .session
            .target_url(parent)
            .or_else(|| kwargs.get_str("url_path").map(str::to_string));

        let template = config.template().cloned();
        let mut user_data = Kwargs::new();
        if let Some(template) = &template {
            user_data.extend(&template.header(self, kwargs));
        }
        let router = self
            .session
            .instantiate(child, Some(parent), self.slot, user_data, initial_url)?;
        if let Some(template) = &template {
            let footer = template.footer(self, kwargs);
            self.session.update_user_data(router, &footer)?;
        }
        Ok(router)
    }

    /// Mount a standalone frame into this scope.
    pub fn mount_frame(&mut self, options: FrameOptions) -> FrameId {
        self.session.mount_frame(self.slot, options)
    }

    /// Abort the surrounding navigation with `err` once the build returns.
    pub fn fail(&mut self, err: RouterError) {
        crate::error_log!("Build failed: {}", err);
        if self.session.build_error.is_none() {
            self.session.build_error = Some(err);
        }
    }

    pub fn session(&self) -> &Session {
        &*self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::config::Outlet;
    use crate::mount;

    fn label(text: &'static str) -> Builder {
        Builder::new(move |scope, _| scope.label(text))
    }

    #[test]
    fn navigate_before_open_fails() {
        let tree = RouteTree::build(Outlet::new("/").view("/", label("home"))).unwrap();
        let mut session = Session::new(tree, MemoryBackend::new());
        assert_eq!(session.navigate_to("/").unwrap_err(), RouterError::NotOpen);
    }

    #[test]
    fn queued_build_runs_on_run_pending() {
        let tree = RouteTree::build(
            Outlet::new("/").view("/", label("home")).view("/a", label("a")),
        )
        .unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        session.open("/").unwrap();

        session.navigate_to("/a").unwrap();
        assert_eq!(session.pending_builds(), 1);
        assert!(backend.render().is_empty());

        let committed = pollster::block_on(session.run_pending()).unwrap();
        assert_eq!(committed, 1);
        assert_eq!(backend.render(), vec!["a"]);
    }

    #[test]
    fn async_builder_mounts_after_await() {
        let tree = RouteTree::build(Outlet::new("/").view(
            "/",
            Builder::new_async(|kwargs| async move {
                let url = kwargs.get_str("url_path").unwrap_or_default().to_string();
                mount(move |scope| scope.label(format!("loaded {url}")))
            }),
        ))
        .unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        session.open("/").unwrap();

        assert_eq!(session.pending_builds(), 1);
        pollster::block_on(session.run_pending()).unwrap();
        assert_eq!(backend.render(), vec!["loaded /"]);
    }

    #[test]
    fn reopen_replaces_page() {
        let tree = RouteTree::build(
            Outlet::new("/").view("/", label("home")).view("/a", label("a")),
        )
        .unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        session.open("/").unwrap();
        session.open("/a").unwrap();

        assert_eq!(backend.render(), vec!["a"]);
        assert_eq!(session.router_count(), 1);
    }

    #[test]
    fn deferred_navigation_runs_after_build() {
        let tree = RouteTree::build(
            Outlet::new("/")
                .view(
                    "/",
                    Builder::new(|scope, _| {
                        scope.label("home");
                        scope.navigate_to("/a");
                    }),
                )
                .view("/a", label("a")),
        )
        .unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        session.open("/").unwrap();
        pollster::block_on(session.run_pending()).unwrap();

        assert_eq!(backend.render(), vec!["a"]);
        let root = session.root().unwrap();
        assert_eq!(session.target_url(root).as_deref(), Some("/a"));
    }

    #[test]
    fn scope_outside_router_cannot_mount_outlets() {
        let tree = RouteTree::build(Outlet::new("/")).unwrap();
        let mut session = Session::new(tree, MemoryBackend::new());
        let mut scope = Scope::new(&mut session, Slot::Page, None);
        assert_eq!(
            scope.mount_outlet(ConfigId::ROOT, &Kwargs::new()).unwrap_err(),
            RouterError::OutsideRouter
        );
    }
}
