//! Routers and the navigation state machine.
//!
//! A [`Router`] is the live instantiation of a [`RouterConfig`](crate::RouterConfig)
//! inside a session. It owns one frame, remembers the child routers mounted
//! by its outlet entries and carries the `user_data` handed to every builder
//! below it.
//!
//! # Navigation
//!
//! [`Session::navigate`] runs these steps in order:
//!
//! 1. Delegate to a child router whose base path covers the target.
//! 2. Run the `on_navigate` hooks; a veto ends the navigation.
//! 3. Resolve the target through `on_resolve`, the route table and the
//!    `on_open` chain. A hook that changes `original_path` restarts
//!    resolution, up to [`SessionOptions::max_redirects`](crate::SessionOptions) times.
//! 4. Substitute the not-found page for unmatched targets.
//! 5. Record the new URL on this router and all of its ancestors.
//! 6. Push browser history and jump to anchors.
//! 7. Run `on_pre_update`.
//! 8. Clear the router and swap the frame's content.
//! 9. Set the page title once the build commits, unless the frame turned out
//!    to be a container for nested frames.
//! 10. Run `on_post_update`.

use crate::backend::{Element, Slot};
use crate::builder::Builder;
use crate::config::ConfigId;
use crate::error::{NavigationResult, RouterError};
use crate::frame::{BuildRequest, FrameId, FrameOwner, RouterFrame};
use crate::history::{anchor_script, push_state_script};
use crate::hooks::{NavigateHook, OpenHook, ResolveHook};
use crate::kwargs::Kwargs;
use crate::mask::{
    create_path_mask, frame_masks, prefix_matches, strip_query, substitute_placeholders,
    substitute_wildcards, MaskSet,
};
use crate::session::Session;
use crate::target::{strip_fragment, Target};
use crate::{debug_log, info_log, trace_log};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Upper bound on parent hops when walking a router's ancestors.
pub const MAX_ANCESTOR_DEPTH: usize = 100;

/// Default bound on hook-driven redirects within one resolution.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

/// Title of the built-in not-found page.
pub const NOT_FOUND_TITLE: &str = "Page not found";

/// Identifier of a [`Router`] within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouterId(pub(crate) u64);

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "router#{}", self.0)
    }
}

/// Flags of a single navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    /// The request originates on the server, so the browser has to be told
    /// about the new URL.
    pub server_side: bool,
    /// Build the new content before returning instead of queueing it.
    pub sync: bool,
    /// Respect the router's browser history setting.
    pub history: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            server_side: true,
            sync: false,
            history: true,
        }
    }
}

impl NavigateOptions {
    /// A navigation started by the browser (link click, back/forward).
    pub fn browser() -> Self {
        Self {
            server_side: false,
            ..Self::default()
        }
    }

    /// The first navigation of a freshly created router.
    pub fn initial() -> Self {
        Self {
            server_side: true,
            sync: true,
            history: false,
        }
    }

    #[must_use]
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// What to navigate to: a URL, or a target resolved elsewhere.
#[derive(Debug, Clone)]
pub enum NavigationTarget {
    Path(String),
    Target(Box<Target>),
}

impl NavigationTarget {
    /// The requested URL.
    pub fn path(&self) -> &str {
        match self {
            NavigationTarget::Path(path) => path,
            NavigationTarget::Target(target) => &target.original_path,
        }
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        NavigationTarget::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        NavigationTarget::Path(path)
    }
}

impl From<Target> for NavigationTarget {
    fn from(target: Target) -> Self {
        NavigationTarget::Target(Box::new(target))
    }
}

/// A live router.
pub struct Router {
    pub(crate) id: RouterId,
    pub(crate) config: ConfigId,
    pub(crate) frame: FrameId,
    pub(crate) base_path: String,
    pub(crate) parent: Option<RouterId>,
    pub(crate) child_routers: BTreeMap<String, RouterId>,
    pub(crate) user_data: Kwargs,
    pub(crate) use_browser_history: bool,
    on_navigate: Option<NavigateHook>,
    on_resolve: Option<ResolveHook>,
    on_open: Option<OpenHook>,
}

impl Router {
    pub fn id(&self) -> RouterId {
        self.id
    }

    pub fn config(&self) -> ConfigId {
        self.config
    }

    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Base path with `{param}` placeholders substituted from the URL the
    /// router was created for.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn parent(&self) -> Option<RouterId> {
        self.parent
    }

    /// Child routers keyed by their base path.
    pub fn child_routers(&self) -> &BTreeMap<String, RouterId> {
        &self.child_routers
    }

    pub fn user_data(&self) -> &Kwargs {
        &self.user_data
    }

    /// Merge `data` into `user_data`; later navigations see the new values.
    pub fn update_user_data(&mut self, data: &Kwargs) {
        self.user_data.extend(data);
    }

    pub fn use_browser_history(&self) -> bool {
        self.use_browser_history
    }

    pub fn set_browser_history(&mut self, enabled: bool) -> &mut Self {
        self.use_browser_history = enabled;
        self
    }

    /// Instance-level `on_navigate`, run before the config chain.
    pub fn on_navigate<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.on_navigate = Some(Arc::new(hook));
        self
    }

    /// Resolve paths before the route table is consulted. A `Some` result is
    /// used verbatim.
    pub fn on_resolve<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str) -> Option<Target> + Send + Sync + 'static,
    {
        self.on_resolve = Some(Arc::new(hook));
        self
    }

    /// Instance-level `on_open`, the first hook of the open chain.
    pub fn on_open<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(Target, &Kwargs) -> Target + Send + Sync + 'static,
    {
        self.on_open = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("frame", &self.frame)
            .field("base_path", &self.base_path)
            .field("parent", &self.parent)
            .field("child_routers", &self.child_routers)
            .field("user_data", &self.user_data)
            .finish()
    }
}

/// Outcome of one resolution pass.
enum Resolution {
    Done(Target),
    Redirect(String),
}

/// The built-in not-found page.
pub(crate) fn not_found_builder() -> Builder {
    Builder::new(|scope, _| {
        scope.add(Element::label("Oops! Page Not Found").class("text-3xl"));
        scope.add(Element::label(
            "Sorry, the page you are looking for could not be found.",
        ));
    })
}

impl Session {
    /// Navigate `router` to `target`.
    ///
    /// Deferred navigations requested by builders run before this returns.
    pub fn navigate(
        &mut self,
        router: RouterId,
        target: impl Into<NavigationTarget>,
        options: NavigateOptions,
    ) -> Result<NavigationResult, RouterError> {
        let result = self.navigate_inner(router, target.into(), options)?;
        self.drain_deferred()?;
        Ok(result)
    }

    pub(crate) fn navigate_inner(
        &mut self,
        router_id: RouterId,
        target: NavigationTarget,
        options: NavigateOptions,
    ) -> Result<NavigationResult, RouterError> {
        let target = match target {
            NavigationTarget::Path(path) if path.starts_with('#') => {
                let frame = self.frame_ref(self.router_ref(router_id)?.frame)?;
                let base = frame.target_url.as_deref().map_or("/", strip_fragment);
                NavigationTarget::Path(format!("{base}{path}"))
            }
            other => other,
        };
        let router = self.router_ref(router_id)?;

        if let NavigationTarget::Path(path) = &target {
            let stripped = strip_query(path);
            let child = router
                .child_routers
                .iter()
                .find(|(base, _)| prefix_matches(&create_path_mask(base), stripped))
                .map(|(_, child)| *child);
            if let Some(child) = child {
                debug_log!("{} delegating '{}' to child {}", router_id, path, child);
                return self.navigate_inner(child, target, options);
            }
        }

        let target = match target {
            NavigationTarget::Path(path) => match self.handle_navigate(router_id, &path)? {
                Some(rewritten) => NavigationTarget::Path(rewritten),
                None => {
                    debug_log!("Navigation to '{}' suppressed by on_navigate", path);
                    return Ok(NavigationResult::Suppressed { path });
                }
            },
            resolved => resolved,
        };
        info_log!("{} navigating to '{}'", router_id, target.path());

        let frame_id = self.router_ref(router_id)?.frame;
        let frame = self.frame_ref(frame_id)?;
        let previous_url = frame.target_url.clone();
        let was_built = frame.built;

        let mut context = self.collect_user_data(router_id)?;
        context.insert_str("previous_url_path", previous_url.clone().unwrap_or_default());
        context.insert_str("url_path", target.path());

        let target = self.resolve_target(router_id, target, &context)?;
        if !target.valid {
            debug_log!("Target '{}' is invalid; navigation suppressed", target.original_path);
            return Ok(NavigationResult::Suppressed {
                path: target.original_path,
            });
        }
        let target_url = target.original_path.clone();
        context.insert_str("url_path", target_url.as_str());
        context.insert_str("target_url", target_url.as_str());
        self.update_target_url(router_id, &target_url)?;

        let mut script = String::new();
        if options.server_side && options.history && self.router_ref(router_id)?.use_browser_history {
            script.push_str(&push_state_script(&target_url));
        }
        let same_page = was_built
            && previous_url
                .as_deref()
                .is_some_and(|previous| strip_fragment(previous) == strip_fragment(&target_url));
        if let Some(fragment) = &target.fragment {
            if target.builder.is_none() || same_page {
                script.push_str(&anchor_script(fragment));
                self.backend.run_javascript(&script);
                return Ok(NavigationResult::Anchor {
                    fragment: fragment.clone(),
                });
            }
        }

        let not_found = target.builder.is_none();
        let target = if not_found {
            debug_log!("No route for '{}'; rendering not-found page", target_url);
            let mut page = Target::new(target_url.as_str())
                .with_builder(self.not_found())
                .with_title(NOT_FOUND_TITLE);
            page.fragment = None;
            page.router = Some(router_id);
            page
        } else {
            target
        };
        if !script.is_empty() {
            self.backend.run_javascript(&script);
        }

        let mut kwargs = Kwargs::new();
        for (name, value) in target.path_args.iter() {
            kwargs.insert_str(name.as_str(), value.as_str());
        }
        for (name, value) in target.query_args.iter_first() {
            kwargs.insert_str(name.as_str(), value.as_str());
        }
        kwargs.insert("target", target.clone());
        kwargs.extend(&context);

        if let Some(hook) = &target.on_pre_update {
            hook.call(&kwargs);
        }

        self.clear_router(router_id)?;
        let request = BuildRequest {
            builder: target.builder.clone().unwrap_or_else(not_found_builder),
            kwargs: kwargs.clone(),
            title: target.title.clone(),
            fragment: target.fragment.clone(),
            router: Some(router_id),
        };
        self.update_content(frame_id, request, options.sync)?;
        if let Some(err) = self.build_error.take() {
            return Err(err);
        }

        if let Some(hook) = &target.on_post_update {
            hook.call(&kwargs);
        }

        info_log!("{} navigation to '{}' complete", router_id, target_url);
        Ok(if not_found {
            NavigationResult::NotFound { path: target_url }
        } else {
            NavigationResult::Success { path: target_url }
        })
    }

    /// Run the router's `on_navigate` hook and then the config chain.
    ///
    /// Returns `None` when the navigation is vetoed.
    pub fn handle_navigate(
        &self,
        router: RouterId,
        path: &str,
    ) -> Result<Option<String>, RouterError> {
        let router = self.router_ref(router)?;
        let path = match &router.on_navigate {
            Some(hook) => match hook(path) {
                Some(path) => path,
                None => return Ok(None),
            },
            None => path.to_string(),
        };
        Ok(self.tree.handle_navigate(router.config, &path))
    }

    /// Resolve `target` for `router` with the full hook chain.
    ///
    /// # Errors
    ///
    /// [`RouterError::RedirectLoop`] when hooks keep redirecting.
    pub fn resolve_target(
        &mut self,
        router: RouterId,
        target: NavigationTarget,
        context: &Kwargs,
    ) -> Result<Target, RouterError> {
        let limit = self.options.max_redirects;
        let mut current = target;
        for _ in 0..=limit {
            match self.resolve_once(router, current, context)? {
                Resolution::Done(target) => return Ok(target),
                Resolution::Redirect(path) => {
                    debug_log!("Hook redirected resolution to '{}'", path);
                    current = NavigationTarget::Path(path);
                }
            }
        }
        Err(RouterError::RedirectLoop {
            path: current.path().to_string(),
            limit,
        })
    }

    fn resolve_once(
        &mut self,
        router_id: RouterId,
        target: NavigationTarget,
        context: &Kwargs,
    ) -> Result<Resolution, RouterError> {
        let router = self.router_ref(router_id)?;
        let config_id = router.config;
        let router_on_open = router.on_open.clone();

        let path = match target {
            NavigationTarget::Target(mut target) => {
                target.router.get_or_insert(router_id);
                return Ok(Resolution::Done(*target));
            }
            NavigationTarget::Path(path) => path,
        };

        if let Some(hook) = router.on_resolve.clone() {
            if let Some(mut target) = hook(&path) {
                trace_log!("on_resolve of {} produced a target for '{}'", router_id, path);
                target.router.get_or_insert(router_id);
                return Ok(Resolution::Done(target));
            }
        }

        let mut target = self.resolve_in_config(config_id, &path)?;
        if target.valid {
            target.router.get_or_insert(router_id);
        }
        let Some(entry) = target.route.clone() else {
            return Ok(Resolution::Done(target));
        };

        let mut hooks: Vec<OpenHook> = Vec::new();
        hooks.extend(router_on_open);
        hooks.extend(entry.on_open().cloned());
        let mut config = self.tree.get(config_id);
        while let Some(cfg) = config {
            hooks.extend(cfg.on_open().cloned());
            config = cfg.parent().and_then(|parent| self.tree.get(parent));
        }

        let original = target.original_path.clone();
        for hook in hooks {
            target = hook(target, context);
            if target.original_path != original {
                return Ok(Resolution::Redirect(target.original_path));
            }
        }
        Ok(Resolution::Done(target))
    }

    #[cfg(feature = "cache")]
    fn resolve_in_config(&mut self, config: ConfigId, url: &str) -> Result<Target, RouterError> {
        let tree = Arc::clone(&self.tree);
        let cfg = tree.config(config)?;
        let parsed = crate::target::ParsedUrl::parse(url);
        if parsed.path.is_empty() {
            return Ok(cfg.resolve_target(url));
        }
        let matched = match self.cache.get(config, &parsed.path) {
            Some(matched) => matched,
            None => {
                let matched = cfg.table().match_path(&parsed.path);
                self.cache.insert(config, &parsed.path, matched.clone());
                matched
            }
        };
        Ok(cfg.table().target_for(url, parsed, config, matched))
    }

    #[cfg(not(feature = "cache"))]
    fn resolve_in_config(&mut self, config: ConfigId, url: &str) -> Result<Target, RouterError> {
        Ok(self.tree.config(config)?.resolve_target(url))
    }

    /// `router` and its ancestors, innermost first.
    pub(crate) fn ancestors(&self, router: RouterId) -> Result<Vec<RouterId>, RouterError> {
        let mut chain = Vec::new();
        let mut current = Some(router);
        while let Some(id) = current {
            if chain.len() >= MAX_ANCESTOR_DEPTH {
                return Err(RouterError::AncestorCycle {
                    router,
                    limit: MAX_ANCESTOR_DEPTH,
                });
            }
            chain.push(id);
            current = self.router_ref(id)?.parent;
        }
        Ok(chain)
    }

    /// `user_data` of the router chain, outermost first so inner routers win.
    pub(crate) fn collect_user_data(&self, router: RouterId) -> Result<Kwargs, RouterError> {
        let mut merged = Kwargs::new();
        for id in self.ancestors(router)?.into_iter().rev() {
            merged.extend(&self.router_ref(id)?.user_data);
        }
        Ok(merged)
    }

    /// Record `url` as the current URL of `router` and every ancestor.
    pub(crate) fn update_target_url(&mut self, router: RouterId, url: &str) -> Result<(), RouterError> {
        for id in self.ancestors(router)? {
            let frame = self.router_ref(id)?.frame;
            self.frame_mut(frame)?.target_url = Some(url.to_string());
        }
        Ok(())
    }

    /// Drop the child routers of `router` and clear its frame.
    pub fn clear_router(&mut self, router: RouterId) -> Result<(), RouterError> {
        let router = self.router_mut(router)?;
        router.child_routers.clear();
        let frame = router.frame;
        self.clear_frame(frame)
    }

    /// Create a router for `config` mounted in `slot` and navigate it to its
    /// initial URL synchronously.
    pub(crate) fn instantiate(
        &mut self,
        config_id: ConfigId,
        parent: Option<RouterId>,
        slot: Slot,
        user_data: Kwargs,
        initial_url: Option<String>,
    ) -> Result<RouterId, RouterError> {
        let tree = Arc::clone(&self.tree);
        let config = tree.config(config_id)?;

        let target_url = match initial_url {
            Some(url) => url,
            None => parent
                .and_then(|p| self.target_url(p))
                .unwrap_or_else(|| config.base_path().to_string()),
        };
        let base_path = substitute_placeholders(config.base_path(), &target_url);
        let included: Vec<String> = config
            .included_paths()
            .map(|mask| substitute_wildcards(mask, &base_path))
            .collect();
        let masks = MaskSet::new(
            frame_masks(&included),
            frame_masks(config.excluded_paths()),
        );

        let router_id = RouterId(self.next_id());
        let frame_id = FrameId(self.next_id());
        let parent_frame = match slot {
            Slot::Frame(frame) => Some(frame),
            Slot::Page => None,
        };
        self.insert_frame(
            RouterFrame {
                id: frame_id,
                base_path: base_path.clone(),
                target_url: Some(target_url.clone()),
                masks,
                child_frames: BTreeMap::new(),
                use_browser_history: config.browser_history(),
                change_title: config.change_title(),
                parent_frame,
                owner: FrameOwner::Router(router_id),
                generation: 0,
                built: false,
            },
            slot,
        );

        if let Some(parent) = parent {
            self.router_mut(parent)?
                .child_routers
                .insert(base_path.clone(), router_id);
        }
        let mut router = Router {
            id: router_id,
            config: config_id,
            frame: frame_id,
            base_path,
            parent,
            child_routers: BTreeMap::new(),
            user_data,
            use_browser_history: config.browser_history(),
            on_navigate: None,
            on_resolve: None,
            on_open: None,
        };
        if let Some(hook) = config.on_instance_created() {
            hook(&mut router);
        }
        info_log!(
            "Created {} for {} at '{}' in {}",
            router_id,
            config_id,
            router.base_path,
            frame_id
        );
        self.routers.insert(router_id, router);

        self.navigate_inner(
            router_id,
            NavigationTarget::Path(target_url),
            NavigateOptions::initial(),
        )?;
        Ok(router_id)
    }

    pub(crate) fn router_ref(&self, router: RouterId) -> Result<&Router, RouterError> {
        self.routers
            .get(&router)
            .ok_or(RouterError::UnknownRouter(router))
    }

    /// Mutable access to a live router, e.g. to install hooks.
    pub fn router_mut(&mut self, router: RouterId) -> Result<&mut Router, RouterError> {
        self.routers
            .get_mut(&router)
            .ok_or(RouterError::UnknownRouter(router))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::config::{Outlet, RouteTree, View};

    fn page(text: &'static str) -> Builder {
        Builder::new(move |scope, _| scope.add(Element::label(text)))
    }

    fn open(outlet: Outlet, url: &str) -> (Session, MemoryBackend, RouterId) {
        let tree = RouteTree::build(outlet).unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        let root = session.open(url).unwrap();
        (session, backend, root)
    }

    #[test]
    fn options_presets() {
        let initial = NavigateOptions::initial();
        assert!(initial.sync && initial.server_side && !initial.history);
        assert!(!NavigateOptions::browser().server_side);
        assert!(!NavigateOptions::default().sync);
    }

    #[test]
    fn navigation_target_path() {
        assert_eq!(NavigationTarget::from("/a").path(), "/a");
        assert_eq!(NavigationTarget::from(Target::new("/b?x=1")).path(), "/b?x=1");
    }

    #[test]
    fn initial_navigation_skips_history() {
        let (_, backend, _) = open(Outlet::new("/").view("/", page("home")), "/");
        assert_eq!(backend.render(), vec!["home"]);
        assert!(backend.scripts().is_empty());
    }

    #[test]
    fn server_side_navigation_pushes_history() {
        let (mut session, backend, root) = open(
            Outlet::new("/").view("/", page("home")).view("/about", page("about")),
            "/",
        );
        let result = session
            .navigate(root, "/about", NavigateOptions::default().sync(true))
            .unwrap();

        assert_eq!(result, NavigationResult::Success { path: "/about".into() });
        assert_eq!(backend.scripts(), vec![push_state_script("/about")]);
        assert_eq!(backend.render(), vec!["about"]);
    }

    #[test]
    fn browser_navigation_does_not_push_history() {
        let (mut session, backend, root) = open(
            Outlet::new("/").view("/", page("home")).view("/about", page("about")),
            "/",
        );
        session
            .navigate(root, "/about", NavigateOptions::browser().sync(true))
            .unwrap();
        assert!(backend.scripts().is_empty());
    }

    #[test]
    fn disabled_browser_history_skips_push() {
        let (mut session, backend, root) = open(
            Outlet::new("/")
                .browser_history(false)
                .view("/", page("home"))
                .view("/about", page("about")),
            "/",
        );
        session
            .navigate(root, "/about", NavigateOptions::default().sync(true))
            .unwrap();
        assert!(backend.scripts().is_empty());
    }

    #[test]
    fn router_on_resolve_bypasses_table() {
        let tree = RouteTree::build(
            Outlet::new("/")
                .view("/", page("home"))
                .on_instance_created(|router| {
                    router.on_resolve(|path| {
                        (path == "/dynamic").then(|| Target::new(path).with_builder(page("dynamic")))
                    });
                }),
        )
        .unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        let root = session.open("/").unwrap();

        let result = session
            .navigate(root, "/dynamic", NavigateOptions::default().sync(true))
            .unwrap();
        assert!(result.is_success());
        assert_eq!(backend.render(), vec!["dynamic"]);
    }

    #[test]
    fn context_carries_previous_and_target_url() {
        let tree = RouteTree::build(
            Outlet::new("/").view("/", page("home")).view(
                "/next",
                Builder::new(|scope, kwargs| {
                    let previous = kwargs.get_str("previous_url_path").unwrap_or_default();
                    let target = kwargs.get_str("target_url").unwrap_or_default();
                    scope.add(Element::label(format!("{previous} -> {target}")));
                }),
            ),
        )
        .unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        let root = session.open("/").unwrap();

        session
            .navigate(root, "/next?x=1", NavigateOptions::default().sync(true))
            .unwrap();
        assert_eq!(backend.render(), vec!["/ -> /next?x=1"]);
    }

    #[test]
    fn query_args_reach_builder() {
        let tree = RouteTree::build(Outlet::new("/").add(View::new(
            "/search",
            Builder::new(|scope, kwargs| {
                let q = kwargs.get_str("q").unwrap_or("none");
                scope.add(Element::label(format!("q={q}")));
            })
            .accepts(["q"]),
        )))
        .unwrap();
        let backend = MemoryBackend::new();
        let mut session = Session::new(tree, backend.clone());
        session.open("/search?q=rust+lang&q=other").unwrap();

        assert_eq!(backend.render(), vec!["q=rust lang"]);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (session, _, root) = open(
            Outlet::new("/")
                .view("/", page("home"))
                .outlet(Outlet::new("/docs").view("/", page("docs"))),
            "/docs",
        );
        let child = *session.router(root).unwrap().child_routers().get("/docs").unwrap();
        assert_eq!(session.ancestors(child).unwrap(), vec![child, root]);
    }

    #[test]
    fn not_found_page_is_rendered() {
        let (mut session, backend, root) = open(Outlet::new("/").view("/", page("home")), "/");
        let result = session
            .navigate(root, "/missing", NavigateOptions::default().sync(true))
            .unwrap();

        assert!(result.is_not_found());
        assert_eq!(
            backend.render(),
            vec![
                "Oops! Page Not Found",
                "Sorry, the page you are looking for could not be found."
            ]
        );
        assert_eq!(backend.title().as_deref(), Some(NOT_FOUND_TITLE));
    }
}
