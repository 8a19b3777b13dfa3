//! Router frames.
//!
//! A [`RouterFrame`] is the mounted region whose content a navigation swaps.
//! Frames live in the session's arena and are addressed by [`FrameId`]. Each
//! frame records the URL it currently shows, the masks of the paths it
//! handles, and the child frames mounted inside its content, keyed by their
//! base path.
//!
//! Every content swap bumps the frame's generation. Background builds capture
//! the generation they were issued for and are only committed if it is still
//! current, so a slow build never lands in a frame that has moved on.

use crate::backend::Slot;
use crate::builder::{BuildFn, Builder};
use crate::error::{NavigationResult, RouterError};
use crate::history::{anchor_script, push_state_script};
use crate::hooks::ResolveHook;
use crate::kwargs::Kwargs;
use crate::mask::{frame_masks, strip_query, MaskSet};
use crate::router::{not_found_builder, NavigateOptions, NavigationTarget, RouterId, NOT_FOUND_TITLE};
use crate::session::{Scope, Session};
use crate::{debug_log, trace_log, warn_log};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of a [`RouterFrame`] within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub(crate) u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Who resolves paths for a frame.
#[derive(Clone)]
pub enum FrameOwner {
    /// The frame is the content area of a router.
    Router(RouterId),
    /// A standalone frame with a resolve hook.
    Resolver(ResolveHook),
    /// A standalone frame nobody resolves for yet.
    Detached,
}

impl fmt::Debug for FrameOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOwner::Router(router) => f.debug_tuple("Router").field(router).finish(),
            FrameOwner::Resolver(_) => f.write_str("Resolver"),
            FrameOwner::Detached => f.write_str("Detached"),
        }
    }
}

/// Options for a standalone frame mounted with [`Scope::mount_frame`].
#[derive(Debug, Clone)]
pub struct FrameOptions {
    path: String,
    included: Vec<String>,
    excluded: Vec<String>,
    browser_history: bool,
    change_title: bool,
}

impl FrameOptions {
    /// A frame handling `path` and everything below it.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            included: Vec::new(),
            excluded: Vec::new(),
            browser_history: true,
            change_title: true,
        }
    }

    /// Handle `mask` in addition to the frame's own path.
    #[must_use]
    pub fn include(mut self, mask: impl Into<String>) -> Self {
        self.included.push(mask.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, mask: impl Into<String>) -> Self {
        self.excluded.push(mask.into());
        self
    }

    #[must_use]
    pub fn browser_history(mut self, enabled: bool) -> Self {
        self.browser_history = enabled;
        self
    }

    #[must_use]
    pub fn change_title(mut self, enabled: bool) -> Self {
        self.change_title = enabled;
        self
    }
}

/// A mounted, swappable content region.
#[derive(Debug)]
pub struct RouterFrame {
    pub(crate) id: FrameId,
    pub(crate) base_path: String,
    pub(crate) target_url: Option<String>,
    pub(crate) masks: MaskSet,
    pub(crate) child_frames: BTreeMap<String, FrameId>,
    pub(crate) use_browser_history: bool,
    pub(crate) change_title: bool,
    pub(crate) parent_frame: Option<FrameId>,
    pub(crate) owner: FrameOwner,
    pub(crate) generation: u64,
    pub(crate) built: bool,
}

impl RouterFrame {
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Base path with placeholders already substituted.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// URL the frame currently shows.
    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    pub fn masks(&self) -> &MaskSet {
        &self.masks
    }

    /// Child frames keyed by their base path.
    pub fn child_frames(&self) -> &BTreeMap<String, FrameId> {
        &self.child_frames
    }

    pub fn parent_frame(&self) -> Option<FrameId> {
        self.parent_frame
    }

    pub fn owner(&self) -> &FrameOwner {
        &self.owner
    }

    /// Bumped by every content swap.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` once the current content finished building.
    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn use_browser_history(&self) -> bool {
        self.use_browser_history
    }

    pub fn change_title(&self) -> bool {
        self.change_title
    }

    /// `true` if links to `path` are handled in place.
    pub fn handles(&self, path: &str) -> bool {
        self.masks.handles(path)
    }

    /// The child frame whose base path equals `path` or prefixes it.
    pub fn child_for(&self, path: &str) -> Option<FrameId> {
        let path = strip_query(path);
        self.child_frames.iter().find_map(|(prefix, frame)| {
            let below = path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'));
            (path == prefix || below).then_some(*frame)
        })
    }
}

/// A content swap handed to [`Session::update_content`].
pub(crate) struct BuildRequest {
    pub(crate) builder: Builder,
    pub(crate) kwargs: Kwargs,
    pub(crate) title: Option<String>,
    pub(crate) fragment: Option<String>,
    pub(crate) router: Option<RouterId>,
}

/// A build waiting for [`Session::run_pending`].
pub(crate) struct PendingBuild {
    pub(crate) frame: FrameId,
    pub(crate) generation: u64,
    pub(crate) request: BuildRequest,
}

impl Session {
    /// Mount a standalone frame into `slot`.
    ///
    /// The frame resolves nothing until a resolver is attached with
    /// [`Session::set_frame_resolver`].
    pub fn mount_frame(&mut self, slot: Slot, options: FrameOptions) -> FrameId {
        let id = FrameId(self.next_id());
        let base_path = options.path.trim_end_matches('/').to_string();
        let mut included = vec![options.path.clone()];
        included.extend(options.included);
        let parent_frame = match slot {
            Slot::Frame(parent) => Some(parent),
            Slot::Page => None,
        };
        let frame = RouterFrame {
            id,
            base_path: base_path.clone(),
            target_url: None,
            masks: MaskSet::new(frame_masks(&included), frame_masks(&options.excluded)),
            child_frames: BTreeMap::new(),
            use_browser_history: options.browser_history,
            change_title: options.change_title,
            parent_frame,
            owner: FrameOwner::Detached,
            generation: 0,
            built: false,
        };
        self.insert_frame(frame, slot);
        debug_log!("Mounted standalone {} for '{}'", id, base_path);
        id
    }

    pub(crate) fn insert_frame(&mut self, frame: RouterFrame, slot: Slot) {
        let id = frame.id;
        if let Some(parent) = frame.parent_frame.and_then(|p| self.frames.get_mut(&p)) {
            parent.child_frames.insert(frame.base_path.clone(), id);
        }
        self.frames.insert(id, frame);
        self.backend.frame_created(id, slot);
    }

    /// Attach a resolve hook to a standalone frame.
    pub fn set_frame_resolver<F>(&mut self, frame: FrameId, hook: F) -> Result<(), RouterError>
    where
        F: Fn(&str) -> Option<crate::target::Target> + Send + Sync + 'static,
    {
        let frame = self.frame_mut(frame)?;
        frame.owner = FrameOwner::Resolver(Arc::new(hook));
        Ok(())
    }

    /// Navigate a frame.
    ///
    /// A child frame whose base path equals or prefixes `path` takes the
    /// request. Otherwise the owning router handles it, or the frame's
    /// resolve hook.
    ///
    /// # Errors
    ///
    /// [`RouterError::MissingResolver`] for a frame with neither.
    pub fn navigate_frame(
        &mut self,
        frame: FrameId,
        path: &str,
        server_side: bool,
        sync: bool,
    ) -> Result<NavigationResult, RouterError> {
        let result = self.navigate_frame_inner(frame, path, server_side, sync)?;
        self.drain_deferred()?;
        Ok(result)
    }

    pub(crate) fn navigate_frame_inner(
        &mut self,
        frame_id: FrameId,
        path: &str,
        server_side: bool,
        sync: bool,
    ) -> Result<NavigationResult, RouterError> {
        let frame = self.frame_ref(frame_id)?;
        if let Some(child) = frame.child_for(path) {
            trace_log!("{} delegating '{}' to child {}", frame_id, path, child);
            return self.navigate_frame_inner(child, path, server_side, sync);
        }

        match frame.owner.clone() {
            FrameOwner::Router(router) => {
                let options = NavigateOptions {
                    server_side,
                    sync,
                    history: true,
                };
                self.navigate_inner(router, NavigationTarget::Path(path.to_string()), options)
            }
            FrameOwner::Resolver(hook) => self.resolve_in_frame(frame_id, &hook, path, server_side, sync),
            FrameOwner::Detached => Err(RouterError::MissingResolver {
                frame: frame_id,
                path: path.to_string(),
            }),
        }
    }

    fn resolve_in_frame(
        &mut self,
        frame_id: FrameId,
        hook: &ResolveHook,
        path: &str,
        server_side: bool,
        sync: bool,
    ) -> Result<NavigationResult, RouterError> {
        let Some(target) = hook(path).filter(|target| target.valid) else {
            debug_log!("Resolver of {} suppressed '{}'", frame_id, path);
            return Ok(NavigationResult::Suppressed {
                path: path.to_string(),
            });
        };

        let (builder, title, not_found) = match target.builder.clone() {
            Some(builder) => (builder, target.title.clone(), false),
            None => {
                if let Some(fragment) = target.fragment.clone() {
                    self.backend.run_javascript(&anchor_script(&fragment));
                    return Ok(NavigationResult::Anchor { fragment });
                }
                (self.not_found(), Some(NOT_FOUND_TITLE.to_string()), true)
            }
        };

        let frame = self.frame_mut(frame_id)?;
        frame.target_url = Some(target.original_path.clone());
        let push_history = server_side && frame.use_browser_history;
        if push_history {
            self.backend
                .run_javascript(&push_state_script(&target.original_path));
        }

        let mut kwargs = Kwargs::new();
        for (name, value) in target.path_args.iter() {
            kwargs.insert_str(name.as_str(), value.as_str());
        }
        for (name, value) in target.query_args.iter_first() {
            kwargs.insert_str(name.as_str(), value.as_str());
        }
        if !kwargs.contains("url_path") {
            kwargs.insert_str("url_path", target.original_path.as_str());
        }

        let request = BuildRequest {
            builder,
            kwargs,
            title,
            fragment: if not_found { None } else { target.fragment },
            router: None,
        };
        self.update_content(frame_id, request, sync)?;

        let path = target.original_path;
        Ok(if not_found {
            NavigationResult::NotFound { path }
        } else {
            NavigationResult::Success { path }
        })
    }

    /// Clear `frame` and build new content into it.
    ///
    /// Synchronous builders run before this returns when `sync` is set.
    /// Everything else is queued for [`Session::run_pending`].
    pub(crate) fn update_content(
        &mut self,
        frame_id: FrameId,
        request: BuildRequest,
        sync: bool,
    ) -> Result<(), RouterError> {
        self.clear_frame(frame_id)?;
        let generation = self.frame_ref(frame_id)?.generation;

        match request.builder.func().clone() {
            BuildFn::Sync(func) if sync => {
                let kwargs = request.builder.prepare(&request.kwargs);
                {
                    let mut scope = Scope::new(self, Slot::Frame(frame_id), request.router);
                    func(&mut scope, &kwargs);
                }
                self.finish_build(frame_id, generation, request.title, request.fragment);
            }
            func => {
                if sync && matches!(func, BuildFn::Async(_)) {
                    warn_log!(
                        "Async builder for {} cannot run synchronously; queueing it",
                        frame_id
                    );
                }
                trace_log!("Queued build for {} (generation {})", frame_id, generation);
                self.pending.push_back(PendingBuild {
                    frame: frame_id,
                    generation,
                    request,
                });
            }
        }
        Ok(())
    }

    /// `true` if `frame` still exists and has not been cleared since
    /// `generation` was captured.
    pub(crate) fn is_current(&self, frame: FrameId, generation: u64) -> bool {
        self.frames
            .get(&frame)
            .is_some_and(|f| f.generation == generation)
    }

    /// Commit step shared by synchronous and background builds.
    pub(crate) fn finish_build(
        &mut self,
        frame_id: FrameId,
        generation: u64,
        title: Option<String>,
        fragment: Option<String>,
    ) {
        if !self.is_current(frame_id, generation) {
            debug_log!("Discarding stale build for {} (generation {})", frame_id, generation);
            return;
        }
        if let Some(fragment) = fragment {
            self.backend.run_javascript(&anchor_script(&fragment));
        }
        let Some(frame) = self.frames.get_mut(&frame_id) else {
            return;
        };
        frame.built = true;
        // Containers leave the title to the leaf frame below them.
        if frame.change_title && frame.child_frames.is_empty() {
            if let Some(title) = title.or_else(|| self.options.default_title.clone()) {
                self.backend.set_title(&title);
            }
        }
    }

    /// Unmount the content of `frame` and drop every child frame below it.
    pub(crate) fn clear_frame(&mut self, frame_id: FrameId) -> Result<(), RouterError> {
        let frame = self.frame_mut(frame_id)?;
        let children: Vec<FrameId> = std::mem::take(&mut frame.child_frames).into_values().collect();
        frame.generation += 1;
        frame.built = false;
        for child in children {
            self.remove_frame_subtree(child);
        }
        self.backend.clear(Slot::Frame(frame_id));
        Ok(())
    }

    /// Remove `frame`, its descendants and the routers owning them.
    pub(crate) fn remove_frame_subtree(&mut self, frame_id: FrameId) {
        let Some(frame) = self.frames.remove(&frame_id) else {
            return;
        };
        for child in frame.child_frames.into_values() {
            self.remove_frame_subtree(child);
        }
        if let Some(parent) = frame.parent_frame.and_then(|p| self.frames.get_mut(&p)) {
            parent.child_frames.retain(|_, id| *id != frame_id);
        }
        if let FrameOwner::Router(router_id) = frame.owner {
            if let Some(router) = self.routers.remove(&router_id) {
                if let Some(parent) = router.parent.and_then(|p| self.routers.get_mut(&p)) {
                    parent.child_routers.retain(|_, id| *id != router_id);
                }
            }
        }
        self.backend.frame_removed(frame_id);
        trace_log!("Removed {}", frame_id);
    }

    pub(crate) fn frame_ref(&self, frame: FrameId) -> Result<&RouterFrame, RouterError> {
        self.frames.get(&frame).ok_or(RouterError::UnknownFrame(frame))
    }

    pub(crate) fn frame_mut(&mut self, frame: FrameId) -> Result<&mut RouterFrame, RouterError> {
        self.frames
            .get_mut(&frame)
            .ok_or(RouterError::UnknownFrame(frame))
    }

    pub(crate) fn not_found(&self) -> Builder {
        self.options
            .not_found
            .clone()
            .unwrap_or_else(not_found_builder)
    }
}
