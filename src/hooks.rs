//! Lifecycle hooks and layout templates.
//!
//! # Navigation pipeline
//!
//! When a router handles a navigation request, hooks run in this order:
//!
//! 1. **`on_navigate`**: router hook, then the config chain outward. Returning
//!    `None` vetoes the navigation; returning another path rewrites it.
//! 2. **`on_resolve`**: router hook that may produce a [`Target`] without
//!    consulting the route table.
//! 3. **`on_open`**: router hook, matched route entry hook, then each config
//!    hook from the owning config outward. A hook that changes the target's
//!    `original_path` restarts resolution.
//! 4. **`on_pre_update`**: carried by the target, runs before the frame is
//!    cleared.
//! 5. **`on_post_update`**: carried by the target, runs after the content swap
//!    was issued.
//!
//! All hooks are optional; a missing hook passes the value through.

use crate::kwargs::{Kwargs, ParamSet};
use crate::router::Router;
use crate::session::Scope;
use crate::target::Target;
use std::fmt;
use std::sync::Arc;

/// `on_navigate(path) -> Option<path>`.
pub type NavigateHook = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// `on_resolve(path) -> Option<Target>`.
pub type ResolveHook = Arc<dyn Fn(&str) -> Option<Target> + Send + Sync>;

/// `on_open(target, context) -> Target`.
pub type OpenHook = Arc<dyn Fn(Target, &Kwargs) -> Target + Send + Sync>;

/// Called with every router instantiated from a config.
pub type InstanceHook = Arc<dyn Fn(&mut Router) + Send + Sync>;

/// `on_pre_update` / `on_post_update` hook.
///
/// Like builders, update hooks declare which context names they accept and
/// only ever see those.
#[derive(Clone)]
pub struct UpdateHook {
    params: ParamSet,
    func: Arc<dyn Fn(&Kwargs) + Send + Sync>,
}

impl UpdateHook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Kwargs) + Send + Sync + 'static,
    {
        Self {
            params: ParamSet::Any,
            func: Arc::new(f),
        }
    }

    #[must_use]
    pub fn accepts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = ParamSet::only(names);
        self
    }

    pub fn call(&self, kwargs: &Kwargs) {
        (self.func)(&kwargs.filtered(&self.params));
    }
}

impl fmt::Debug for UpdateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateHook")
            .field("params", &self.params)
            .finish()
    }
}

// ============================================================================
// Layout templates
// ============================================================================

/// Shared chrome rendered around an outlet's content area.
///
/// `header` runs before the outlet's frame is mounted, `footer` after it. Both
/// return properties that are merged into the outlet router's `user_data`, so
/// every view below the outlet can receive them as keyword arguments. The
/// first build of the frame sees only the header's properties.
pub trait PageTemplate: Send + Sync {
    fn header(&self, scope: &mut Scope<'_>, kwargs: &Kwargs) -> Kwargs;

    fn footer(&self, _scope: &mut Scope<'_>, _kwargs: &Kwargs) -> Kwargs {
        Kwargs::new()
    }
}

type LayoutFn = dyn Fn(&mut Scope<'_>, &Kwargs) -> Kwargs + Send + Sync;

/// Closure-based [`PageTemplate`].
///
/// ```
/// use frame_navigator::{Element, Kwargs, Layout};
///
/// let layout = Layout::new(|scope, _| {
///     scope.add(Element::label("header"));
///     Kwargs::new().with("theme", "dark".to_string())
/// })
/// .with_footer(|scope, _| {
///     scope.add(Element::label("footer"));
///     Kwargs::new()
/// });
/// # let _ = layout;
/// ```
#[derive(Clone)]
pub struct Layout {
    header: Arc<LayoutFn>,
    footer: Option<Arc<LayoutFn>>,
}

impl Layout {
    pub fn new<F>(header: F) -> Self
    where
        F: Fn(&mut Scope<'_>, &Kwargs) -> Kwargs + Send + Sync + 'static,
    {
        Self {
            header: Arc::new(header),
            footer: None,
        }
    }

    #[must_use]
    pub fn with_footer<F>(mut self, footer: F) -> Self
    where
        F: Fn(&mut Scope<'_>, &Kwargs) -> Kwargs + Send + Sync + 'static,
    {
        self.footer = Some(Arc::new(footer));
        self
    }
}

impl PageTemplate for Layout {
    fn header(&self, scope: &mut Scope<'_>, kwargs: &Kwargs) -> Kwargs {
        (self.header)(scope, kwargs)
    }

    fn footer(&self, scope: &mut Scope<'_>, kwargs: &Kwargs) -> Kwargs {
        match &self.footer {
            Some(footer) => footer(scope, kwargs),
            None => Kwargs::new(),
        }
    }
}
