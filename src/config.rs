//! Declarative route trees.
//!
//! Applications describe their routes with [`Outlet`] and [`View`]
//! declarations. [`RouteTree::build`] validates the declarations and freezes
//! them into an arena of [`RouterConfig`]s, one per outlet, addressed by
//! [`ConfigId`]. A built tree is immutable and shared by every session
//! through an `Arc`.
//!
//! ```
//! use frame_navigator::{Builder, Element, Outlet, RouteTree, View};
//!
//! let tree = RouteTree::build(
//!     Outlet::new("/")
//!         .view("/", Builder::new(|scope, _| scope.add(Element::label("home"))))
//!         .add(View::new("/about", Builder::new(|_, _| {})).title("About").name("about"))
//!         .outlet(
//!             Outlet::new("/services/{service_name}")
//!                 .view("/", Builder::new(|_, _| {}))
//!                 .view("/vm", Builder::new(|_, _| {})),
//!         ),
//! )
//! .unwrap();
//!
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree.url_for("about", &Default::default()).unwrap(), "/about");
//! ```

use crate::builder::Builder;
use crate::error::RouterError;
use crate::hooks::{InstanceHook, NavigateHook, OpenHook, PageTemplate};
use crate::kwargs::Kwargs;
use crate::mask::create_path_mask;
use crate::params::RouteParams;
use crate::pattern::{join_path, normalize_path, RoutePattern};
use crate::router::Router;
use crate::table::{RouteEntry, RouteTable};
use crate::target::Target;
use crate::{debug_log, trace_log};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Declarations
// ============================================================================

/// A leaf page declared inside an [`Outlet`].
pub struct View {
    path: String,
    builder: Builder,
    title: Option<String>,
    name: Option<String>,
    on_open: Option<OpenHook>,
}

impl View {
    /// `path` is relative to the enclosing outlet's base path.
    pub fn new(path: impl Into<String>, builder: Builder) -> Self {
        Self {
            path: path.into(),
            builder,
            title: None,
            name: None,
            on_open: None,
        }
    }

    /// Page title shown while this view is active.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Name used for reverse URL lookups.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_open<F>(mut self, hook: F) -> Self
    where
        F: Fn(Target, &Kwargs) -> Target + Send + Sync + 'static,
    {
        self.on_open = Some(Arc::new(hook));
        self
    }
}

/// A routed region with its own views, layout and nested outlets.
pub struct Outlet {
    path: String,
    views: Vec<View>,
    children: Vec<Outlet>,
    template: Option<Arc<dyn PageTemplate>>,
    on_navigate: Option<NavigateHook>,
    on_open: Option<OpenHook>,
    on_instance_created: Option<InstanceHook>,
    browser_history: bool,
    change_title: bool,
    excluded: Vec<String>,
}

impl Outlet {
    /// Declare an outlet. For the root outlet `path` is absolute; for nested
    /// outlets it is relative to the parent's base path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            views: Vec::new(),
            children: Vec::new(),
            template: None,
            on_navigate: None,
            on_open: None,
            on_instance_created: None,
            browser_history: true,
            change_title: true,
            excluded: Vec::new(),
        }
    }

    /// Add a view at `path` (relative to this outlet).
    pub fn view(self, path: impl Into<String>, builder: Builder) -> Self {
        self.add(View::new(path, builder))
    }

    pub fn add(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    /// Nest `child` below this outlet.
    pub fn outlet(mut self, child: Outlet) -> Self {
        self.children.push(child);
        self
    }

    /// Shared layout rendered around this outlet's content area.
    pub fn layout(mut self, template: impl PageTemplate + 'static) -> Self {
        self.template = Some(Arc::new(template));
        self
    }

    /// Navigation hook: return `None` to veto, another path to rewrite.
    pub fn on_navigate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.on_navigate = Some(Arc::new(hook));
        self
    }

    pub fn on_open<F>(mut self, hook: F) -> Self
    where
        F: Fn(Target, &Kwargs) -> Target + Send + Sync + 'static,
    {
        self.on_open = Some(Arc::new(hook));
        self
    }

    /// Called with every router created for this outlet.
    pub fn on_instance_created<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Router) + Send + Sync + 'static,
    {
        self.on_instance_created = Some(Arc::new(hook));
        self
    }

    /// Push browser history entries for server-side navigation (default `true`).
    pub fn browser_history(mut self, enabled: bool) -> Self {
        self.browser_history = enabled;
        self
    }

    /// Let this outlet's leaf views set the page title (default `true`).
    pub fn change_title(mut self, enabled: bool) -> Self {
        self.change_title = enabled;
        self
    }

    /// Exclude a glob mask from this outlet's frame; links to it cause a full
    /// page load.
    pub fn exclude(mut self, mask: impl Into<String>) -> Self {
        self.excluded.push(mask.into());
        self
    }
}

// ============================================================================
// Frozen configs
// ============================================================================

/// Index of a [`RouterConfig`] inside its [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigId(pub(crate) usize);

impl ConfigId {
    /// The root outlet of every tree.
    pub const ROOT: ConfigId = ConfigId(0);
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config#{}", self.0)
    }
}

/// The frozen form of one [`Outlet`].
pub struct RouterConfig {
    id: ConfigId,
    base_path: String,
    parent: Option<ConfigId>,
    children: Vec<ConfigId>,
    table: RouteTable,
    included_paths: BTreeSet<String>,
    excluded_paths: BTreeSet<String>,
    template: Option<Arc<dyn PageTemplate>>,
    on_navigate: Option<NavigateHook>,
    on_open: Option<OpenHook>,
    on_instance_created: Option<InstanceHook>,
    browser_history: bool,
    change_title: bool,
}

impl RouterConfig {
    pub fn id(&self) -> ConfigId {
        self.id
    }

    /// Absolute base path, possibly containing `{param}` placeholders.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn parent(&self) -> Option<ConfigId> {
        self.parent
    }

    pub fn children(&self) -> &[ConfigId] {
        &self.children
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Sorted glob masks of every view and nested outlet.
    pub fn included_paths(&self) -> impl Iterator<Item = &str> {
        self.included_paths.iter().map(String::as_str)
    }

    pub fn excluded_paths(&self) -> impl Iterator<Item = &str> {
        self.excluded_paths.iter().map(String::as_str)
    }

    pub fn template(&self) -> Option<&Arc<dyn PageTemplate>> {
        self.template.as_ref()
    }

    pub fn on_open(&self) -> Option<&OpenHook> {
        self.on_open.as_ref()
    }

    pub fn on_instance_created(&self) -> Option<&InstanceHook> {
        self.on_instance_created.as_ref()
    }

    pub fn browser_history(&self) -> bool {
        self.browser_history
    }

    pub fn change_title(&self) -> bool {
        self.change_title
    }

    /// Resolve a URL against this config's own table.
    pub fn resolve_target(&self, url: &str) -> Target {
        self.table.resolve(url, self.id)
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("id", &self.id)
            .field("base_path", &self.base_path)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("table", &self.table)
            .field("included_paths", &self.included_paths)
            .field("excluded_paths", &self.excluded_paths)
            .finish()
    }
}

/// An immutable tree of router configs.
#[derive(Debug)]
pub struct RouteTree {
    configs: Vec<RouterConfig>,
    names: HashMap<String, (ConfigId, usize)>,
}

impl RouteTree {
    /// Validate and freeze an outlet declaration.
    ///
    /// # Errors
    ///
    /// Fails on malformed route patterns and on route names used twice.
    pub fn build(root: Outlet) -> Result<Arc<Self>, RouterError> {
        let mut tree = Self {
            configs: Vec::new(),
            names: HashMap::new(),
        };
        let base_path = normalize_path(&root.path).into_owned();
        tree.add_config(root, base_path, None)?;
        debug_log!("Built route tree with {} configs", tree.configs.len());
        Ok(Arc::new(tree))
    }

    fn add_config(
        &mut self,
        outlet: Outlet,
        base_path: String,
        parent: Option<ConfigId>,
    ) -> Result<ConfigId, RouterError> {
        let Outlet {
            views,
            children,
            template,
            on_navigate,
            on_open,
            on_instance_created,
            browser_history,
            change_title,
            excluded,
            ..
        } = outlet;

        let id = ConfigId(self.configs.len());
        self.configs.push(RouterConfig {
            id,
            base_path: base_path.clone(),
            parent,
            children: Vec::new(),
            table: RouteTable::new(),
            included_paths: BTreeSet::new(),
            excluded_paths: excluded.into_iter().collect(),
            template,
            on_navigate,
            on_open,
            on_instance_created,
            browser_history,
            change_title,
        });

        let mut table = RouteTable::new();
        let mut included = BTreeSet::new();

        for view in views {
            let url = join_path(&base_path, &view.path);
            let pattern = RoutePattern::parse(&url)?;
            included.insert(pattern.mask());
            let entry = RouteEntry::view(pattern, view.builder)
                .with_title(view.title)
                .with_name(view.name.clone())
                .with_on_open(view.on_open);
            let index = table.push(entry);
            if let Some(name) = view.name {
                if self.names.contains_key(&name) {
                    return Err(RouterError::DuplicateName { name });
                }
                self.names.insert(name, (id, index));
            }
            trace_log!("Registered view '{}' in {}", url, id);
        }

        let mut child_ids = Vec::with_capacity(children.len());
        for child in children {
            let child_base = join_path(&base_path, &child.path);
            let pattern = RoutePattern::parse(&format!("{}/*", child_base.trim_end_matches('/')))?;
            let child_id = self.add_config(child, child_base.clone(), Some(id))?;
            included.insert(create_path_mask(&child_base));
            table.push(RouteEntry::outlet(pattern, child_id));
            child_ids.push(child_id);
            trace_log!("Registered outlet '{}' as {} in {}", child_base, child_id, id);
        }

        let config = &mut self.configs[id.0];
        config.table = table;
        config.included_paths = included;
        config.children = child_ids;
        Ok(id)
    }

    pub fn root(&self) -> &RouterConfig {
        &self.configs[0]
    }

    pub fn get(&self, id: ConfigId) -> Option<&RouterConfig> {
        self.configs.get(id.0)
    }

    pub(crate) fn config(&self, id: ConfigId) -> Result<&RouterConfig, RouterError> {
        self.get(id).ok_or(RouterError::UnknownConfig(id))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouterConfig> {
        self.configs.iter()
    }

    /// Run the `on_navigate` hooks of `config` and its ancestors.
    ///
    /// The first hook that vetoes (`None`) or rewrites the path decides the
    /// outcome; otherwise the path is returned unchanged.
    pub fn handle_navigate(&self, config: ConfigId, path: &str) -> Option<String> {
        let mut current = self.get(config);
        while let Some(cfg) = current {
            if let Some(hook) = &cfg.on_navigate {
                let result = hook(path);
                if result.as_deref() != Some(path) {
                    return result;
                }
            }
            current = cfg.parent.and_then(|parent| self.get(parent));
        }
        Some(path.to_string())
    }

    /// The route entry registered under `name`.
    pub fn route_by_name(&self, name: &str) -> Option<(ConfigId, &Arc<RouteEntry>)> {
        let (config, index) = *self.names.get(name)?;
        let entry = self.get(config)?.table.get(index)?;
        Some((config, entry))
    }

    /// Build the URL of a named view.
    ///
    /// # Errors
    ///
    /// [`RouterError::UnknownRoute`] for unknown names,
    /// [`RouterError::MissingParam`] when `params` lacks a value.
    pub fn url_for(&self, name: &str, params: &RouteParams) -> Result<String, RouterError> {
        let (_, entry) = self
            .route_by_name(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        entry.pattern().url_for(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Builder {
        Builder::new(|_, _| {})
    }

    fn services_tree() -> Arc<RouteTree> {
        RouteTree::build(
            Outlet::new("/")
                .view("/", noop())
                .view("/about", noop())
                .outlet(
                    Outlet::new("/services/{service_name}")
                        .view("/", noop())
                        .add(View::new("/vm/{vm}", noop()).name("vm")),
                ),
        )
        .unwrap()
    }

    #[test]
    fn nested_paths_are_absolute() {
        let tree = services_tree();
        let child = tree.get(ConfigId(1)).unwrap();

        assert_eq!(child.base_path(), "/services/{service_name}");
        assert_eq!(child.parent(), Some(ConfigId::ROOT));
        let patterns: Vec<&str> = child
            .table()
            .entries()
            .iter()
            .map(|e| e.pattern().as_str())
            .collect();
        assert_eq!(
            patterns,
            vec!["/services/{service_name}", "/services/{service_name}/vm/{vm}"]
        );
    }

    #[test]
    fn outlet_entries_follow_views() {
        let tree = services_tree();
        let root = tree.root();
        let last = root.table().entries().last().unwrap();

        assert!(last.is_outlet());
        assert_eq!(last.pattern().as_str(), "/services/{service_name}/*");
        assert_eq!(last.outlet_config(), Some(ConfigId(1)));
        assert_eq!(root.children(), &[ConfigId(1)]);
    }

    #[test]
    fn included_paths_are_masks() {
        let tree = services_tree();
        let root: Vec<&str> = tree.root().included_paths().collect();
        assert_eq!(root, vec!["/", "/about", "/services/*"]);
    }

    #[test]
    fn malformed_pattern_fails_build() {
        let err = RouteTree::build(Outlet::new("/").view("/users/{id", noop())).unwrap_err();
        assert!(err.is_registration_error());
    }

    #[test]
    fn duplicate_names_fail_build() {
        let err = RouteTree::build(
            Outlet::new("/")
                .add(View::new("/a", noop()).name("x"))
                .add(View::new("/b", noop()).name("x")),
        )
        .unwrap_err();
        assert_eq!(err, RouterError::DuplicateName { name: "x".into() });
    }

    #[test]
    fn url_for_named_view() {
        let tree = services_tree();
        let params: RouteParams = [("service_name", "compute"), ("vm", "vm-1")]
            .into_iter()
            .collect();
        assert_eq!(
            tree.url_for("vm", &params).unwrap(),
            "/services/compute/vm/vm-1"
        );
        assert_eq!(
            tree.url_for("nope", &params).unwrap_err(),
            RouterError::UnknownRoute("nope".into())
        );
    }

    #[test]
    fn handle_navigate_walks_parents() {
        let tree = RouteTree::build(
            Outlet::new("/")
                .on_navigate(|path| (path != "/admin").then(|| path.to_string()))
                .outlet(
                    Outlet::new("/docs")
                        .on_navigate(|path| Some(path.replace("/old", "/new")))
                        .view("/new", noop()),
                ),
        )
        .unwrap();

        let docs = ConfigId(1);
        assert_eq!(tree.handle_navigate(docs, "/docs/old"), Some("/docs/new".into()));
        assert_eq!(tree.handle_navigate(docs, "/admin"), None);
        assert_eq!(tree.handle_navigate(docs, "/docs/x"), Some("/docs/x".into()));
    }

    #[test]
    fn config_resolves_against_own_table() {
        let tree = services_tree();
        let target = tree.root().resolve_target("/about");
        assert_eq!(target.route_pattern(), Some("/about"));
        assert_eq!(target.config, Some(ConfigId::ROOT));
    }
}
