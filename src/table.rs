//! Ordered route tables.
//!
//! # Ordering
//!
//! A [`RouteTable`] is matched first-entry-wins, in registration order. The
//! order is part of the table's contract: register specific literal routes
//! before parameter or wildcard routes that would shadow them. Route trees
//! built from an [`Outlet`](crate::Outlet) register an outlet's views in
//! declaration order, followed by one trailing-`*` entry per nested outlet,
//! also in declaration order. A nested outlet therefore never shadows a view
//! of its parent.

use crate::builder::Builder;
use crate::config::ConfigId;
use crate::hooks::OpenHook;
use crate::pattern::{split_path, PatternMatch, RoutePattern};
use crate::target::{ParsedUrl, Target};
use crate::trace_log;
use std::fmt;
use std::sync::Arc;

/// One registered route.
#[derive(Clone)]
pub struct RouteEntry {
    pattern: RoutePattern,
    builder: Builder,
    title: Option<String>,
    on_open: Option<OpenHook>,
    name: Option<String>,
    /// Config rendered by this entry when it is an outlet entry.
    outlet: Option<ConfigId>,
}

impl RouteEntry {
    /// A leaf view.
    pub fn view(pattern: RoutePattern, builder: Builder) -> Self {
        Self {
            pattern,
            builder,
            title: None,
            on_open: None,
            name: None,
            outlet: None,
        }
    }

    /// An entry rendering the nested outlet `child`.
    pub(crate) fn outlet(pattern: RoutePattern, child: ConfigId) -> Self {
        let builder = Builder::new(move |scope, kwargs| {
            if let Err(err) = scope.mount_outlet(child, kwargs) {
                scope.fail(err);
            }
        });
        Self {
            outlet: Some(child),
            ..Self::view(pattern, builder)
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_on_open(mut self, hook: Option<OpenHook>) -> Self {
        self.on_open = hook;
        self
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn on_open(&self) -> Option<&OpenHook> {
        self.on_open.as_ref()
    }

    /// `true` for entries that render a nested outlet rather than a view.
    pub fn is_outlet(&self) -> bool {
        self.outlet.is_some()
    }

    pub fn outlet_config(&self) -> Option<ConfigId> {
        self.outlet
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern.as_str())
            .field("title", &self.title)
            .field("name", &self.name)
            .field("is_outlet", &self.is_outlet())
            .field("has_on_open", &self.on_open.is_some())
            .finish()
    }
}

/// Ordered collection of route entries.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<Arc<RouteEntry>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. It is tried after every entry pushed before it.
    pub fn push(&mut self, entry: RouteEntry) -> usize {
        self.entries.push(Arc::new(entry));
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Arc<RouteEntry>> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Arc<RouteEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<RouteEntry>> {
        self.entries.iter().find(|entry| entry.name() == Some(name))
    }

    /// Find the first entry matching `path` (no query or fragment).
    pub fn match_path(&self, path: &str) -> Option<(usize, PatternMatch)> {
        let segments = split_path(path);
        self.entries
            .iter()
            .enumerate()
            .find_map(|(index, entry)| {
                let matched = entry.pattern().match_segments(&segments)?;
                trace_log!("'{}' matched entry '{}'", path, entry.pattern());
                Some((index, matched))
            })
    }

    /// Resolve a full URL against this table.
    ///
    /// Never fails: an unmatched path yields a valid target without a route
    /// or builder, and a fragment-only URL yields a valid anchor target.
    pub fn resolve(&self, url: &str, config: ConfigId) -> Target {
        let parsed = ParsedUrl::parse(url);
        if parsed.path.is_empty() && parsed.fragment.is_some() {
            return Target::resolved(url, parsed, config, None);
        }
        let matched = self.match_path(&parsed.path);
        self.target_for(url, parsed, config, matched)
    }

    /// Assemble a target from an earlier [`match_path`](Self::match_path) result.
    pub(crate) fn target_for(
        &self,
        url: &str,
        parsed: ParsedUrl,
        config: ConfigId,
        matched: Option<(usize, PatternMatch)>,
    ) -> Target {
        let matched = matched.and_then(|(index, m)| Some((Arc::clone(self.get(index)?), m)));
        Target::resolved(url, parsed, config, matched)
    }
}
