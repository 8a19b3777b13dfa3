//! Resolved navigation targets.
//!
//! A [`Target`] is what resolving a URL against a route table produces: the
//! matched entry (if any), its builder and title, the captured path and query
//! arguments, the fragment and the wildcard remainder. Targets are plain
//! values. Hooks that want to change the outcome return a *new* target; a
//! target whose `original_path` differs from the one handed in is treated as
//! a redirect and resolution starts over.

use crate::builder::Builder;
use crate::config::ConfigId;
use crate::hooks::UpdateHook;
use crate::params::{QueryParams, RouteParams};
use crate::pattern::PatternMatch;
use crate::router::RouterId;
use crate::table::RouteEntry;
use std::fmt;
use std::sync::Arc;

/// A URL split into path, query and fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl ParsedUrl {
    /// Split `url` at `#` and then at `?`. Empty query and fragment parts
    /// become `None`.
    ///
    /// ```
    /// use frame_navigator::ParsedUrl;
    ///
    /// let url = ParsedUrl::parse("/docs/intro?lang=en#setup");
    /// assert_eq!(url.path, "/docs/intro");
    /// assert_eq!(url.query.as_deref(), Some("lang=en"));
    /// assert_eq!(url.fragment.as_deref(), Some("setup"));
    /// ```
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, non_empty(fragment)),
            None => (url, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, non_empty(query)),
            None => (rest, None),
        };
        Self {
            path: path.to_string(),
            query,
            fragment,
        }
    }
}

fn non_empty(part: &str) -> Option<String> {
    (!part.is_empty()).then(|| part.to_string())
}

/// Strip the `#fragment` part of a URL.
pub(crate) fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(rest, _)| rest)
}

/// The result of resolving a URL.
#[derive(Clone)]
pub struct Target {
    /// The full URL that was requested, including query and fragment.
    pub original_path: String,
    /// The path part of the URL.
    pub path: String,
    /// `false` suppresses the navigation.
    pub valid: bool,
    /// The matched route entry, `None` when nothing matched.
    pub route: Option<Arc<RouteEntry>>,
    /// Config whose table produced the match.
    pub config: Option<ConfigId>,
    pub builder: Option<Builder>,
    pub title: Option<String>,
    pub path_args: RouteParams,
    pub query_args: QueryParams,
    pub fragment: Option<String>,
    /// Segments consumed by a trailing `*` of the matched pattern.
    pub remainder: Option<String>,
    /// Router that resolved this target.
    pub router: Option<RouterId>,
    pub on_pre_update: Option<UpdateHook>,
    pub on_post_update: Option<UpdateHook>,
}

impl Target {
    /// An unresolved target for `url`.
    ///
    /// Returned from an `on_open` hook this acts as a redirect: the router
    /// resolves `url` from scratch.
    pub fn new(url: impl Into<String>) -> Self {
        let original_path = url.into();
        let parsed = ParsedUrl::parse(&original_path);
        Self::from_parsed(original_path, parsed)
    }

    /// Alias of [`Target::new`] that reads better inside hooks.
    pub fn redirect(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    /// A target that suppresses the navigation to `url`.
    pub fn invalid(url: impl Into<String>) -> Self {
        Self {
            valid: false,
            ..Self::new(url)
        }
    }

    fn from_parsed(original_path: String, parsed: ParsedUrl) -> Self {
        let query_args = parsed
            .query
            .as_deref()
            .map(QueryParams::from_query_string)
            .unwrap_or_default();
        Self {
            original_path,
            path: parsed.path,
            valid: true,
            route: None,
            config: None,
            builder: None,
            title: None,
            path_args: RouteParams::new(),
            query_args,
            fragment: parsed.fragment,
            remainder: None,
            router: None,
            on_pre_update: None,
            on_post_update: None,
        }
    }

    /// Build the target for a (possibly absent) table match.
    pub(crate) fn resolved(
        url: &str,
        parsed: ParsedUrl,
        config: ConfigId,
        matched: Option<(Arc<RouteEntry>, PatternMatch)>,
    ) -> Self {
        let mut target = Self::from_parsed(url.to_string(), parsed);
        target.config = Some(config);
        if let Some((entry, PatternMatch { params, remainder })) = matched {
            target.builder = Some(entry.builder().clone());
            target.title = entry.title().map(str::to_string);
            target.path_args = params;
            target.remainder = remainder;
            target.route = Some(entry);
        }
        target
    }

    /// Set the builder, making this a self-contained target that needs no
    /// route table (for `on_resolve` hooks).
    #[must_use]
    pub fn with_builder(mut self, builder: Builder) -> Self {
        self.builder = Some(builder);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_pre_update(mut self, hook: UpdateHook) -> Self {
        self.on_pre_update = Some(hook);
        self
    }

    #[must_use]
    pub fn with_post_update(mut self, hook: UpdateHook) -> Self {
        self.on_post_update = Some(hook);
        self
    }

    /// `true` when the URL carried only a `#fragment`.
    pub fn is_anchor_only(&self) -> bool {
        self.path.is_empty() && self.fragment.is_some()
    }

    /// `true` for a valid target with nothing to build and no anchor to jump to.
    pub fn is_not_found(&self) -> bool {
        self.valid && self.builder.is_none() && self.fragment.is_none()
    }

    /// Pattern of the matched entry.
    pub fn route_pattern(&self) -> Option<&str> {
        self.route.as_ref().map(|entry| entry.pattern().as_str())
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("original_path", &self.original_path)
            .field("valid", &self.valid)
            .field("route", &self.route_pattern())
            .field("has_builder", &self.builder.is_some())
            .field("title", &self.title)
            .field("path_args", &self.path_args)
            .field("query_args", &self.query_args)
            .field("fragment", &self.fragment)
            .field("remainder", &self.remainder)
            .field("router", &self.router)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_path() {
        let url = ParsedUrl::parse("/about");
        assert_eq!(url.path, "/about");
        assert_eq!(url.query, None);
        assert_eq!(url.fragment, None);
    }

    #[test]
    fn parse_fragment_only() {
        let url = ParsedUrl::parse("#faq");
        assert_eq!(url.path, "");
        assert_eq!(url.fragment.as_deref(), Some("faq"));

        assert!(Target::new("#faq").is_anchor_only());
    }

    #[test]
    fn question_mark_inside_fragment_stays_in_fragment() {
        let url = ParsedUrl::parse("/a#b?c");
        assert_eq!(url.path, "/a");
        assert_eq!(url.query, None);
        assert_eq!(url.fragment.as_deref(), Some("b?c"));
    }

    #[test]
    fn empty_parts_are_none() {
        let url = ParsedUrl::parse("/a?#");
        assert_eq!(url.query, None);
        assert_eq!(url.fragment, None);
    }

    #[test]
    fn new_target_parses_query() {
        let target = Target::new("/search?q=rust&page=2");
        assert_eq!(target.original_path, "/search?q=rust&page=2");
        assert_eq!(target.path, "/search");
        assert_eq!(target.query_args.get_as::<u32>("page"), Some(2));
        assert!(target.valid);
        assert!(target.is_not_found());
    }

    #[test]
    fn invalid_target() {
        let target = Target::invalid("/x");
        assert!(!target.valid);
        assert!(!target.is_not_found());
    }

    #[test]
    fn strip_fragment_keeps_query() {
        assert_eq!(strip_fragment("/a?x=1#top"), "/a?x=1");
        assert_eq!(strip_fragment("/a"), "/a");
    }
}
