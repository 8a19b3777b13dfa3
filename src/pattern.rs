//! Route patterns and path helpers.
//!
//! A pattern is a `/`-separated template made of three kinds of segments:
//!
//! - literal segments, matched exactly (`users`);
//! - parameter segments, `{name}`, capturing exactly one non-empty segment;
//! - a single trailing `*`, capturing the remainder (zero or more segments).
//!
//! Patterns are parsed once, when a route tree is built, so malformed syntax
//! is reported at registration time and never during navigation.
//!
//! # Path Normalization
//!
//! 1. **Empty paths** are normalized to `"/"`
//! 2. **Leading slashes** are ensured (`"dashboard"` → `"/dashboard"`)
//! 3. **Trailing slashes** are removed (except for root)
//! 4. **Empty segments** are ignored when matching (`"//a//b"` matches `/a/b`)
//!
//! ```
//! use frame_navigator::RoutePattern;
//!
//! let pattern = RoutePattern::parse("/a/{x}/*").unwrap();
//! let m = pattern.match_path("/a/42/b/c").unwrap();
//! assert_eq!(m.params.get("x"), Some(&"42".to_string()));
//! assert_eq!(m.remainder.as_deref(), Some("b/c"));
//! ```

use crate::error::RouterError;
use crate::params::{decode_segment, RouteParams};
use std::borrow::Cow;
use std::fmt;

/// One parsed segment of a [`RoutePattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A parsed, validated path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Result of matching a path against a [`RoutePattern`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMatch {
    /// Values captured by `{name}` segments.
    pub params: RouteParams,
    /// Segments consumed by a trailing `*`, joined with `/`.
    ///
    /// `None` when the pattern has no wildcard, `Some("")` when it matched
    /// zero segments.
    pub remainder: Option<String>,
}

impl RoutePattern {
    /// Parse and validate a pattern.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidPattern`] for braces that do not form exactly
    ///   one `{name}` spanning the whole segment, or a `*` mixed into a
    ///   literal segment;
    /// - [`RouterError::WildcardNotLast`] when `*` is followed by more segments;
    /// - [`RouterError::DuplicateParam`] when a name is captured twice.
    pub fn parse(path: &str) -> Result<Self, RouterError> {
        let normalized = normalize_path(path);
        let raw_segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw_segments.len());

        for (index, raw) in raw_segments.iter().enumerate() {
            let segment = if *raw == "*" {
                if index + 1 != raw_segments.len() {
                    return Err(RouterError::WildcardNotLast {
                        pattern: path.to_string(),
                    });
                }
                Segment::Wildcard
            } else if raw.contains('{') || raw.contains('}') {
                let name = param_name(raw).ok_or_else(|| {
                    RouterError::invalid_pattern(
                        path,
                        format!("segment '{raw}' must be a single '{{name}}' parameter"),
                    )
                })?;
                if segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(existing) if existing == name))
                {
                    return Err(RouterError::DuplicateParam {
                        pattern: path.to_string(),
                        name: name.to_string(),
                    });
                }
                Segment::Param(name.to_string())
            } else if raw.contains('*') {
                return Err(RouterError::invalid_pattern(
                    path,
                    format!("wildcard must be a whole segment, found '{raw}'"),
                ));
            } else {
                Segment::Literal((*raw).to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: normalized.into_owned(),
            segments,
        })
    }

    /// The normalized source text of the pattern.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `true` when the pattern ends in `*`.
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// Names captured by this pattern, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Match already split and decoded path segments.
    pub fn match_segments(&self, path: &[String]) -> Option<PatternMatch> {
        let fixed = if self.has_wildcard() {
            self.segments.len() - 1
        } else {
            self.segments.len()
        };

        if path.len() < fixed || (!self.has_wildcard() && path.len() != fixed) {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, value) in self.segments[..fixed].iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Param(name) if !value.is_empty() => {
                    params.insert(name.clone(), value.clone());
                }
                _ => return None,
            }
        }

        let remainder = self.has_wildcard().then(|| path[fixed..].join("/"));
        Some(PatternMatch { params, remainder })
    }

    /// Split, decode and match a path (without query or fragment).
    pub fn match_path(&self, path: &str) -> Option<PatternMatch> {
        self.match_segments(&split_path(path))
    }

    /// Glob mask of this pattern: parameters become `*`.
    pub fn mask(&self) -> String {
        crate::mask::create_path_mask(&self.raw)
    }

    /// Build a concrete URL by substituting `params` into the pattern.
    ///
    /// A trailing wildcard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MissingParam`] when a parameter has no value.
    pub fn url_for(&self, params: &RouteParams) -> Result<String, RouterError> {
        let mut parts = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => parts.push(literal.clone()),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| RouterError::MissingParam {
                        pattern: self.raw.clone(),
                        name: name.clone(),
                    })?;
                    parts.push(value.clone());
                }
                Segment::Wildcard => {}
            }
        }
        Ok(format!("/{}", parts.join("/")))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Extract `name` from a `{name}` segment.
///
/// Returns `None` unless the segment is exactly one brace pair around a
/// non-empty name.
pub fn param_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix('{')?.strip_suffix('}')?;
    if name.is_empty() || name.contains('{') || name.contains('}') {
        return None;
    }
    Some(name)
}

/// Split a path into percent-decoded segments, dropping empty ones.
///
/// ```
/// use frame_navigator::split_path;
///
/// assert_eq!(split_path("/users/123"), vec!["users", "123"]);
/// assert_eq!(split_path("/a%20b/"), vec!["a b"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect()
}

/// Normalize a path for consistent matching.
///
/// Returns `Cow<str>` to avoid allocations when the path is already
/// normalized.
///
/// ```
/// use frame_navigator::normalize_path;
///
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path("dashboard/"), "/dashboard");
/// assert_eq!(normalize_path("/dashboard"), "/dashboard");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }
    if path == "/" || (path.starts_with('/') && !path.ends_with('/')) {
        return Cow::Borrowed(path);
    }

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{trimmed}"))
    }
}

/// Join a base path and a relative path.
///
/// ```
/// use frame_navigator::join_path;
///
/// assert_eq!(join_path("/services", "/{name}"), "/services/{name}");
/// assert_eq!(join_path("/", "about"), "/about");
/// assert_eq!(join_path("/docs", "/"), "/docs");
/// ```
pub fn join_path(base: &str, relative: &str) -> String {
    let base = base.trim_matches('/');
    let relative = relative.trim_matches('/');
    match (base.is_empty(), relative.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{relative}"),
        (false, true) => format!("/{base}"),
        (false, false) => format!("/{base}/{relative}"),
    }
}
