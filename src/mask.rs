//! Glob-style path masks.
//!
//! Masks decide three things: which child router a path is delegated to,
//! which paths a frame handles itself (versus a full page load), and how a
//! config's `{param}` templates are instantiated against a live URL.
//!
//! Matching uses [`glob::Pattern`] with default options, so `*` also matches
//! `/` and `/services/*` covers every path below `/services`.

use crate::warn_log;
use glob::Pattern;

/// A compiled glob mask.
#[derive(Debug, Clone)]
pub struct Mask {
    raw: String,
    pattern: Option<Pattern>,
}

impl Mask {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let pattern = match Pattern::new(&raw) {
            Ok(pattern) => Some(pattern),
            Err(_err) => {
                warn_log!("Mask '{}' is not a valid glob ({}); matching literally", raw, _err);
                None
            }
        };
        Self { raw, pattern }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Glob match, falling back to string equality for invalid globs.
    pub fn matches(&self, path: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.matches(path),
            None => self.raw == path,
        }
    }
}

impl PartialEq for Mask {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Mask {}

/// Turn a route path into a glob mask: `{param}` segments become `*`, glob
/// metacharacters in literal segments are escaped.
///
/// ```
/// use frame_navigator::mask::create_path_mask;
///
/// assert_eq!(create_path_mask("/site/{value}/{other}"), "/site/*/*");
/// assert_eq!(create_path_mask("/docs/*"), "/docs/*");
/// assert_eq!(create_path_mask("/q/[x]"), "/q/[[]x[]]");
/// ```
pub fn create_path_mask(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment == "*" || crate::pattern::param_name(segment).is_some() {
                "*".to_string()
            } else {
                Pattern::escape(segment)
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// `true` if `path` equals the mask's prefix or lies below it.
///
/// Tries `mask` itself, then `mask + "/*"`.
pub fn prefix_matches(mask: &str, path: &str) -> bool {
    Mask::new(mask).matches(path) || Mask::new(format!("{}/*", mask.trim_end_matches('/'))).matches(path)
}

/// Replace `{param}` elements of `base` with the element at the same position
/// in `target_url`, where the URL is long enough.
///
/// ```
/// use frame_navigator::mask::substitute_placeholders;
///
/// assert_eq!(
///     substitute_placeholders("/services/{service_name}", "/services/compute/vm"),
///     "/services/compute"
/// );
/// assert_eq!(substitute_placeholders("/a/{x}/{y}", "/a/1"), "/a/1/{y}");
/// ```
pub fn substitute_placeholders(base: &str, target_url: &str) -> String {
    let url_elements: Vec<&str> = strip_query(target_url).split('/').collect();
    base.split('/')
        .enumerate()
        .map(|(index, element)| {
            if crate::pattern::param_name(element).is_some() {
                url_elements.get(index).copied().unwrap_or(element)
            } else {
                element
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Replace `*` elements of `mask` with the element at the same position in
/// the (already substituted) `base` path. Empty base elements are skipped.
///
/// ```
/// use frame_navigator::mask::substitute_wildcards;
///
/// assert_eq!(substitute_wildcards("/services/*/vm", "/services/compute"), "/services/compute/vm");
/// assert_eq!(substitute_wildcards("/services/*/*", "/services/compute"), "/services/compute/*");
/// ```
pub fn substitute_wildcards(mask: &str, base: &str) -> String {
    let base_elements: Vec<&str> = base.split('/').collect();
    mask.split('/')
        .enumerate()
        .map(|(index, element)| {
            if element == "*" {
                base_elements
                    .get(index)
                    .copied()
                    .filter(|base| !base.is_empty())
                    .unwrap_or(element)
            } else {
                element
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Expand each path into the pair of masks a frame checks: the path itself
/// (without trailing slash) and everything below it.
pub fn frame_masks<I, S>(paths: I) -> Vec<Mask>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .flat_map(|path| {
            let cleaned = path.as_ref().trim_end_matches('/').to_string();
            let below = format!("{cleaned}/*");
            [Mask::new(cleaned), Mask::new(below)]
        })
        .collect()
}

/// Included and excluded masks of a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskSet {
    included: Vec<Mask>,
    excluded: Vec<Mask>,
}

impl MaskSet {
    pub fn new(included: Vec<Mask>, excluded: Vec<Mask>) -> Self {
        Self { included, excluded }
    }

    pub fn included(&self) -> impl Iterator<Item = &str> {
        self.included.iter().map(Mask::as_str)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(Mask::as_str)
    }

    /// Decide whether `path` is outside this set.
    ///
    /// Inclusion masks are checked in order. An exact, literal inclusion always
    /// wins; a glob inclusion can be overridden by any exclusion mask. A path
    /// no inclusion covers is excluded.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = strip_query(path);
        for inclusion in &self.included {
            if inclusion.as_str() == path {
                return false;
            }
            if inclusion.matches(path) {
                return self.excluded.iter().any(|exclusion| exclusion.matches(path));
            }
        }
        true
    }

    pub fn handles(&self, path: &str) -> bool {
        !self.is_excluded(path)
    }
}

/// Drop `?query` and `#fragment` from a URL.
pub(crate) fn strip_query(url: &str) -> &str {
    let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
    &url[..end]
}
