//! Route parameter extraction and query string parsing.
//!
//! This module provides two complementary types for working with URL data:
//!
//! - [`RouteParams`]: path parameters captured by `{name}` segments (e.g.
//!   `{id}` in `/users/{id}`). Supports typed access via
//!   [`get_as`](RouteParams::get_as) and parent-child merging via
//!   [`merge`](RouteParams::merge).
//! - [`QueryParams`]: query string parameters parsed from the `?key=value&...`
//!   portion of a URL. Keys may repeat (`?tag=a&tag=b`); the first value is
//!   the scalar value handed to builders.
//!
//! # Example
//!
//! ```
//! use frame_navigator::{RouteParams, QueryParams};
//!
//! let mut params = RouteParams::new();
//! params.insert("id".to_string(), "42".to_string());
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//!
//! let query = QueryParams::from_query_string("page=1&sort=name");
//! assert_eq!(query.get_as::<u32>("page"), Some(1));
//! assert_eq!(query.get("sort"), Some(&"name".to_string()));
//! ```

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::{BTreeMap, HashMap};

/// Characters left as-is when serializing query components.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Route parameters extracted from path segments
///
/// # Example
///
/// ```
/// use frame_navigator::RouteParams;
///
/// // Route pattern: /users/{id}
/// // Matched path: /users/123
/// let mut params = RouteParams::new();
/// params.insert("id".to_string(), "123".to_string());
///
/// assert_eq!(params.get("id"), Some(&"123".to_string()));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get a reference to the underlying parameter map.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge parent parameters with child parameters
    ///
    /// Child parameters override parent parameters in case of collision.
    ///
    /// # Example
    ///
    /// ```
    /// use frame_navigator::RouteParams;
    ///
    /// let mut parent = RouteParams::new();
    /// parent.insert("service".to_string(), "compute".to_string());
    /// parent.insert("view".to_string(), "list".to_string());
    ///
    /// let mut child = RouteParams::new();
    /// child.insert("view".to_string(), "grid".to_string());
    ///
    /// let merged = RouteParams::merge(&parent, &child);
    /// assert_eq!(merged.get("service"), Some(&"compute".to_string()));
    /// assert_eq!(merged.get("view"), Some(&"grid".to_string()));
    /// ```
    pub fn merge(parent: &RouteParams, child: &RouteParams) -> RouteParams {
        let mut merged = parent.clone();
        for (key, value) in child.iter() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Query string parameters
///
/// Blank values (`?a=&b`) are dropped while parsing. Keys are kept sorted so
/// that [`to_query_string`](Self::to_query_string) is deterministic.
///
/// # Example
///
/// ```
/// use frame_navigator::QueryParams;
///
/// let query = QueryParams::from_query_string("page=1&sort=name&tag=rust&tag=web");
///
/// assert_eq!(query.get("page"), Some(&"1".to_string()));
/// assert_eq!(query.get_as::<i32>("page"), Some(1));
/// assert_eq!(query.get_all("tag").map(Vec::len), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a query string (without the leading `?`).
    ///
    /// `+` decodes to a space, `%XX` sequences are percent-decoded.
    pub fn from_query_string(query: &str) -> Self {
        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            params
                .entry(decode_component(key))
                .or_default()
                .push(decode_component(value));
        }

        Self { params }
    }

    /// Get the first value for a key.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)?.first()
    }

    /// Get all values for a key.
    pub fn get_all(&self, key: &str) -> Option<&Vec<String>> {
        self.params.get(key)
    }

    /// Get the first value for a key, parsed as type `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Append a value for the given key.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.entry(key).or_default().push(value);
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over keys and their first value.
    pub fn iter_first(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params
            .iter()
            .filter_map(|(key, values)| values.first().map(|value| (key, value)))
    }

    /// Serialize back into a query string.
    ///
    /// ```
    /// use frame_navigator::QueryParams;
    ///
    /// let mut query = QueryParams::new();
    /// query.insert("q".to_string(), "a b".to_string());
    /// assert_eq!(query.to_query_string(), "q=a%20b");
    /// ```
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .params
            .iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(key, COMPONENT),
                        utf8_percent_encode(value, COMPONENT)
                    )
                })
            })
            .collect();

        pairs.join("&")
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of unique parameter keys.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Percent-decode a single path segment.
pub(crate) fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_params_basic() {
        let mut params = RouteParams::new();
        params.insert("id".to_string(), "123".to_string());

        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert!(params.contains("id"));
        assert!(!params.contains("missing"));
    }

    #[test]
    fn test_route_params_get_as() {
        let params: RouteParams = [("id", "123"), ("active", "true")].into_iter().collect();

        assert_eq!(params.get_as::<i32>("id"), Some(123));
        assert_eq!(params.get_as::<bool>("active"), Some(true));
        assert_eq!(params.get_as::<i32>("missing"), None);
        assert_eq!(params.get_as::<u8>("active"), None);
    }

    #[test]
    fn test_query_params_basic() {
        let query = QueryParams::from_query_string("page=1&sort=name&filter=active");

        assert_eq!(query.get("page"), Some(&"1".to_string()));
        assert_eq!(query.get("sort"), Some(&"name".to_string()));
        assert_eq!(query.get("missing"), None);
        assert_eq!(query.len(), 3);
    }

    #[test]
    fn test_query_params_multiple_values() {
        let query = QueryParams::from_query_string("tag=rust&tag=web&tag=ui");

        let tags = query.get_all("tag").unwrap();
        assert_eq!(tags, &vec!["rust".to_string(), "web".into(), "ui".into()]);
        // get() returns first value
        assert_eq!(query.get("tag"), Some(&"rust".to_string()));
    }

    #[test]
    fn test_query_params_decoding() {
        let query = QueryParams::from_query_string("q=hello+world&city=M%C3%BCnchen");

        assert_eq!(query.get("q"), Some(&"hello world".to_string()));
        assert_eq!(query.get("city"), Some(&"München".to_string()));
    }

    #[test]
    fn test_query_params_blank_values_dropped() {
        let query = QueryParams::from_query_string("a=&b&c=1&&");

        assert!(!query.contains("a"));
        assert!(!query.contains("b"));
        assert_eq!(query.get("c"), Some(&"1".to_string()));
    }

    #[test]
    fn test_query_string_serialization_is_sorted() {
        let mut query = QueryParams::new();
        query.insert("z".to_string(), "1".to_string());
        query.insert("a".to_string(), "x/y".to_string());

        assert_eq!(query.to_query_string(), "a=x%2Fy&z=1");
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("a%20b"), "a b");
        assert_eq!(decode_segment("plain"), "plain");
    }
}
