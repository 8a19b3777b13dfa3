//! Keyword context handed to builders and hooks.
//!
//! Every navigation assembles a [`Kwargs`] map out of the path arguments, the
//! query arguments, the resolved target and the `user_data` of the router
//! chain. Builders and update hooks declare the names they accept as a
//! [`ParamSet`]; the map is filtered down to that set before the call, and
//! unknown keys are dropped without complaint.
//!
//! ```
//! use frame_navigator::{Kwargs, ParamSet};
//!
//! let mut kwargs = Kwargs::new();
//! kwargs.insert_str("id", "42");
//! kwargs.insert("count", 3usize);
//!
//! let only_id = kwargs.filtered(&ParamSet::only(["id"]));
//! assert_eq!(only_id.get_str("id"), Some("42"));
//! assert!(!only_id.contains("count"));
//! ```

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// A type-erased context value.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Keyword arguments passed down the router tree.
///
/// Cloning is cheap: values are reference counted and shared between the
/// router's `user_data` and every hook invocation of a navigation.
#[derive(Clone, Default)]
pub struct Kwargs {
    values: HashMap<String, Value>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a typed value.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Insert an already type-erased value.
    pub fn insert_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Insert a string value.
    pub fn insert_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Borrow a value as `T`. Returns `None` when missing or of another type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| (**value).downcast_ref::<T>())
    }

    /// Borrow the raw value.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Borrow a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get::<String>(key).map(String::as_str)
    }

    /// Parse a string value as `T`.
    ///
    /// Path and query arguments arrive as strings; this is the typed view of
    /// them.
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get_str(key)?.parse().ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Merge `other` into `self`. Keys present in both take `other`'s value.
    pub fn extend(&mut self, other: &Kwargs) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), Arc::clone(value));
        }
    }

    /// Copy of this map restricted to the names `params` accepts.
    pub fn filtered(&self, params: &ParamSet) -> Kwargs {
        match params {
            ParamSet::Any => self.clone(),
            ParamSet::Only(names) => Kwargs {
                values: self
                    .values
                    .iter()
                    .filter(|(key, _)| names.contains(key.as_str()))
                    .map(|(key, value)| (key.clone(), Arc::clone(value)))
                    .collect(),
            },
        }
    }
}

impl fmt::Debug for Kwargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Kwargs").field("keys", &keys).finish()
    }
}

/// Names a builder or hook accepts, computed once at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParamSet {
    /// Accept the whole merged context.
    #[default]
    Any,
    /// Accept exactly these names.
    Only(BTreeSet<String>),
}

impl ParamSet {
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamSet::Only(names.into_iter().map(Into::into).collect())
    }

    pub fn accepts(&self, name: &str) -> bool {
        match self {
            ParamSet::Any => true,
            ParamSet::Only(names) => names.contains(name),
        }
    }
}
