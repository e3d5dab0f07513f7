//! Free-form OpenStreetMap tag maps.
//!
//! Overpass returns tags as an open-ended string-to-string mapping. Lookups
//! here never fail: an absent key is simply `None`, or the empty string
//! through [`Tags::value_or_empty`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key/value tags attached to an OSM element.
///
/// # Examples
/// ```
/// use waypost_core::Tags;
///
/// let tags = Tags::from_iter([("railway", "station"), ("name", "Central")]);
/// assert!(tags.has("railway", "station"));
/// assert_eq!(tags.get("name"), Some("Central"));
/// assert_eq!(tags.value_or_empty("network"), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(HashMap<String, String>);

impl Tags {
    /// Create an empty tag map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value stored under `key`, or `""` when absent.
    #[must_use]
    pub fn value_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Whether `key` is present, whatever its value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether `key` is present with exactly `value`.
    #[must_use]
    pub fn has(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Whether `key` is present with any of `values`.
    #[must_use]
    pub fn has_any<S: AsRef<str>>(&self, key: &str, values: &[S]) -> bool {
        self.get(key)
            .is_some_and(|found| values.iter().any(|value| value.as_ref() == found))
    }

    /// Insert a tag, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for Tags {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}
