//! Assignments and finished test cases

use crate::domain::FlatDomain;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved field holding the sequential test identifier
pub const ID_FIELD: &str = "ID";

/// Reserved field holding the originating perspective title
pub const PERSPECTIVE_FIELD: &str = "Perspective";

/// Outcome field used when the caller does not designate one
pub const DEFAULT_OUTCOME_FIELD: &str = "Then";

/// Mapping from dotted path to chosen level
///
/// Used for requirements, rows under construction, the baseline and the
/// values handed to an [`Expectation`](crate::Expectation). A path that is
/// absent is "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    cells: BTreeMap<String, String>,
}

impl Assignment {
    /// Create an empty assignment
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Value at `path`, if set
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.cells.get(path).map(String::as_str)
    }

    /// Set `path` to `level`, returning the previous value
    pub fn set(&mut self, path: impl Into<String>, level: impl Into<String>) -> Option<String> {
        self.cells.insert(path.into(), level.into())
    }

    /// Builder form of [`Assignment::set`]
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, level: impl Into<String>) -> Self {
        self.set(path, level);
        self
    }

    /// True if `path` has a value
    #[must_use]
    pub fn is_set(&self, path: &str) -> bool {
        self.cells.contains_key(path)
    }

    /// True if every pair of `other` appears in `self`
    #[must_use]
    pub fn satisfies(&self, other: &Self) -> bool {
        other
            .iter()
            .all(|(path, level)| self.get(path) == Some(level))
    }

    /// True if every factor of `domain` is set
    #[must_use]
    pub fn is_complete(&self, domain: &FlatDomain) -> bool {
        domain.paths().all(|path| self.is_set(path))
    }

    /// Restrict to the given paths
    #[must_use]
    pub fn project<'a>(&self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        paths
            .into_iter()
            .filter_map(|path| self.get(path).map(|level| (path, level)))
            .collect()
    }

    /// Iterate `(path, level)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of set paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if nothing is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A finished, numbered test case
///
/// Fields are held in normalized order: domain paths in declaration order
/// followed by the outcome field. `ID` and `Perspective` are kept apart and
/// always serialize first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Sequential identifier, starting at `"1"`
    pub id: String,
    /// Formatted title of the originating perspective
    pub perspective: String,
    fields: Vec<(String, String)>,
}

impl TestCase {
    pub(crate) fn new(id: String, perspective: String, fields: Vec<(String, String)>) -> Self {
        Self {
            id,
            perspective,
            fields,
        }
    }

    /// Value of any field, including the reserved `ID` and `Perspective`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            ID_FIELD => Some(&self.id),
            PERSPECTIVE_FIELD => Some(&self.perspective),
            _ => self
                .fields
                .iter()
                .find(|(k, _)| k == field)
                .map(|(_, v)| v.as_str()),
        }
    }

    /// Domain and outcome fields in normalized order
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Domain and outcome values as an [`Assignment`]
    #[must_use]
    pub fn values(&self) -> Assignment {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl Serialize for TestCase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        map.serialize_entry(PERSPECTIVE_FIELD, &self.perspective)?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
