//! Partial-assignment conditions
//!
//! A [`Condition`] constrains some paths to an exact level or a regular
//! expression. Exclusions and declarative expectation rules are both built on
//! it.

use crate::assignment::Assignment;
use crate::error::{Error, Result};
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Constraint on a single path
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Equal to this level
    Exact(String),
    /// Value matches this (unanchored) regular expression
    Pattern(Regex),
}

impl Matcher {
    /// Exact-level matcher
    #[must_use]
    pub fn exact(level: impl Into<String>) -> Self {
        Self::Exact(level.into())
    }

    /// Compile a pattern matcher
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if `pattern` is not a valid regular expression.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| Error::Pattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Test a value against this matcher
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(level) => level == value,
            Self::Pattern(re) => re.is_match(value),
        }
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Serialize for Matcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Exact(level) => serializer.serialize_str(level),
            Self::Pattern(re) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("pattern", re.as_str())?;
                map.end()
            }
        }
    }
}

/// Conjunction of per-path matchers
///
/// Matches an assignment when every constrained path is set and its value
/// satisfies the path's matcher. An unset path never matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    constraints: Vec<(String, Matcher)>,
}

impl Condition {
    /// Create an empty condition
    #[must_use]
    pub const fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Add a constraint
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, matcher: Matcher) -> Self {
        self.constraints.push((path.into(), matcher));
        self
    }

    /// Constrain `path` to exactly `level`
    #[must_use]
    pub fn exact(self, path: impl Into<String>, level: impl Into<String>) -> Self {
        self.with(path, Matcher::exact(level))
    }

    /// Constrain `path` to values matching `pattern`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if `pattern` does not compile.
    pub fn pattern(self, path: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(self.with(path, Matcher::pattern(pattern)?))
    }

    /// Constraints in insertion order
    #[must_use]
    pub fn constraints(&self) -> &[(String, Matcher)] {
        &self.constraints
    }

    /// True if nothing is constrained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Test an assignment
    #[must_use]
    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.constraints.iter().all(|(path, matcher)| {
            assignment
                .get(path)
                .is_some_and(|value| matcher.matches(value))
        })
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.constraints.len()))?;
        for (path, matcher) in &self.constraints {
            map.serialize_entry(path, matcher)?;
        }
        map.end()
    }
}
