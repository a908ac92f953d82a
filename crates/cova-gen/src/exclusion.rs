//! Exclusion rules
//!
//! An exclusion is a forbidden partial combination. It is checked twice per
//! perspective: while requirements are enumerated, and again after baseline
//! fill, since default cells can complete a forbidden combination that the
//! requirement alone did not.

use crate::assignment::Assignment;
use crate::condition::{Condition, Matcher};
use crate::error::Result;
use serde::Serialize;

/// A forbidden combination of levels
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Exclusion {
    condition: Condition,
}

impl Exclusion {
    /// Create an exclusion with no constraints yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            condition: Condition::new(),
        }
    }

    /// Forbid `path` being exactly `level` (together with the other constraints)
    #[must_use]
    pub fn exact(self, path: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            condition: self.condition.exact(path, level),
        }
    }

    /// Forbid `path` matching `pattern` (together with the other constraints)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`](crate::Error::Pattern) if `pattern` does not compile.
    pub fn pattern(self, path: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Self {
            condition: self.condition.pattern(path, pattern)?,
        })
    }

    /// Add a prepared matcher
    #[must_use]
    pub fn with(self, path: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            condition: self.condition.with(path, matcher),
        }
    }

    /// Underlying condition
    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// True if `assignment` hits this exclusion
    #[must_use]
    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.condition.matches(assignment)
    }
}

impl From<Condition> for Exclusion {
    fn from(condition: Condition) -> Self {
        Self { condition }
    }
}

/// True if any exclusion matches `assignment`
#[must_use]
pub fn is_excluded(assignment: &Assignment, exclusions: &[Exclusion]) -> bool {
    exclusions.iter().any(|e| e.matches(assignment))
}

/// Drop every row an exclusion matches, returning how many were dropped
pub fn retain_allowed(rows: &mut Vec<Assignment>, exclusions: &[Exclusion]) -> usize {
    let before = rows.len();
    rows.retain(|row| !is_excluded(row, exclusions));
    before - rows.len()
}
