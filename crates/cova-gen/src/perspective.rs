//! Perspectives and their expected-outcome strategies
//!
//! A perspective names one concern of the test design: which factors must be
//! jointly exercised, at which strength, with which fixed overrides, and how
//! the expected outcome of each generated row is derived.

use crate::assignment::Assignment;
use crate::condition::Condition;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Derives the outcome field of a complete row
///
/// Implementations must be pure: the result may depend only on the values
/// passed in, never on row order or external state.
pub trait Expectation: Send + Sync {
    /// Return `assignment` with the outcome field populated
    fn expect(&self, assignment: Assignment) -> Assignment;
}

impl<F> Expectation for F
where
    F: Fn(Assignment) -> Assignment + Send + Sync,
{
    fn expect(&self, assignment: Assignment) -> Assignment {
        self(assignment)
    }
}

/// One rule of a [`RuleExpectation`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectRule {
    /// Condition on the row
    pub when: Condition,
    /// Outcome when the condition holds
    pub then: String,
}

/// Declarative expectation: the first matching rule sets the outcome
///
/// Falls back to `otherwise` when no rule matches. Without a fallback the row
/// is returned unchanged, so an outcome factor keeps its baseline value.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleExpectation {
    field: String,
    rules: Vec<ExpectRule>,
    otherwise: Option<String>,
}

impl RuleExpectation {
    /// Create an expectation writing to `field`
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rules: Vec::new(),
            otherwise: None,
        }
    }

    /// Append a rule
    #[must_use]
    pub fn when(mut self, condition: Condition, then: impl Into<String>) -> Self {
        self.rules.push(ExpectRule {
            when: condition,
            then: then.into(),
        });
        self
    }

    /// Outcome when no rule matches
    #[must_use]
    pub fn otherwise(mut self, outcome: impl Into<String>) -> Self {
        self.otherwise = Some(outcome.into());
        self
    }

    /// Outcome field written by this expectation
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[ExpectRule] {
        &self.rules
    }
}

impl Expectation for RuleExpectation {
    fn expect(&self, mut assignment: Assignment) -> Assignment {
        let outcome = self
            .rules
            .iter()
            .find(|rule| rule.when.matches(&assignment))
            .map(|rule| rule.then.clone())
            .or_else(|| self.otherwise.clone());
        if let Some(outcome) = outcome {
            assignment.set(self.field.clone(), outcome);
        }
        assignment
    }
}

/// A named scope of joint coverage
#[derive(Clone)]
pub struct Perspective {
    /// Title stamped on every row of this perspective
    pub title: String,
    /// Fixed levels overriding the baseline for this perspective
    pub constants: BTreeMap<String, String>,
    /// Paths to cover jointly, in order
    pub variables: Vec<String>,
    /// Subset size `t`; `None` means all variables (full combination)
    pub strength: Option<usize>,
    expectation: Arc<dyn Expectation>,
}

impl Perspective {
    /// Create a perspective with no variables yet
    #[must_use]
    pub fn new(title: impl Into<String>, expectation: impl Expectation + 'static) -> Self {
        Self::with_shared_expectation(title, Arc::new(expectation))
    }

    /// Create a perspective sharing an existing expectation
    #[must_use]
    pub fn with_shared_expectation(
        title: impl Into<String>,
        expectation: Arc<dyn Expectation>,
    ) -> Self {
        Self {
            title: title.into(),
            constants: BTreeMap::new(),
            variables: Vec::new(),
            strength: None,
            expectation,
        }
    }

    /// Set the variables to cover
    #[must_use]
    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = variables.into_iter().map(Into::into).collect();
        self
    }

    /// Pin `path` to `level` for this perspective
    #[must_use]
    pub fn with_constant(mut self, path: impl Into<String>, level: impl Into<String>) -> Self {
        self.constants.insert(path.into(), level.into());
        self
    }

    /// Set the coverage strength
    #[must_use]
    pub const fn with_strength(mut self, strength: usize) -> Self {
        self.strength = Some(strength);
        self
    }

    /// The outcome strategy
    #[must_use]
    pub fn expectation(&self) -> &dyn Expectation {
        self.expectation.as_ref()
    }

    /// Strength actually used: explicit, or the number of variables
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when an explicit strength is zero or
    /// exceeds the number of variables.
    pub fn resolved_strength(&self) -> Result<usize> {
        match self.strength {
            Some(0) => Err(Error::Configuration(format!(
                "perspective '{}': strength must be at least 1",
                self.title
            ))),
            Some(t) if t > self.variables.len() => Err(Error::Configuration(format!(
                "perspective '{}': strength {t} exceeds the {} listed variables",
                self.title,
                self.variables.len()
            ))),
            Some(t) => Ok(t),
            None => Ok(self.variables.len()),
        }
    }

    /// Run baseline overlaid with this perspective's constants
    #[must_use]
    pub fn baseline(&self, run_baseline: &Assignment) -> Assignment {
        let mut baseline = run_baseline.clone();
        for (path, level) in &self.constants {
            baseline.set(path.clone(), level.clone());
        }
        baseline
    }
}

impl fmt::Debug for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Perspective")
            .field("title", &self.title)
            .field("constants", &self.constants)
            .field("variables", &self.variables)
            .field("strength", &self.strength)
            .finish_non_exhaustive()
    }
}

/// One substring replacement of a [`TitleFormat`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Text to replace
    pub from: String,
    /// Replacement text
    pub to: String,
}

/// Display normalization applied to perspective titles
///
/// The default performs no replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleFormat {
    /// Replacements, applied in order
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

impl TitleFormat {
    /// Leave titles untouched
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            replacements: Vec::new(),
        }
    }

    /// Replace ASCII parentheses with their full-width forms
    #[must_use]
    pub fn fullwidth_parentheses() -> Self {
        Self::identity()
            .with_replacement("(", "\u{FF08}")
            .with_replacement(")", "\u{FF09}")
    }

    /// Append a replacement
    #[must_use]
    pub fn with_replacement(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.replacements.push(Replacement {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Format a title
    #[must_use]
    pub fn apply(&self, title: &str) -> String {
        self.replacements
            .iter()
            .filter(|r| !r.from.is_empty())
            .fold(title.to_string(), |acc, r| acc.replace(&r.from, &r.to))
    }
}
