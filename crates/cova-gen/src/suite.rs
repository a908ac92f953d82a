//! Declarative suite configuration
//!
//! A [`SuiteDefinition`] describes a whole run in YAML (or JSON): the domain,
//! optional defaults, exclusions, and perspectives whose expected outcome is
//! given as ordered `when`/`then` rules.
//!
//! ```yaml
//! domain:
//!   Given:
//!     Course: [Bachelor, Master, Doctor]
//!     Grade: [1, 2, 3, 4]
//!   Then: [Pass, Fail, Any]
//! exclusions:
//!   - { Given.Course: Doctor, Given.Grade: 4 }
//! perspectives:
//!   - title: Enrolment
//!     variables: [Given.Course, Given.Grade]
//!     expect:
//!       rules:
//!         - when: { Given.Course: Bachelor }
//!           then: Pass
//!       otherwise: Fail
//! ```

use crate::assignment::DEFAULT_OUTCOME_FIELD;
use crate::condition::{Condition, Matcher};
use crate::domain::{FactorDomain, FlatDomain, Scalar};
use crate::error::{Error, Result};
use crate::exclusion::Exclusion;
use crate::generator::Generator;
use crate::perspective::{Perspective, RuleExpectation, TitleFormat};
use crate::validate::validate_condition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A condition as written: path to exact level or `{ pattern: ... }`
pub type ConditionSpec = BTreeMap<String, MatcherSpec>;

/// One matcher as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherSpec {
    /// Regular expression, searched anywhere in the level
    Pattern {
        /// Regex source
        pattern: String,
    },
    /// Exact level
    Exact(Scalar),
}

impl MatcherSpec {
    /// Compile into a [`Matcher`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if the regex is malformed.
    pub fn compile(&self) -> Result<Matcher> {
        match self {
            Self::Pattern { pattern } => Matcher::pattern(pattern),
            Self::Exact(level) => Ok(Matcher::exact(level.0.clone())),
        }
    }
}

fn compile_condition(spec: &ConditionSpec) -> Result<Condition> {
    spec.iter().try_fold(Condition::new(), |condition, (path, matcher)| {
        Ok(condition.with(path.clone(), matcher.compile()?))
    })
}

/// One expectation rule as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Condition on the row; empty matches every row
    #[serde(default)]
    pub when: ConditionSpec,
    /// Outcome when the condition holds
    pub then: Scalar,
}

/// Expected outcome rules of a perspective
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectSpec {
    /// Rules in evaluation order; the first match wins
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    /// Outcome when no rule matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<Scalar>,
}

/// A perspective as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveSpec {
    /// Title stamped on generated rows
    pub title: String,
    /// Fixed levels for this perspective
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constants: BTreeMap<String, Scalar>,
    /// Paths to cover jointly
    #[serde(default)]
    pub variables: Vec<String>,
    /// Coverage strength; all variables when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<usize>,
    /// Expected outcome rules
    #[serde(default)]
    pub expect: ExpectSpec,
}

fn default_outcome_field() -> String {
    DEFAULT_OUTCOME_FIELD.to_string()
}

/// Complete description of a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteDefinition {
    /// Factor domain
    pub domain: FactorDomain,
    /// Baseline levels; first level of every factor when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<FactorDomain>,
    /// Exclusion rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<ConditionSpec>,
    /// Perspectives, processed in order
    #[serde(default)]
    pub perspectives: Vec<PerspectiveSpec>,
    /// Field written by the expectation rules
    #[serde(default = "default_outcome_field")]
    pub outcome_field: String,
    /// Title normalization
    #[serde(default)]
    pub title_format: TitleFormat,
}

impl SuiteDefinition {
    /// Load a suite from a YAML (or JSON) file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a suite from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Parse a suite from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }

    /// Convert to YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::from)
    }

    /// Compile patterns and rules into a ready [`Generator`]
    ///
    /// Rule conditions are checked against the domain here, since the
    /// generator only sees them as opaque expectations. When the outcome
    /// field is itself a domain factor, rule outcomes must be its levels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] for malformed regexes and the flattening
    /// and reference errors of rule conditions.
    pub fn into_generator(self) -> Result<Generator> {
        let flat = self.domain.flatten()?;

        let exclusions = self
            .exclusions
            .iter()
            .map(|spec| compile_condition(spec).map(Exclusion::from))
            .collect::<Result<Vec<_>>>()?;

        let perspectives = self
            .perspectives
            .iter()
            .map(|spec| build_perspective(spec, &flat, &self.outcome_field))
            .collect::<Result<Vec<_>>>()?;

        let mut generator = Generator::new(self.domain)
            .with_exclusions(exclusions)
            .with_perspectives(perspectives)
            .with_outcome_field(self.outcome_field)
            .with_title_format(self.title_format);
        if let Some(defaults) = self.defaults {
            generator = generator.with_defaults(defaults);
        }
        Ok(generator)
    }
}

fn build_perspective(spec: &PerspectiveSpec, flat: &FlatDomain, outcome_field: &str) -> Result<Perspective> {
    let context = format!("perspective '{}'", spec.title);
    let mut expectation = RuleExpectation::new(outcome_field);
    for (i, rule) in spec.expect.rules.iter().enumerate() {
        let condition = compile_condition(&rule.when)?;
        validate_condition(flat, &condition, &format!("{context} rule #{}", i + 1))?;
        check_outcome(flat, outcome_field, &rule.then.0, &context)?;
        expectation = expectation.when(condition, rule.then.0.clone());
    }
    if let Some(otherwise) = &spec.expect.otherwise {
        check_outcome(flat, outcome_field, &otherwise.0, &context)?;
        expectation = expectation.otherwise(otherwise.0.clone());
    }

    let mut perspective = Perspective::new(spec.title.clone(), expectation)
        .with_variables(spec.variables.iter().cloned());
    for (path, level) in &spec.constants {
        perspective = perspective.with_constant(path.clone(), level.0.clone());
    }
    if let Some(strength) = spec.strength {
        perspective = perspective.with_strength(strength);
    }
    Ok(perspective)
}

fn check_outcome(flat: &FlatDomain, field: &str, outcome: &str, context: &str) -> Result<()> {
    match flat.factor(field) {
        Some(factor) if !factor.has_level(outcome) => Err(Error::UnknownLevel {
            context: context.to_string(),
            path: field.to_string(),
            level: outcome.to_string(),
        }),
        _ => Ok(()),
    }
}
