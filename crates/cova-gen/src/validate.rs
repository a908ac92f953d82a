//! Up-front reference validation
//!
//! Every path named by perspectives, exclusions and expectation rules must be
//! a factor of the flattened domain, and every exact level must be one of that
//! factor's levels. Runs once, before any perspective is expanded, so a bad
//! reference aborts the whole run.

use crate::assignment::{ID_FIELD, PERSPECTIVE_FIELD};
use crate::condition::{Condition, Matcher};
use crate::domain::FlatDomain;
use crate::error::{Error, Result};
use crate::exclusion::Exclusion;
use crate::perspective::Perspective;

/// Validate a whole run configuration
///
/// # Errors
///
/// Returns the first problem found: [`Error::UnknownPath`],
/// [`Error::UnknownLevel`] or [`Error::Configuration`].
pub fn validate_run(
    domain: &FlatDomain,
    exclusions: &[Exclusion],
    perspectives: &[Perspective],
    outcome_field: &str,
) -> Result<()> {
    if outcome_field == ID_FIELD || outcome_field == PERSPECTIVE_FIELD || outcome_field.is_empty() {
        return Err(Error::Configuration(format!(
            "'{outcome_field}' cannot be used as the outcome field"
        )));
    }
    for (i, exclusion) in exclusions.iter().enumerate() {
        let context = format!("exclusion #{}", i + 1);
        if exclusion.condition().is_empty() {
            return Err(Error::Configuration(format!(
                "{context} constrains no paths and would exclude every row"
            )));
        }
        validate_condition(domain, exclusion.condition(), &context)?;
    }
    for perspective in perspectives {
        validate_perspective(domain, perspective)?;
    }
    Ok(())
}

/// Validate one perspective's variables, constants and strength
///
/// # Errors
///
/// See [`validate_run`].
pub fn validate_perspective(domain: &FlatDomain, perspective: &Perspective) -> Result<()> {
    let context = format!("perspective '{}'", perspective.title);
    for (i, path) in perspective.variables.iter().enumerate() {
        check_path(domain, path, &context)?;
        if perspective.variables[..i].contains(path) {
            return Err(Error::Configuration(format!(
                "{context} lists variable '{path}' twice"
            )));
        }
    }
    for (path, level) in &perspective.constants {
        check_level(domain, path, level, &context)?;
    }
    perspective.resolved_strength()?;
    Ok(())
}

/// Validate a condition's paths and exact levels
///
/// # Errors
///
/// See [`validate_run`].
pub fn validate_condition(domain: &FlatDomain, condition: &Condition, context: &str) -> Result<()> {
    for (path, matcher) in condition.constraints() {
        match matcher {
            Matcher::Exact(level) => check_level(domain, path, level, context)?,
            Matcher::Pattern(_) => check_path(domain, path, context)?,
        }
    }
    Ok(())
}

fn check_path(domain: &FlatDomain, path: &str, context: &str) -> Result<()> {
    if domain.contains(path) {
        Ok(())
    } else {
        Err(Error::UnknownPath {
            context: context.to_string(),
            path: path.to_string(),
        })
    }
}

fn check_level(domain: &FlatDomain, path: &str, level: &str, context: &str) -> Result<()> {
    check_path(domain, path, context)?;
    if domain.factor(path).is_some_and(|f| f.has_level(level)) {
        Ok(())
    } else {
        Err(Error::UnknownLevel {
            context: context.to_string(),
            path: path.to_string(),
            level: level.to_string(),
        })
    }
}
