//! Baseline assignment resolution

use crate::assignment::Assignment;
use crate::domain::{walk_leaves, DomainNode, FactorDomain, FlatDomain};
use crate::error::{Error, Result};
use tracing::debug;

/// Flatten a defaults tree into an assignment
///
/// Uses the same walk as domain flattening; every leaf must be a single
/// level.
///
/// # Errors
///
/// Returns [`Error::DuplicatePath`] on path collisions and
/// [`Error::InvalidDomain`] if a leaf is a list.
pub fn flatten_defaults(defaults: &FactorDomain) -> Result<Assignment> {
    let mut out = Assignment::new();
    walk_leaves(defaults.entries(), "", &mut |path: String, node: &DomainNode| match node {
        DomainNode::Value(level) => {
            if out.is_set(&path) {
                return Err(Error::DuplicatePath(path));
            }
            out.set(path, level.clone());
            Ok(())
        }
        DomainNode::Levels(_) => Err(Error::InvalidDomain(format!(
            "default for '{path}' must be a single level, not a list"
        ))),
        DomainNode::Group(_) => Ok(()),
    })?;
    Ok(out)
}

/// First level of every factor, in declaration order
#[must_use]
pub fn first_levels(domain: &FlatDomain) -> Assignment {
    domain
        .iter()
        .filter_map(|factor| {
            factor
                .levels
                .first()
                .map(|level| (factor.path.as_str(), level.as_str()))
        })
        .collect()
}

/// Resolve the complete baseline for a run
///
/// Explicit defaults are validated against `domain`; any factor they omit
/// falls back to its first level. Without explicit defaults every factor
/// takes its first level.
///
/// # Errors
///
/// Propagates [`flatten_defaults`] errors, and returns
/// [`Error::UnknownPath`] / [`Error::UnknownLevel`] for defaults that do not
/// fit the domain.
pub fn resolve_baseline(domain: &FlatDomain, defaults: Option<&FactorDomain>) -> Result<Assignment> {
    let mut baseline = first_levels(domain);
    let Some(defaults) = defaults else {
        return Ok(baseline);
    };

    let explicit = flatten_defaults(defaults)?;
    for (path, level) in explicit.iter() {
        let factor = domain.factor(path).ok_or_else(|| Error::UnknownPath {
            context: "defaults".to_string(),
            path: path.to_string(),
        })?;
        if !factor.has_level(level) {
            return Err(Error::UnknownLevel {
                context: "defaults".to_string(),
                path: path.to_string(),
                level: level.to_string(),
            });
        }
        baseline.set(path, level);
    }

    let omitted = domain.len() - explicit.len();
    if omitted > 0 {
        debug!(omitted, "defaults omit factors; using first levels");
    }
    Ok(baseline)
}
