//! Coverage obligations of a perspective
//!
//! For strength `t`, every `t`-subset of the perspective's variables is
//! expanded into the cross product of its factors' levels. Each resulting
//! combination is a requirement the covering array has to contain, unless an
//! exclusion already forbids it.

use crate::assignment::Assignment;
use crate::domain::FlatDomain;
use crate::error::{Error, Result};
use crate::exclusion::{is_excluded, Exclusion};
use crate::perspective::Perspective;
use crate::subset::subsets;

/// Enumerate the requirements of `perspective`
///
/// Order: subsets in generation order, then depth-first level order within
/// a subset (first path outermost). Requirements repeated across overlapping
/// subsets are kept; the covering array builder skips the ones already
/// satisfied.
///
/// # Errors
///
/// Returns [`Error::Configuration`] for an unusable strength and
/// [`Error::UnknownPath`] if a variable is not a domain factor.
pub fn generate_requirements(
    perspective: &Perspective,
    domain: &FlatDomain,
    exclusions: &[Exclusion],
) -> Result<Vec<Assignment>> {
    let strength = perspective.resolved_strength()?;
    let mut requirements = Vec::new();

    for subset in subsets(&perspective.variables, strength) {
        let factors = subset
            .iter()
            .map(|path| {
                domain
                    .levels(path)
                    .map(|levels| (path.as_str(), levels))
                    .ok_or_else(|| Error::UnknownPath {
                        context: format!("perspective '{}'", perspective.title),
                        path: path.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        expand(&factors, Assignment::new(), exclusions, &mut requirements);
    }

    Ok(requirements)
}

/// Bind one factor at a time, emitting each complete binding
fn expand(
    factors: &[(&str, &[String])],
    partial: Assignment,
    exclusions: &[Exclusion],
    out: &mut Vec<Assignment>,
) {
    let Some(((path, levels), rest)) = factors.split_first() else {
        if !is_excluded(&partial, exclusions) {
            out.push(partial);
        }
        return;
    };
    for level in *levels {
        expand(rest, partial.clone().with(*path, level.as_str()), exclusions, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FactorDomain;

    fn abc() -> FlatDomain {
        FactorDomain::new()
            .factor("A", ["a1", "a2"])
            .factor("B", ["b1", "b2"])
            .factor("C", ["c1", "c2"])
            .flatten()
            .expect("flatten")
    }

    fn perspective(variables: &[&str]) -> Perspective {
        Perspective::new("p", |a: Assignment| a).with_variables(variables.iter().copied())
    }

    fn pairs(reqs: &[Assignment]) -> Vec<Vec<(String, String)>> {
        reqs.iter()
            .map(|r| {
                r.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_full_strength_cross_product() {
        let reqs = generate_requirements(&perspective(&["A", "B"]), &abc(), &[]).expect("reqs");
        let expected: Vec<Assignment> = vec![
            Assignment::new().with("A", "a1").with("B", "b1"),
            Assignment::new().with("A", "a1").with("B", "b2"),
            Assignment::new().with("A", "a2").with("B", "b1"),
            Assignment::new().with("A", "a2").with("B", "b2"),
        ];
        assert_eq!(reqs, expected);
    }

    #[test]
    fn test_strength_one_single_factor_obligations() {
        let p = perspective(&["A", "B", "C"]).with_strength(1);
        let reqs = generate_requirements(&p, &abc(), &[]).expect("reqs");
        let expected: Vec<Assignment> = vec![
            Assignment::new().with("A", "a1"),
            Assignment::new().with("A", "a2"),
            Assignment::new().with("B", "b1"),
            Assignment::new().with("B", "b2"),
            Assignment::new().with("C", "c1"),
            Assignment::new().with("C", "c2"),
        ];
        assert_eq!(reqs, expected);
    }

    #[test]
    fn test_pairwise_count_and_order() {
        let p = perspective(&["A", "B", "C"]).with_strength(2);
        let reqs = generate_requirements(&p, &abc(), &[]).expect("reqs");
        // 3 subsets x 4 combinations
        assert_eq!(reqs.len(), 12);
        assert_eq!(
            pairs(&reqs[..1]),
            vec![vec![
                ("A".to_string(), "a1".to_string()),
                ("B".to_string(), "b1".to_string())
            ]]
        );
        assert!(reqs[4].is_set("A") && reqs[4].is_set("C"));
        assert!(reqs[8].is_set("B") && reqs[8].is_set("C"));
    }

    #[test]
    fn test_variable_order_drives_expansion() {
        let reqs = generate_requirements(&perspective(&["B", "A"]), &abc(), &[]).expect("reqs");
        // B is outermost: b1a1, b1a2, b2a1, b2a2
        assert_eq!(reqs[1], Assignment::new().with("A", "a2").with("B", "b1"));
    }

    #[test]
    fn test_exclusions_prune_requirements() {
        let exclusions = vec![Exclusion::new().exact("A", "a1").exact("B", "b1")];
        let reqs =
            generate_requirements(&perspective(&["A", "B"]), &abc(), &exclusions).expect("reqs");
        assert_eq!(reqs.len(), 3);
        assert!(!reqs.contains(&Assignment::new().with("A", "a1").with("B", "b1")));
    }

    #[test]
    fn test_exclusion_outside_subset_does_not_prune() {
        let exclusions = vec![Exclusion::new().exact("A", "a1").exact("C", "c1")];
        let p = perspective(&["A", "B"]);
        let reqs = generate_requirements(&p, &abc(), &exclusions).expect("reqs");
        assert_eq!(reqs.len(), 4);
    }

    #[test]
    fn test_no_variables_yields_single_empty_requirement() {
        let reqs = generate_requirements(&perspective(&[]), &abc(), &[]).expect("reqs");
        assert_eq!(reqs, vec![Assignment::new()]);
    }

    #[test]
    fn test_strength_exceeding_variables() {
        let p = perspective(&["A"]).with_strength(2);
        let err = generate_requirements(&p, &abc(), &[]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_unknown_variable() {
        let err = generate_requirements(&perspective(&["A", "Z"]), &abc(), &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownPath { ref path, .. } if path == "Z"));
    }

    #[test]
    fn test_duplicates_across_subsets_are_kept() {
        let p = perspective(&["A", "B", "C"]).with_strength(1);
        let twice = Perspective::new("p", |a: Assignment| a)
            .with_variables(["A", "A"])
            .with_strength(1);
        assert_eq!(
            generate_requirements(&twice, &abc(), &[]).expect("reqs").len(),
            4
        );
        assert_eq!(generate_requirements(&p, &abc(), &[]).expect("reqs").len(), 6);
    }
}
