//! Proptest strategies for property-based testing
//!
//! Generates small flat domains (`F0`, `F1`, ... with levels `f{i}_{j}`),
//! perspectives over a subsequence of their factors, and exclusions that
//! constrain only those variables.

use crate::assignment::Assignment;
use crate::domain::FactorDomain;
use crate::error::Result;
use crate::exclusion::Exclusion;
use crate::generator::{TestSuite, generate_tests};
use crate::perspective::Perspective;
use proptest::prelude::*;

/// Path of the `i`-th generated factor
#[must_use]
pub fn factor_path(i: usize) -> String {
    format!("F{i}")
}

/// `j`-th level of the `i`-th generated factor
#[must_use]
pub fn factor_level(i: usize, j: usize) -> String {
    format!("f{i}_{j}")
}

/// Build a flat domain with `counts[i]` levels for factor `i`
#[must_use]
pub fn build_domain(counts: &[usize]) -> FactorDomain {
    counts
        .iter()
        .enumerate()
        .fold(FactorDomain::new(), |domain, (i, &n)| {
            domain.factor(factor_path(i), (0..n).map(|j| factor_level(i, j)))
        })
}

/// Outcome used by generated perspectives
pub fn mark_pass(assignment: Assignment) -> Assignment {
    assignment.with("Then", "Pass")
}

/// A random single-perspective run
#[derive(Debug, Clone)]
pub struct RunCase {
    /// Levels per factor
    pub counts: Vec<usize>,
    /// Indices of the perspective's variables, in order
    pub variables: Vec<usize>,
    /// Coverage strength, `1..=variables.len()`
    pub strength: usize,
    /// Exclusions over the variables only
    pub exclusions: Vec<Exclusion>,
}

impl RunCase {
    /// The generated domain
    #[must_use]
    pub fn domain(&self) -> FactorDomain {
        build_domain(&self.counts)
    }

    /// The generated perspective
    #[must_use]
    pub fn perspective(&self) -> Perspective {
        Perspective::new("random", mark_pass)
            .with_variables(self.variables.iter().map(|&i| factor_path(i)))
            .with_strength(self.strength)
    }

    /// Same run without exclusions
    #[must_use]
    pub fn without_exclusions(&self) -> Self {
        Self {
            exclusions: Vec::new(),
            ..self.clone()
        }
    }

    /// Same run at full strength
    #[must_use]
    pub fn at_full_strength(&self) -> Self {
        Self {
            strength: self.variables.len(),
            ..self.clone()
        }
    }

    /// Run the generator
    ///
    /// # Errors
    ///
    /// Propagates generation errors; generated cases are always valid, so
    /// an error here is a bug.
    pub fn generate(&self) -> Result<TestSuite> {
        generate_tests(
            self.domain(),
            None,
            self.exclusions.clone(),
            vec![self.perspective()],
        )
    }
}

/// Strategy for level counts of 2 to 5 factors with 1 to 3 levels each
pub fn level_counts_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=3, 2..=5)
}

/// Strategy for small flat domains
pub fn domain_strategy() -> impl Strategy<Value = FactorDomain> {
    level_counts_strategy().prop_map(|counts| build_domain(&counts))
}

/// Strategy for one exclusion over one or two of `variables`
pub fn exclusion_strategy(
    counts: Vec<usize>,
    variables: Vec<usize>,
) -> impl Strategy<Value = Exclusion> {
    let max = variables.len().min(2);
    prop::sample::subsequence(variables, 1..=max).prop_flat_map(move |paths| {
        paths
            .into_iter()
            .map(|i| (Just(i), 0..counts[i]))
            .collect::<Vec<_>>()
            .prop_map(|picks| {
                picks.into_iter().fold(Exclusion::new(), |exclusion, (i, j)| {
                    exclusion.exact(factor_path(i), factor_level(i, j))
                })
            })
    })
}

/// Strategy for random single-perspective runs
pub fn run_case_strategy() -> impl Strategy<Value = RunCase> {
    level_counts_strategy().prop_flat_map(|counts| {
        let n = counts.len();
        prop::sample::subsequence((0..n).collect::<Vec<_>>(), 1..=n).prop_flat_map(
            move |variables| {
                let k = variables.len();
                let counts = counts.clone();
                (
                    1..=k,
                    prop::collection::vec(
                        exclusion_strategy(counts.clone(), variables.clone()),
                        0..=2,
                    ),
                )
                    .prop_map(move |(strength, exclusions)| RunCase {
                        counts: counts.clone(),
                        variables: variables.clone(),
                        strength,
                        exclusions,
                    })
            },
        )
    })
}
