//! Cova Test Case Generator
//!
//! Perspective-driven combinatorial test design. A nested factor domain is
//! flattened into dotted paths; each perspective names the factors that must
//! be exercised jointly and at which strength (pairwise, 3-wise, ... or full
//! combination). The generator derives the coverage obligations, packs them
//! greedily into as few rows as it can, fills the remaining cells from a
//! baseline, removes forbidden rows and numbers the result.
//!
//! # Example
//!
//! ```
//! use cova_gen::{Assignment, Exclusion, FactorDomain, Perspective, generate_tests};
//!
//! let domain = FactorDomain::new()
//!     .factor("OS", ["Linux", "Windows"])
//!     .factor("Browser", ["Firefox", "Chrome"])
//!     .factor("Locale", ["en", "ja"]);
//! let perspective = Perspective::new("Pairwise", |a: Assignment| a.with("Then", "Renders"))
//!     .with_variables(["OS", "Browser", "Locale"])
//!     .with_strength(2);
//! let exclusions = vec![Exclusion::new().exact("OS", "Linux").exact("Locale", "ja")];
//!
//! let suite = generate_tests(domain, None, exclusions, vec![perspective]).unwrap();
//! assert!(!suite.is_empty());
//! assert_eq!(suite.cases()[0].id, "1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
// Allow common patterns
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::module_name_repetitions)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::redundant_closure_for_method_calls))]
#![cfg_attr(test, allow(clippy::redundant_clone))]

pub mod assignment;
pub mod condition;
pub mod covering;
pub mod defaults;
pub mod domain;
pub mod error;
pub mod exclusion;
pub mod generator;
pub mod perspective;
pub mod proptest_impl;
pub mod requirement;
pub mod subset;
pub mod suite;
pub mod validate;

pub use assignment::{Assignment, DEFAULT_OUTCOME_FIELD, ID_FIELD, PERSPECTIVE_FIELD, TestCase};
pub use condition::{Condition, Matcher};
pub use covering::{CoveringArrayBuilder, Placement, apply_baseline};
pub use defaults::{first_levels, flatten_defaults, resolve_baseline};
pub use domain::{DomainNode, Factor, FactorDomain, FlatDomain, Scalar};
pub use error::{Error, Result};
pub use exclusion::{Exclusion, is_excluded, retain_allowed};
pub use generator::{Generator, PerspectiveSummary, TestSuite, generate_tests};
pub use perspective::{ExpectRule, Expectation, Perspective, RuleExpectation, TitleFormat};
pub use requirement::generate_requirements;
pub use subset::subsets;
pub use suite::{ExpectSpec, MatcherSpec, PerspectiveSpec, RuleSpec, SuiteDefinition};
pub use validate::validate_run;
