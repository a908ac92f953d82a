//! Test suite generation
//!
//! [`Generator`] runs the whole pipeline: flatten the domain, resolve the
//! baseline, validate every reference, then for each perspective derive
//! requirements, pack them into a covering array, fill from the baseline,
//! drop excluded rows and annotate the survivors. The assembler concatenates
//! the perspectives' rows and numbers them.

use crate::assignment::{Assignment, DEFAULT_OUTCOME_FIELD, TestCase};
use crate::covering::{CoveringArrayBuilder, apply_baseline};
use crate::defaults::resolve_baseline;
use crate::domain::{FactorDomain, FlatDomain};
use crate::error::{Error, Result};
use crate::exclusion::{Exclusion, retain_allowed};
use crate::perspective::{Perspective, TitleFormat};
use crate::requirement::generate_requirements;
use crate::validate::validate_run;
use serde::Serialize;
use tracing::{debug, info};

/// Per-perspective generation statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerspectiveSummary {
    /// Formatted title
    pub title: String,
    /// Resolved strength
    pub strength: usize,
    /// Requirements left after exclusion pruning
    pub requirements: usize,
    /// Rows produced by the covering array builder
    pub rows_built: usize,
    /// Rows dropped by exclusions after the baseline fill
    pub rows_excluded: usize,
    /// Rows contributed to the suite
    pub rows_emitted: usize,
}

/// Output of a generation run
#[derive(Debug, Clone, Serialize)]
pub struct TestSuite {
    domain: FlatDomain,
    outcome_field: String,
    cases: Vec<TestCase>,
    #[serde(skip)]
    summaries: Vec<PerspectiveSummary>,
}

impl TestSuite {
    /// Flattened domain, in declaration order
    #[must_use]
    pub fn flat_domain(&self) -> &FlatDomain {
        &self.domain
    }

    /// Name of the outcome field
    #[must_use]
    pub fn outcome_field(&self) -> &str {
        &self.outcome_field
    }

    /// Test cases in final order
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Statistics per perspective, in input order
    #[must_use]
    pub fn summaries(&self) -> &[PerspectiveSummary] {
        &self.summaries
    }

    /// Number of test cases
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether no test case was generated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Iterate test cases
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Consume the suite, keeping the cases
    #[must_use]
    pub fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }
}

impl<'a> IntoIterator for &'a TestSuite {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Configurable generation run
#[derive(Debug, Clone)]
pub struct Generator {
    domain: FactorDomain,
    defaults: Option<FactorDomain>,
    exclusions: Vec<Exclusion>,
    perspectives: Vec<Perspective>,
    outcome_field: String,
    title_format: TitleFormat,
}

impl Generator {
    /// Create a generator over `domain` with no perspectives
    #[must_use]
    pub fn new(domain: FactorDomain) -> Self {
        Self {
            domain,
            defaults: None,
            exclusions: Vec::new(),
            perspectives: Vec::new(),
            outcome_field: DEFAULT_OUTCOME_FIELD.to_string(),
            title_format: TitleFormat::default(),
        }
    }

    /// Use an explicit defaults tree for the baseline
    #[must_use]
    pub fn with_defaults(mut self, defaults: FactorDomain) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Set the exclusion rules
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: Vec<Exclusion>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Set the perspectives, processed in order
    #[must_use]
    pub fn with_perspectives(mut self, perspectives: Vec<Perspective>) -> Self {
        self.perspectives = perspectives;
        self
    }

    /// Append one perspective
    #[must_use]
    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspectives.push(perspective);
        self
    }

    /// Set the outcome field name (default `Then`)
    #[must_use]
    pub fn with_outcome_field(mut self, field: impl Into<String>) -> Self {
        self.outcome_field = field.into();
        self
    }

    /// Set the title normalization
    #[must_use]
    pub fn with_title_format(mut self, format: TitleFormat) -> Self {
        self.title_format = format;
        self
    }

    /// Perspectives configured so far
    #[must_use]
    pub fn perspectives(&self) -> &[Perspective] {
        &self.perspectives
    }

    /// Exclusion rules
    #[must_use]
    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// Flatten and validate without generating
    ///
    /// Returns the flattened domain and the resolved baseline.
    ///
    /// # Errors
    ///
    /// Any configuration error [`Generator::generate`] would report before
    /// expanding perspectives.
    pub fn prepare(&self) -> Result<(FlatDomain, Assignment)> {
        let domain = self.domain.flatten()?;
        let baseline = resolve_baseline(&domain, self.defaults.as_ref())?;
        validate_run(
            &domain,
            &self.exclusions,
            &self.perspectives,
            &self.outcome_field,
        )?;
        Ok((domain, baseline))
    }

    /// Run the pipeline
    ///
    /// # Errors
    ///
    /// Any error aborts the whole run; no partial suite is returned.
    pub fn generate(&self) -> Result<TestSuite> {
        let (domain, baseline) = self.prepare()?;

        let mut rows: Vec<(String, Assignment)> = Vec::new();
        let mut summaries = Vec::with_capacity(self.perspectives.len());
        for perspective in &self.perspectives {
            let (annotated, summary) = self.run_perspective(perspective, &domain, &baseline)?;
            debug!(
                perspective = %summary.title,
                strength = summary.strength,
                requirements = summary.requirements,
                rows_built = summary.rows_built,
                rows_excluded = summary.rows_excluded,
                "perspective generated"
            );
            rows.extend(annotated);
            summaries.push(summary);
        }

        let cases = assemble(&domain, &self.outcome_field, rows);
        info!(
            perspectives = self.perspectives.len(),
            cases = cases.len(),
            "test suite generated"
        );

        Ok(TestSuite {
            domain,
            outcome_field: self.outcome_field.clone(),
            cases,
            summaries,
        })
    }

    fn run_perspective(
        &self,
        perspective: &Perspective,
        domain: &FlatDomain,
        baseline: &Assignment,
    ) -> Result<(Vec<(String, Assignment)>, PerspectiveSummary)> {
        let strength = perspective.resolved_strength()?;
        let requirements = generate_requirements(perspective, domain, &self.exclusions)?;

        let mut rows = CoveringArrayBuilder::build(&requirements);
        let rows_built = rows.len();
        apply_baseline(&mut rows, &perspective.baseline(baseline));
        let rows_excluded = retain_allowed(&mut rows, &self.exclusions);

        let title = self.title_format.apply(&perspective.title);
        let annotated = rows
            .into_iter()
            .map(|row| {
                let row = perspective.expectation().expect(row);
                if row.is_set(&self.outcome_field) {
                    Ok((title.clone(), row))
                } else {
                    Err(Error::MissingOutcome {
                        perspective: perspective.title.clone(),
                        field: self.outcome_field.clone(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let summary = PerspectiveSummary {
            title,
            strength,
            requirements: requirements.len(),
            rows_built,
            rows_excluded,
            rows_emitted: annotated.len(),
        };
        Ok((annotated, summary))
    }
}

/// Number rows and put their fields in normalized order
///
/// Keys that are neither domain paths nor the outcome field are dropped.
fn assemble(domain: &FlatDomain, outcome_field: &str, rows: Vec<(String, Assignment)>) -> Vec<TestCase> {
    rows.into_iter()
        .enumerate()
        .map(|(i, (title, row))| {
            let mut fields: Vec<(String, String)> = domain
                .paths()
                .filter(|path| *path != outcome_field)
                .filter_map(|path| row.get(path).map(|level| (path.to_string(), level.to_string())))
                .collect();
            if let Some(outcome) = row.get(outcome_field) {
                fields.push((outcome_field.to_string(), outcome.to_string()));
            }
            TestCase::new((i + 1).to_string(), title, fields)
        })
        .collect()
}

/// Generate a test suite with the default outcome field and title format
///
/// # Errors
///
/// See [`Generator::generate`].
pub fn generate_tests(
    domain: FactorDomain,
    defaults: Option<FactorDomain>,
    exclusions: Vec<Exclusion>,
    perspectives: Vec<Perspective>,
) -> Result<TestSuite> {
    let mut generator = Generator::new(domain)
        .with_exclusions(exclusions)
        .with_perspectives(perspectives);
    if let Some(defaults) = defaults {
        generator = generator.with_defaults(defaults);
    }
    generator.generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::perspective::RuleExpectation;
    use std::collections::BTreeSet;

    fn abc() -> FactorDomain {
        FactorDomain::new()
            .factor("A", ["a1", "a2"])
            .factor("B", ["b1", "b2"])
            .factor("C", ["c1", "c2"])
            .factor("Then", ["Pass", "Fail"])
    }

    fn always_pass(a: Assignment) -> Assignment {
        a.with("Then", "Pass")
    }

    fn projection(suite: &TestSuite, paths: &[&str]) -> Vec<Vec<String>> {
        suite
            .iter()
            .map(|case| {
                paths
                    .iter()
                    .map(|p| case.get(p).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }

    fn course_grade() -> FactorDomain {
        FactorDomain::new()
            .group("Given", |g| {
                g.factor("Course", ["Bachelor", "Master", "Doctor"])
                    .factor("Grade", ["1", "2", "3", "4"])
            })
            .factor("Then", ["Pass", "Fail", "Any"])
    }

    #[test]
    fn test_full_combination_two_factors() {
        let p = Perspective::new("p", always_pass).with_variables(["A", "B"]);
        let suite = generate_tests(abc(), None, vec![], vec![p]).expect("generate");
        assert_eq!(suite.len(), 4);
        assert_eq!(
            projection(&suite, &["A", "B", "C"]),
            vec![
                vec!["a1", "b1", "c1"],
                vec!["a1", "b2", "c1"],
                vec!["a2", "b1", "c1"],
                vec!["a2", "b2", "c1"],
            ]
        );
    }

    #[test]
    fn test_strength_one_packs_rows() {
        let p = Perspective::new("p", always_pass)
            .with_variables(["A", "B", "C"])
            .with_strength(1);
        let suite = generate_tests(abc(), None, vec![], vec![p]).expect("generate");
        assert_eq!(
            projection(&suite, &["A", "B", "C"]),
            vec![vec!["a1", "b1", "c1"], vec!["a2", "b2", "c2"]]
        );
    }

    #[test]
    fn test_exclusion_removes_combination() {
        let p = Perspective::new("p", always_pass).with_variables(["A", "B"]);
        let exclusions = vec![Exclusion::new().exact("A", "a1").exact("B", "b1")];
        let suite = generate_tests(abc(), None, exclusions, vec![p]).expect("generate");
        assert_eq!(suite.len(), 3);
        assert!(
            !projection(&suite, &["A", "B"]).contains(&vec!["a1".to_string(), "b1".to_string()])
        );
    }

    #[test]
    fn test_strength_exceeds_variables_aborts() {
        let p = Perspective::new("p", always_pass)
            .with_variables(["A", "B"])
            .with_strength(3);
        let err = generate_tests(abc(), None, vec![], vec![p]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_ids_are_sequential_across_perspectives() {
        let first = Perspective::new("first", always_pass).with_variables(["A"]);
        let second = Perspective::new("second", always_pass).with_variables(["B", "C"]);
        let suite = generate_tests(abc(), None, vec![], vec![first, second]).expect("generate");
        assert_eq!(suite.len(), 6);
        let ids: Vec<&str> = suite.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(suite.cases()[1].perspective, "first");
        assert_eq!(suite.cases()[2].perspective, "second");
    }

    #[test]
    fn test_field_order() {
        let domain = FactorDomain::new()
            .factor("Then", ["Pass", "Fail"])
            .factor("Z", ["z1"])
            .factor("A", ["a1"]);
        let p = Perspective::new("p", always_pass).with_variables(["Z"]);
        let suite = generate_tests(domain, None, vec![], vec![p]).expect("generate");
        let keys: Vec<&str> = suite.cases()[0]
            .fields()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["Z", "A", "Then"]);
    }

    #[test]
    fn test_constants_override_baseline() {
        let p = Perspective::new("p", always_pass)
            .with_variables(["A"])
            .with_constant("C", "c2");
        let suite = generate_tests(abc(), None, vec![], vec![p]).expect("generate");
        assert!(suite.iter().all(|c| c.get("C") == Some("c2")));
        assert!(suite.iter().all(|c| c.get("B") == Some("b1")));
    }

    #[test]
    fn test_explicit_defaults_fill_unset_cells() {
        let defaults = FactorDomain::new()
            .value("A", "a1")
            .value("B", "b2")
            .value("C", "c2")
            .value("Then", "Fail");
        let p = Perspective::new("p", always_pass).with_variables(["A"]);
        let suite = generate_tests(abc(), Some(defaults), vec![], vec![p]).expect("generate");
        assert_eq!(
            projection(&suite, &["A", "B", "C"]),
            vec![vec!["a1", "b2", "c2"], vec!["a2", "b2", "c2"]]
        );
    }

    #[test]
    fn test_perspective_without_variables_yields_baseline_row() {
        let p = Perspective::new("baseline", always_pass);
        let suite = generate_tests(abc(), None, vec![], vec![p]).expect("generate");
        assert_eq!(projection(&suite, &["A", "B", "C"]), vec![vec!["a1", "b1", "c1"]]);
    }

    #[test]
    fn test_no_perspectives_is_empty() {
        let suite = generate_tests(abc(), None, vec![], vec![]).expect("generate");
        assert!(suite.is_empty());
        assert_eq!(suite.flat_domain().len(), 4);
    }

    #[test]
    fn test_missing_outcome_fails() {
        let p = Perspective::new("silent", |a: Assignment| a).with_variables(["A"]);
        let err = Generator::new(abc())
            .with_perspective(p)
            .with_outcome_field("Verdict")
            .generate()
            .unwrap_err();
        assert!(matches!(err, Error::MissingOutcome { ref perspective, .. } if perspective == "silent"));
    }

    #[test]
    fn test_outcome_outside_domain_is_last() {
        let p = Perspective::new("p", |a: Assignment| a.with("Verdict", "ok").with("Extra", "x"))
            .with_variables(["A"]);
        let suite = Generator::new(abc())
            .with_perspective(p)
            .with_outcome_field("Verdict")
            .generate()
            .expect("generate");
        let case = &suite.cases()[0];
        assert_eq!(case.fields().last().map(|(k, _)| k.as_str()), Some("Verdict"));
        assert_eq!(case.get("Extra"), None);
        // Then is an ordinary domain factor here
        assert_eq!(case.get("Then"), Some("Pass"));
    }

    #[test]
    fn test_title_format_applied() {
        let p = Perspective::new("Login (PC)", always_pass).with_variables(["A"]);
        let suite = Generator::new(abc())
            .with_perspective(p)
            .with_title_format(TitleFormat::fullwidth_parentheses())
            .generate()
            .expect("generate");
        assert_eq!(suite.cases()[0].perspective, "Login （PC）");
        assert_eq!(suite.summaries()[0].title, "Login （PC）");
    }

    #[test]
    fn test_determinism() {
        let build = || {
            let p = Perspective::new("p", always_pass)
                .with_variables(["A", "B", "C"])
                .with_strength(2);
            generate_tests(abc(), None, vec![], vec![p]).expect("generate")
        };
        assert_eq!(build().cases(), build().cases());
    }

    #[test]
    fn test_course_grade_full_combination_with_exclusions() {
        let expectation = RuleExpectation::new("Then")
            .when(Condition::new().exact("Given.Course", "Bachelor"), "Pass")
            .otherwise("Fail");
        let p = Perspective::new("enrolment", expectation)
            .with_variables(["Given.Course", "Given.Grade"]);
        let exclusions = vec![
            Exclusion::new()
                .exact("Given.Course", "Master")
                .exact("Given.Grade", "3"),
            Exclusion::new()
                .exact("Given.Course", "Master")
                .exact("Given.Grade", "4"),
            Exclusion::new()
                .exact("Given.Course", "Doctor")
                .exact("Given.Grade", "4"),
        ];
        let defaults = FactorDomain::new()
            .group("Given", |g| g.value("Course", "Bachelor").value("Grade", "1"))
            .value("Then", "Any");
        let suite = generate_tests(course_grade(), Some(defaults), exclusions, vec![p])
            .expect("generate");

        assert_eq!(suite.len(), 9);
        let bachelor_pass = suite
            .iter()
            .filter(|c| c.get("Given.Course") == Some("Bachelor") && c.get("Then") == Some("Pass"))
            .count();
        assert_eq!(bachelor_pass, 4);
        let combos: BTreeSet<(String, String)> = suite
            .iter()
            .map(|c| {
                (
                    c.get("Given.Course").unwrap_or_default().to_string(),
                    c.get("Given.Grade").unwrap_or_default().to_string(),
                )
            })
            .collect();
        assert_eq!(combos.len(), 9);
        assert!(!combos.contains(&("Doctor".to_string(), "4".to_string())));
    }

    #[test]
    fn test_summaries() {
        let p = Perspective::new("p", always_pass).with_variables(["A", "B"]);
        let exclusions = vec![Exclusion::new().exact("C", "c1")];
        let suite = generate_tests(abc(), None, exclusions, vec![p]).expect("generate");
        // Baseline fill puts C=c1 on every row, so all of them are dropped
        assert!(suite.is_empty());
        let summary = &suite.summaries()[0];
        assert_eq!(summary.strength, 2);
        assert_eq!(summary.requirements, 4);
        assert_eq!(summary.rows_built, 4);
        assert_eq!(summary.rows_excluded, 4);
        assert_eq!(summary.rows_emitted, 0);
    }

    #[test]
    fn test_prepare_reports_unknown_path() {
        let p = Perspective::new("p", always_pass).with_variables(["Nope"]);
        let err = Generator::new(abc()).with_perspective(p).prepare().unwrap_err();
        assert!(matches!(err, Error::UnknownPath { .. }));
    }

    #[test]
    fn test_suite_serializes_cases_in_order() {
        let p = Perspective::new("p", always_pass).with_variables(["A"]);
        let suite = generate_tests(abc(), None, vec![], vec![p]).expect("generate");
        let json = serde_json::to_string(&suite.cases()[0]).expect("json");
        assert_eq!(
            json,
            r#"{"ID":"1","Perspective":"p","A":"a1","B":"b1","C":"c1","Then":"Pass"}"#
        );
    }
}
