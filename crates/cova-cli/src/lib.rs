//! Cova CLI Library
//!
//! Library functions for the `cova` command-line tool.

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use cova_gen::{SuiteDefinition, TestSuite, generate_requirements};
use cova_report::{ExportOptions, ExportSummary, export, to_json, to_markdown, to_table};
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Result of a CLI operation
#[derive(Debug)]
pub enum CliResult {
    /// Operation succeeded
    Success(String),
    /// Operation failed with error
    Error(String),
}

impl CliResult {
    /// Returns true if the result is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the message
    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Error(msg) => msg,
        }
    }
}

/// A suite file: the suite definition plus an optional `export:` section
#[derive(Debug, Clone)]
pub struct SuiteFile {
    /// Generation input
    pub suite: SuiteDefinition,
    /// Files to write after generation
    pub export: Option<ExportOptions>,
}

#[derive(Deserialize)]
struct ExportSection {
    #[serde(default)]
    export: Option<ExportOptions>,
}

/// Output format of `cova generate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-indented JSON array
    Json,
    /// YAML sequence
    Yaml,
    /// Markdown present/absent matrix
    Markdown,
}

/// Parse output format string to enum
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format {
        "json" => Ok(OutputFormat::Json),
        "yaml" => Ok(OutputFormat::Yaml),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Unknown output format: {format}")),
    }
}

/// Parse a suite file from YAML text
pub fn parse_suite(yaml: &str) -> Result<SuiteFile, String> {
    let suite =
        SuiteDefinition::from_yaml(yaml).map_err(|e| format!("Error loading suite: {e}"))?;
    let section: ExportSection =
        serde_yaml::from_str(yaml).map_err(|e| format!("Error loading export options: {e}"))?;
    Ok(SuiteFile {
        suite,
        export: section.export,
    })
}

/// Load a suite file from a path
pub fn load_suite(path: &Path) -> Result<SuiteFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let file = parse_suite(&content)?;
    debug!(
        path = %path.display(),
        perspectives = file.suite.perspectives.len(),
        export = file.export.is_some(),
        "loaded suite"
    );
    Ok(file)
}

/// Run the generator over a suite definition
pub fn generate_suite(suite: SuiteDefinition) -> Result<TestSuite, String> {
    suite
        .into_generator()
        .and_then(|generator| generator.generate())
        .map_err(|e| format!("Error generating tests: {e}"))
}

/// Render generated cases in the requested format
pub fn render_suite(
    suite: &TestSuite,
    format: OutputFormat,
    true_symbol: &str,
    false_symbol: &str,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            to_json(suite.cases()).map_err(|e| format!("Error serializing tests: {e}"))
        }
        OutputFormat::Yaml => serde_yaml::to_string(suite.cases())
            .map_err(|e| format!("Error serializing tests: {e}")),
        OutputFormat::Markdown => Ok(to_markdown(&to_table(
            suite.flat_domain(),
            suite.cases(),
            true_symbol,
            false_symbol,
        ))),
    }
}

/// Write the suite file's export section
pub fn export_suite(suite: &TestSuite, options: &ExportOptions) -> Result<ExportSummary, String> {
    export(suite, options).map_err(|e| format!("Error exporting tests: {e}"))
}

/// List the flattened domain, one factor per line
pub fn list_paths(suite: &SuiteDefinition) -> Result<String, String> {
    let flat = suite
        .domain
        .flatten()
        .map_err(|e| format!("Error flattening domain: {e}"))?;
    let mut out = String::new();
    for factor in &flat {
        let _ = writeln!(out, "{}: {}", factor.path, factor.levels.join(", "));
    }
    Ok(out)
}

/// Validate a suite and report per-perspective requirement counts
pub fn check_suite(suite: SuiteDefinition) -> Result<String, String> {
    let generator = suite
        .into_generator()
        .map_err(|e| format!("Invalid suite: {e}"))?;
    let (flat, _) = generator
        .prepare()
        .map_err(|e| format!("Invalid suite: {e}"))?;

    let mut out = format!(
        "{} factor(s), {} exclusion(s), {} perspective(s)\n",
        flat.len(),
        generator.exclusions().len(),
        generator.perspectives().len()
    );
    for perspective in generator.perspectives() {
        let strength = perspective
            .resolved_strength()
            .map_err(|e| format!("Invalid suite: {e}"))?;
        let requirements = generate_requirements(perspective, &flat, generator.exclusions())
            .map_err(|e| format!("Invalid suite: {e}"))?;
        let _ = writeln!(
            out,
            "  {}: strength {strength}, {} requirement(s)",
            perspective.title,
            requirements.len()
        );
    }
    Ok(out)
}
