//! File export of a generated suite
//!
//! Runs after generation and only borrows the suite. A failed write is
//! returned to the caller; the suite itself is unaffected.

use std::path::{Path, PathBuf};

use cova_gen::TestSuite;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::json::to_json;
use crate::markdown::to_markdown;
use crate::matrix::{DEFAULT_FALSE_SYMBOL, DEFAULT_TRUE_SYMBOL, to_table};

/// JSON export target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonExport {
    /// Output file
    pub file_path: PathBuf,
}

fn default_true_symbol() -> String {
    DEFAULT_TRUE_SYMBOL.to_string()
}

fn default_false_symbol() -> String {
    DEFAULT_FALSE_SYMBOL.to_string()
}

/// Markdown matrix export target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownExport {
    /// Output file
    pub file_path: PathBuf,
    /// Mark for a selected level
    #[serde(default = "default_true_symbol")]
    pub true_symbol: String,
    /// Mark for an unselected level
    #[serde(default = "default_false_symbol")]
    pub false_symbol: String,
}

impl MarkdownExport {
    /// Export to `file_path` with the default `T` / `F` marks
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            true_symbol: default_true_symbol(),
            false_symbol: default_false_symbol(),
        }
    }
}

/// Which files to write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// JSON array of test cases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<JsonExport>,
    /// Markdown present/absent matrix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<MarkdownExport>,
}

impl ExportOptions {
    /// True if nothing would be written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.json.is_none() && self.markdown.is_none()
    }

    /// Resolve relative file paths against `base`
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        if let Some(json) = &mut self.json {
            json.file_path = base.join(&json.file_path);
        }
        if let Some(markdown) = &mut self.markdown {
            markdown.file_path = base.join(&markdown.file_path);
        }
        self
    }
}

/// Files written by [`export`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Paths written, JSON first
    pub written: Vec<PathBuf>,
}

/// Write the configured exports
///
/// # Errors
///
/// Returns the first serialization or write failure. Files written before
/// the failure are left in place.
pub fn export(suite: &TestSuite, options: &ExportOptions) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    if let Some(json) = &options.json {
        write_file(&json.file_path, &to_json(suite.cases())?)?;
        info!(path = %json.file_path.display(), cases = suite.len(), "wrote JSON export");
        summary.written.push(json.file_path.clone());
    }

    if let Some(markdown) = &options.markdown {
        let table = to_table(
            suite.flat_domain(),
            suite.cases(),
            &markdown.true_symbol,
            &markdown.false_symbol,
        );
        write_file(&markdown.file_path, &to_markdown(&table))?;
        info!(path = %markdown.file_path.display(), rows = table.len(), "wrote Markdown export");
        summary.written.push(markdown.file_path.clone());
    }

    Ok(summary)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let wrap = |source| Error::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, content).map_err(wrap)
}
