//! Cova Report Exporters
//!
//! Renders generated test suites for people and tools: a tab-indented JSON
//! array of test cases, and a Markdown present/absent matrix with one row
//! per factor level and one column per test case.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
// Allow common patterns
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::format_push_string)]
#![allow(clippy::module_name_repetitions)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::redundant_closure_for_method_calls))]

pub mod error;
pub mod export;
pub mod json;
pub mod markdown;
pub mod matrix;

pub use error::{Error, Result};
pub use export::{ExportOptions, ExportSummary, JsonExport, MarkdownExport, export};
pub use json::to_json;
pub use markdown::to_markdown;
pub use matrix::{DEFAULT_FALSE_SYMBOL, DEFAULT_TRUE_SYMBOL, Table, to_table};
