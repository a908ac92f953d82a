//! Example: Exporting a Present/Absent Matrix
//!
//! Loads the bundled enrolment suite, prints its Markdown matrix and writes
//! the JSON and Markdown exports into a temporary directory.
//!
//! Run with: `cargo run --example export_matrix -p cova-report`

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::expect_used)]

use cova_gen::SuiteDefinition;
use cova_report::{ExportOptions, JsonExport, MarkdownExport, export, to_markdown, to_table};

const SUITE: &str = include_str!("../../../suites/enrolment.yaml");

fn main() {
    let suite = SuiteDefinition::from_yaml(SUITE)
        .expect("parse suite")
        .into_generator()
        .expect("compile suite")
        .generate()
        .expect("generate");

    let table = to_table(suite.flat_domain(), suite.cases(), "o", "-");
    print!("{}", to_markdown(&table).replace("\r\n", "\n"));

    let dir = std::env::temp_dir().join("cova-export-matrix");
    let options = ExportOptions {
        json: Some(JsonExport {
            file_path: "tests.json".into(),
        }),
        markdown: Some(MarkdownExport::new("tests.md")),
    }
    .relative_to(&dir);
    let summary = export(&suite, &options).expect("export");
    for path in summary.written {
        println!("wrote {}", path.display());
    }
}
