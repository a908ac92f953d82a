//! JSON export
//!
//! Test cases serialize as an array of flat objects, keys in normalized
//! column order (`ID`, `Perspective`, domain paths, outcome), indented with
//! tabs.

use cova_gen::TestCase;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;

/// Render test cases as tab-indented JSON
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(cases: &[TestCase]) -> Result<String> {
    let mut output = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = Serializer::with_formatter(&mut output, formatter);
    cases.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cova_gen::{Assignment, FactorDomain, Perspective, generate_tests};

    fn cases() -> Vec<TestCase> {
        let domain = FactorDomain::new()
            .group("Given", |g| g.factor("Course", ["Bachelor", "Master"]))
            .factor("Then", ["Pass", "Fail"]);
        let p = Perspective::new("Course", |a: Assignment| {
            let outcome = if a.get("Given.Course") == Some("Bachelor") {
                "Pass"
            } else {
                "Fail"
            };
            a.with("Then", outcome)
        })
        .with_variables(["Given.Course"]);
        generate_tests(domain, None, vec![], vec![p])
            .expect("generate")
            .into_cases()
    }

    #[test]
    fn test_to_json_layout() {
        let json = to_json(&cases()).expect("json");
        let expected = "[\n\t{\n\t\t\"ID\": \"1\",\n\t\t\"Perspective\": \"Course\",\n\t\t\"Given.Course\": \"Bachelor\",\n\t\t\"Then\": \"Pass\"\n\t},\n\t{\n\t\t\"ID\": \"2\",\n\t\t\"Perspective\": \"Course\",\n\t\t\"Given.Course\": \"Master\",\n\t\t\"Then\": \"Fail\"\n\t}\n]";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[]).expect("json"), "[]");
    }

    #[test]
    fn test_to_json_parses_back() {
        let json = to_json(&cases()).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value[1]["Then"], "Fail");
    }
}
