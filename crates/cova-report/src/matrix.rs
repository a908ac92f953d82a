//! Present/absent matrix of a test suite
//!
//! One row per (factor, level) pair in declaration order. Columns are the
//! factor path, the level, then one mark per test case: the true symbol when
//! the case selects that level, the false symbol otherwise.

use cova_gen::{FlatDomain, TestCase};

/// Mark for a level the case selects
pub const DEFAULT_TRUE_SYMBOL: &str = "T";

/// Mark for a level the case does not select
pub const DEFAULT_FALSE_SYMBOL: &str = "F";

/// Rows of cells, as produced by [`to_table`]
pub type Table = Vec<Vec<String>>;

/// Build the present/absent matrix
#[must_use]
pub fn to_table(
    domain: &FlatDomain,
    cases: &[TestCase],
    true_symbol: &str,
    false_symbol: &str,
) -> Table {
    let mut table = Table::new();
    for factor in domain {
        for level in &factor.levels {
            let mut row = Vec::with_capacity(cases.len() + 2);
            row.push(factor.path.clone());
            row.push(level.clone());
            row.extend(cases.iter().map(|case| {
                if case.get(&factor.path) == Some(level.as_str()) {
                    true_symbol.to_string()
                } else {
                    false_symbol.to_string()
                }
            }));
            table.push(row);
        }
    }
    table
}
