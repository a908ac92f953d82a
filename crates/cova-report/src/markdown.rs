//! Markdown rendering of the present/absent matrix
//!
//! Lines end with `\r\n`. The factor column is written only on the first row
//! of each factor.

/// Render a table produced by [`crate::to_table`]
///
/// An empty table renders as an empty string.
#[must_use]
pub fn to_markdown(table: &[Vec<String>]) -> String {
    let Some(first) = table.first() else {
        return String::new();
    };
    let cols = first.len();
    let tests = cols.saturating_sub(2);

    let mut md = String::from("|||");
    for t in 1..=tests {
        md.push_str(&format!("#{t}|"));
    }
    md.push_str("\r\n|");
    md.push_str(&"--|".repeat(cols));
    md.push_str("\r\n");

    let mut written: Vec<&str> = Vec::new();
    for row in table {
        md.push('|');
        for (c, cell) in row.iter().enumerate() {
            if c == 0 {
                if written.contains(&cell.as_str()) {
                    md.push('|');
                    continue;
                }
                written.push(cell);
            }
            md.push_str(cell);
            md.push('|');
        }
        md.push_str("\r\n");
    }
    md
}
