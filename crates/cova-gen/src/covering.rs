//! Greedy covering array construction
//!
//! [`CoveringArrayBuilder`] packs requirements into rows in a single pass. It
//! is a greedy heuristic: the result is compact but not guaranteed minimal,
//! and the layout depends on requirement order. Keep that order stable.

use crate::assignment::Assignment;

/// Where a requirement ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// An existing row already contained it
    Satisfied(usize),
    /// Unset cells of an existing row were filled
    Extended(usize),
    /// A new row was appended
    Appended(usize),
}

impl Placement {
    /// Index of the row involved
    #[must_use]
    pub const fn row(&self) -> usize {
        match self {
            Self::Satisfied(i) | Self::Extended(i) | Self::Appended(i) => *i,
        }
    }
}

/// One-pass greedy row packer
#[derive(Debug, Clone, Default)]
pub struct CoveringArrayBuilder {
    rows: Vec<Assignment>,
}

impl CoveringArrayBuilder {
    /// Create a builder with no rows
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Pack every requirement in order and return the rows
    #[must_use]
    pub fn build(requirements: &[Assignment]) -> Vec<Assignment> {
        let mut builder = Self::new();
        for requirement in requirements {
            builder.push(requirement);
        }
        builder.into_rows()
    }

    /// Place a single requirement
    ///
    /// 1. Skip it if some row already contains every pair.
    /// 2. Otherwise fill the first row (creation order) whose cells on the
    ///    requirement's paths are unset or equal, with at least one unset.
    /// 3. Otherwise append a row holding exactly the requirement.
    pub fn push(&mut self, requirement: &Assignment) -> Placement {
        if let Some(i) = self.rows.iter().position(|row| row.satisfies(requirement)) {
            return Placement::Satisfied(i);
        }

        if let Some(i) = self.rows.iter().position(|row| can_extend(row, requirement)) {
            let row = &mut self.rows[i];
            for (path, level) in requirement.iter() {
                if !row.is_set(path) {
                    row.set(path, level);
                }
            }
            return Placement::Extended(i);
        }

        self.rows.push(requirement.clone());
        Placement::Appended(self.rows.len() - 1)
    }

    /// Rows built so far
    #[must_use]
    pub fn rows(&self) -> &[Assignment] {
        &self.rows
    }

    /// Consume the builder
    #[must_use]
    pub fn into_rows(self) -> Vec<Assignment> {
        self.rows
    }
}

/// Compatible on every requirement path, with room on at least one
fn can_extend(row: &Assignment, requirement: &Assignment) -> bool {
    let mut has_room = false;
    for (path, level) in requirement.iter() {
        match row.get(path) {
            None => has_room = true,
            Some(existing) if existing != level => return false,
            Some(_) => {}
        }
    }
    has_room
}

/// Fill every unset cell of every row from `baseline`
pub fn apply_baseline(rows: &mut [Assignment], baseline: &Assignment) {
    for row in rows {
        for (path, level) in baseline.iter() {
            if !row.is_set(path) {
                row.set(path, level);
            }
        }
    }
}
