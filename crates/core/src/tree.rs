//! Materialized-path encoding for the category tree.
//!
//! A category's position is a fixed-width string of zero-padded 3-digit
//! groups, one group per tree level: `"001"` is the second top-level
//! category, `"001000"` its first child. The encoding gives three queries
//! for free, with no recursion:
//!
//! - depth-first display order is plain string ordering (groups are
//!   fixed-width, so lexicographic and numeric order agree),
//! - "is descendant of" is a string-prefix test,
//! - the parent path is the path minus its trailing group.
//!
//! [`TreePath`] validates these invariants once at the boundary so the rest
//! of the code can do path arithmetic without re-checking.

use std::fmt;

use crate::error::CoreError;

/// Width of one sibling-index group in the path string.
pub const GROUP_WIDTH: usize = 3;

/// Largest sibling index the fixed-width encoding can hold per level.
pub const MAX_SIBLING_INDEX: u32 = 999;

/// A validated materialized path.
///
/// Invariants (enforced by every constructor):
/// - nonempty,
/// - length is a multiple of [`GROUP_WIDTH`],
/// - ASCII digits only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(String);

impl TreePath {
    /// Parse and validate a path string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.is_empty() || s.len() % GROUP_WIDTH != 0 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::Integrity(format!(
                "malformed tree path {s:?}: expected nonempty groups of {GROUP_WIDTH} digits"
            )));
        }
        Ok(TreePath(s.to_string()))
    }

    /// Build a top-level path from a sibling index.
    pub fn root(index: u32) -> Result<Self, CoreError> {
        if index > MAX_SIBLING_INDEX {
            return Err(CoreError::Conflict(format!(
                "top level is full: sibling index {index} does not fit in {GROUP_WIDTH} digits"
            )));
        }
        Ok(TreePath(format!("{index:03}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tree level encoded by this path: `0` for top-level categories.
    pub fn level(&self) -> i64 {
        (self.0.len() / GROUP_WIDTH) as i64 - 1
    }

    /// Path of the immediate parent, or `None` for a top-level path.
    pub fn parent(&self) -> Option<TreePath> {
        if self.0.len() == GROUP_WIDTH {
            None
        } else {
            Some(TreePath(self.0[..self.0.len() - GROUP_WIDTH].to_string()))
        }
    }

    /// Sibling index of the final group.
    pub fn last_index(&self) -> u32 {
        // Constructor guarantees the suffix is exactly GROUP_WIDTH digits.
        self.0[self.0.len() - GROUP_WIDTH..].parse().unwrap()
    }

    /// Path of this node's child with the given sibling index.
    pub fn child(&self, index: u32) -> Result<TreePath, CoreError> {
        if index > MAX_SIBLING_INDEX {
            return Err(CoreError::Conflict(format!(
                "category {} is full: sibling index {index} does not fit in {GROUP_WIDTH} digits",
                self.0
            )));
        }
        Ok(TreePath(format!("{}{index:03}", self.0)))
    }

    /// Path of the next sibling (same parent, index + 1).
    pub fn next_sibling(&self) -> Result<TreePath, CoreError> {
        let index = self.last_index() + 1;
        match self.parent() {
            Some(parent) => parent.child(index),
            None => TreePath::root(index),
        }
    }

    /// Strict descendant test: `self` lies somewhere below `other`.
    pub fn is_descendant_of(&self, other: &TreePath) -> bool {
        self.0.len() > other.0.len() && self.0.starts_with(&other.0)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
