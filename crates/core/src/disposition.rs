//! The "what happens to the notes" choice for destructive operations.
//!
//! Deleting a category (and its subtree) or a user both orphan notes; the
//! caller must say whether those notes are kept (reassigned) or deleted.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::CoreError;

/// Caller-supplied fate of notes orphaned by a delete operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteDisposition {
    /// Reassign the notes to a surviving owner.
    Keep,
    /// Delete the notes along with their owner.
    Delete,
}

impl FromStr for NoteDisposition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(NoteDisposition::Keep),
            "delete" => Ok(NoteDisposition::Delete),
            other => Err(CoreError::Validation(format!("Unknown command {other:?}"))),
        }
    }
}
