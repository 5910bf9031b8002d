//! Subject (course) record.
//!
//! # Invariants
//! - `(space_id, shortcut_key(shortcut))` is unique.
//! - `shortcut` keeps the casing it was last submitted with.

use crate::model::validation::ValidationError;
use crate::model::SpaceId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a subject row.
pub type SubjectId = Uuid;

/// A course or topic that members can review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub space_id: SpaceId,
    /// Short code as submitted, e.g. `CS101`.
    pub shortcut: String,
    /// Full course name.
    pub name: String,
    /// Department or other grouping; may be empty.
    pub category: String,
}

impl Subject {
    /// Shortcut followed by the category in parentheses, when there is one.
    pub fn label(&self) -> String {
        if self.category.is_empty() {
            self.shortcut.clone()
        } else {
            format!("{} ({})", self.shortcut, self.category)
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.shortcut, self.name, self.category)
    }
}

/// Lookup key for a shortcut: trimmed and lowercased.
///
/// Every read and write goes through this, so `CS101`, `cs101` and ` Cs101 `
/// address the same subject.
pub fn shortcut_key(shortcut: &str) -> Result<String, ValidationError> {
    let trimmed = shortcut.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyShortcut);
    }
    Ok(trimmed.to_lowercase())
}
