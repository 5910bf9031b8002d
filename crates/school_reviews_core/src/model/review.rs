//! Review record and its write-side input.
//!
//! # Invariants
//! - `tier` is always within `TIER_MIN..=TIER_MAX`.
//! - `text` is never empty or whitespace-only.
//! - At most one review exists per `(author_id, subject_id)`.

use crate::model::subject::SubjectId;
use crate::model::validation::ValidationError;
use crate::model::UserId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a review row.
pub type ReviewId = Uuid;

pub const TIER_MIN: u8 = 1;
pub const TIER_MAX: u8 = 5;

/// One member's rating and text for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub author_id: UserId,
    pub subject_id: SubjectId,
    /// Hide the author when rendering.
    pub anonymous: bool,
    pub tier: u8,
    pub text: String,
    /// Calendar date of the last write.
    pub date: NaiveDate,
}

impl Review {
    /// Checks the invariants of a loaded or constructed review.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_review_input(self.tier, &self.text)
    }
}

/// Content of an `add` call once the subject has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub subject_id: SubjectId,
    pub author_id: UserId,
    pub tier: u8,
    pub anonymous: bool,
    pub text: String,
    pub date: NaiveDate,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_review_input(self.tier, &self.text)
    }
}

/// Validates tier range first, then text presence.
pub fn validate_review_input(tier: u8, text: &str) -> Result<(), ValidationError> {
    if !(TIER_MIN..=TIER_MAX).contains(&tier) {
        return Err(ValidationError::InvalidTier(tier));
    }
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(())
}
