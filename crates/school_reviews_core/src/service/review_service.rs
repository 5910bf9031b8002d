//! Review use-case service.
//!
//! # Responsibility
//! - Resolve the subject, validate input and hand the write to the review
//!   repository (`add`), plus removal and read use-cases.
//! - Build the per-subject overview consumed by review pages.
//!
//! # Invariants
//! - Validation order is: subject lookup, tier, text. A failure at any step
//!   leaves storage untouched.
//! - Re-adding a review overwrites it in place and deletes all of its votes.

use crate::model::review::{validate_review_input, Review, ReviewDraft, ReviewId};
use crate::model::subject::{Subject, SubjectId};
use crate::model::validation::ValidationError;
use crate::model::{SpaceId, UserId};
use crate::rating::aggregate::{average_tier, sorted_by_date_desc};
use crate::repo::review_repo::ReviewRepository;
use crate::repo::subject_repo::SubjectRepository;
use crate::repo::RepoError;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for review use-cases.
#[derive(Debug)]
pub enum ReviewServiceError {
    /// No subject with this shortcut in the space.
    SubjectNotFound(String),
    ReviewNotFound(ReviewId),
    InvalidTier(u8),
    EmptyText,
    /// The subject was removed between lookup and write.
    RaceAborted(SubjectId),
    Repo(RepoError),
}

impl ReviewServiceError {
    /// True when the caller should report "unknown subject", including the
    /// case where the subject disappeared mid-write.
    pub fn is_subject_missing(&self) -> bool {
        matches!(self, Self::SubjectNotFound(_) | Self::RaceAborted(_))
    }
}

impl Display for ReviewServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubjectNotFound(shortcut) => write!(f, "subject not found: `{shortcut}`"),
            Self::ReviewNotFound(id) => write!(f, "review not found: {id}"),
            Self::InvalidTier(tier) => write!(f, "tier {tier} is outside the range 1..=5"),
            Self::EmptyText => write!(f, "review text cannot be empty"),
            Self::RaceAborted(id) => write!(f, "subject {id} was removed during the write"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReviewServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ReviewServiceError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::InvalidTier(tier) => Self::InvalidTier(tier),
            ValidationError::EmptyText => Self::EmptyText,
            other => Self::Repo(RepoError::Validation(other)),
        }
    }
}

impl From<RepoError> for ReviewServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            RepoError::ReviewNotFound(id) => Self::ReviewNotFound(id),
            RepoError::RaceAborted(id) => Self::RaceAborted(id),
            other => Self::Repo(other),
        }
    }
}

/// Everything a subject's review pages need.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectOverview {
    pub subject: Subject,
    /// Newest first; equal dates keep storage order.
    pub reviews: Vec<Review>,
    /// `None` when the subject has no reviews yet.
    pub average_tier: Option<f64>,
}

/// Review service facade over subject and review repositories.
pub struct ReviewService<S: SubjectRepository, R: ReviewRepository> {
    subjects: S,
    reviews: R,
    today: fn() -> NaiveDate,
}

impl<S: SubjectRepository, R: ReviewRepository> ReviewService<S, R> {
    /// Uses the local calendar date for review dates.
    pub fn new(subjects: S, reviews: R) -> Self {
        Self::with_clock(subjects, reviews, local_today)
    }

    /// Uses `today` as the date source for every write.
    pub fn with_clock(subjects: S, reviews: R, today: fn() -> NaiveDate) -> Self {
        Self {
            subjects,
            reviews,
            today,
        }
    }

    /// Creates or overwrites `author_id`'s review of `shortcut`.
    ///
    /// # Errors
    /// - `SubjectNotFound` when the shortcut is unknown in the space.
    /// - `InvalidTier` / `EmptyText` on bad input.
    /// - `RaceAborted` when the subject was removed before the write.
    pub fn add_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        shortcut: &str,
        tier: u8,
        anonymous: bool,
        text: impl Into<String>,
    ) -> Result<Review, ReviewServiceError> {
        let subject = self
            .subjects
            .get_subject(space_id, shortcut)?
            .ok_or_else(|| ReviewServiceError::SubjectNotFound(shortcut.to_string()))?;

        let text = text.into();
        validate_review_input(tier, &text)?;

        let draft = ReviewDraft {
            subject_id: subject.id,
            author_id,
            tier,
            anonymous,
            text,
            date: (self.today)(),
        };
        let upserted = match self.reviews.upsert_review(&draft) {
            Ok(upserted) => upserted,
            Err(RepoError::RaceAborted(subject_id)) => {
                warn!(
                    "event=review_upsert module=review status=race_aborted space_id={} subject_id={}",
                    space_id, subject_id
                );
                return Err(ReviewServiceError::RaceAborted(subject_id));
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            "event=review_upsert module=review status=ok space_id={} subject_id={} review_id={} replaced={} votes_cleared={} anonymous={}",
            space_id,
            subject.id,
            upserted.review.id,
            upserted.replaced,
            upserted.votes_cleared,
            anonymous
        );
        Ok(upserted.review)
    }

    /// Removes the caller's own review of `shortcut`.
    pub fn remove_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        shortcut: &str,
    ) -> Result<bool, ReviewServiceError> {
        let removed = self.reviews.remove_review(space_id, author_id, shortcut)?;
        info!(
            "event=review_remove module=review status={} space_id={} override=false",
            removal_status(removed),
            space_id
        );
        Ok(removed)
    }

    /// Removes `target_id`'s review of `shortcut`. The caller is responsible
    /// for checking the privilege.
    pub fn remove_review_of(
        &self,
        space_id: SpaceId,
        target_id: UserId,
        shortcut: &str,
    ) -> Result<bool, ReviewServiceError> {
        let removed = self.reviews.remove_review(space_id, target_id, shortcut)?;
        info!(
            "event=review_remove module=review status={} space_id={} override=true target_id={}",
            removal_status(removed),
            space_id,
            target_id
        );
        Ok(removed)
    }

    pub fn find_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        shortcut: &str,
    ) -> Result<Option<Review>, ReviewServiceError> {
        Ok(self.reviews.find_review(space_id, author_id, shortcut)?)
    }

    pub fn get_review(&self, id: ReviewId) -> Result<Option<Review>, ReviewServiceError> {
        Ok(self.reviews.get_review(id)?)
    }

    pub fn list_reviews(&self, space_id: SpaceId) -> Result<Vec<Review>, ReviewServiceError> {
        Ok(self.reviews.list_reviews(space_id)?)
    }

    pub fn list_reviews_for_author(
        &self,
        author_id: UserId,
    ) -> Result<Vec<Review>, ReviewServiceError> {
        Ok(self.reviews.list_reviews_for_author(author_id)?)
    }

    /// Subject, its reviews newest first and their average tier.
    ///
    /// Returns `None` when the shortcut is unknown in the space.
    pub fn subject_overview(
        &self,
        space_id: SpaceId,
        shortcut: &str,
    ) -> Result<Option<SubjectOverview>, ReviewServiceError> {
        let Some(subject) = self.subjects.get_subject(space_id, shortcut)? else {
            return Ok(None);
        };
        let reviews = sorted_by_date_desc(self.reviews.list_reviews_for_subject(subject.id)?);
        let average_tier = average_tier(&reviews);
        Ok(Some(SubjectOverview {
            subject,
            reviews,
            average_tier,
        }))
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn removal_status(removed: bool) -> &'static str {
    if removed {
        "ok"
    } else {
        "not_found"
    }
}
