//! Subject use-case service.
//!
//! # Responsibility
//! - Entry points for moderator subject management and subject lookups.
//! - Emit metadata-only events for subject writes.

use crate::model::subject::Subject;
use crate::model::{SpaceId, UserId};
use crate::repo::review_repo::ReviewRepository;
use crate::repo::subject_repo::SubjectRepository;
use crate::repo::RepoResult;
use log::info;

/// Subject together with how many reviews it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectInfo {
    pub subject: Subject,
    pub review_count: u32,
}

/// Use-case service over subject storage.
pub struct SubjectService<S: SubjectRepository, R: ReviewRepository> {
    subjects: S,
    reviews: R,
}

impl<S: SubjectRepository, R: ReviewRepository> SubjectService<S, R> {
    pub fn new(subjects: S, reviews: R) -> Self {
        Self { subjects, reviews }
    }

    pub fn get_subject(&self, space_id: SpaceId, shortcut: &str) -> RepoResult<Option<Subject>> {
        self.subjects.get_subject(space_id, shortcut)
    }

    /// Creates the subject or overwrites name/category of the existing one.
    pub fn upsert_subject(
        &self,
        space_id: SpaceId,
        shortcut: &str,
        name: &str,
        category: &str,
    ) -> RepoResult<Subject> {
        let subject = self
            .subjects
            .upsert_subject(space_id, shortcut, name, category)?;
        info!(
            "event=subject_upsert module=subject status=ok space_id={} subject_id={}",
            space_id, subject.id
        );
        Ok(subject)
    }

    /// Creates the subject; `DuplicateSubject` if the shortcut is taken.
    pub fn create_subject(
        &self,
        space_id: SpaceId,
        shortcut: &str,
        name: &str,
        category: &str,
    ) -> RepoResult<Subject> {
        let subject = self
            .subjects
            .insert_subject(space_id, shortcut, name, category)?;
        info!(
            "event=subject_create module=subject status=ok space_id={} subject_id={}",
            space_id, subject.id
        );
        Ok(subject)
    }

    /// Removes the subject with all of its reviews and votes.
    pub fn remove_subject(&self, space_id: SpaceId, shortcut: &str) -> RepoResult<bool> {
        let removed = self.subjects.remove_subject(space_id, shortcut)?;
        info!(
            "event=subject_remove module=subject status={} space_id={}",
            if removed { "ok" } else { "not_found" },
            space_id
        );
        Ok(removed)
    }

    pub fn list_subjects(&self, space_id: SpaceId) -> RepoResult<Vec<Subject>> {
        self.subjects.list_subjects(space_id)
    }

    pub fn list_reviewed(&self, space_id: SpaceId) -> RepoResult<Vec<Subject>> {
        self.subjects.list_reviewed(space_id)
    }

    pub fn list_reviewed_by_user(
        &self,
        space_id: SpaceId,
        author_id: UserId,
    ) -> RepoResult<Vec<Subject>> {
        self.subjects.list_reviewed_by_user(space_id, author_id)
    }

    pub fn subject_info(&self, space_id: SpaceId, shortcut: &str) -> RepoResult<Option<SubjectInfo>> {
        let Some(subject) = self.subjects.get_subject(space_id, shortcut)? else {
            return Ok(None);
        };
        let review_count = self.reviews.count_reviews_for_subject(subject.id)?;
        Ok(Some(SubjectInfo {
            subject,
            review_count,
        }))
    }
}
