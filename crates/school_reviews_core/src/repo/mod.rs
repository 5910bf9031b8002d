//! Repository layer: SQL-backed stores for subjects, reviews and votes.
//!
//! # Responsibility
//! - Keep SQL details inside the persistence boundary.
//! - Own every multi-row write as one `IMMEDIATE` transaction.
//!
//! # Invariants
//! - Write paths validate input before the first SQL mutation.
//! - Cascades are explicit ordered deletes: votes, then reviews, then the
//!   subject. The declared foreign keys reject any other order.
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::review::ReviewId;
use crate::model::subject::SubjectId;
use crate::model::validation::ValidationError;
use crate::model::SpaceId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod review_repo;
pub mod subject_repo;
pub mod vote_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by the subject, review and vote repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Strict insert hit an existing shortcut in the same space.
    DuplicateSubject { space_id: SpaceId, shortcut: String },
    ReviewNotFound(ReviewId),
    /// The subject was deleted between lookup and write; nothing was written.
    RaceAborted(SubjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateSubject { space_id, shortcut } => {
                write!(f, "subject `{shortcut}` already exists in space {space_id}")
            }
            Self::ReviewNotFound(id) => write!(f, "review not found: {id}"),
            Self::RaceAborted(id) => {
                write!(f, "subject {id} was removed before the review was written")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted review data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateSubject { .. } => None,
            Self::ReviewNotFound(_) => None,
            Self::RaceAborted(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
