//! Review ledger and vote aggregation for course reviews in community spaces.
//!
//! Members rate subjects on a 1–5 tier with free text, one review per
//! `(author, subject)`, and mark each other's reviews as helpful or not.
//! Command parsing, permissions and rendering live with the caller; this
//! crate owns storage, invariants, aggregation and page chunking.

pub mod db;
pub mod logging;
pub mod model;
pub mod paginate;
pub mod rating;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::review::{Review, ReviewDraft, ReviewId, TIER_MAX, TIER_MIN};
pub use model::subject::{Subject, SubjectId};
pub use model::validation::ValidationError;
pub use model::vote::{VoteState, VoteTally};
pub use model::{SpaceId, UserId};
pub use paginate::{chunk_list, chunk_text, chunk_text_on_words, DEFAULT_PAGE_LEN};
pub use rating::aggregate::{average_tier, sorted_by_date_desc};
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository, UpsertedReview};
pub use repo::subject_repo::{SqliteSubjectRepository, SubjectRepository};
pub use repo::vote_repo::{SqliteVoteLedger, VoteLedger};
pub use repo::{RepoError, RepoResult};
pub use service::review_service::{ReviewService, ReviewServiceError, SubjectOverview};
pub use service::subject_service::{SubjectInfo, SubjectService};
pub use service::votable::{ReviewVotes, Votable};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
