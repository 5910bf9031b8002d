//! Review store: one review per `(author, subject)`, owner of its votes.
//!
//! # Invariants
//! - `upsert_review` checks the subject and any existing row under the same
//!   `IMMEDIATE` transaction as the write, so concurrent writers cannot both
//!   insert for one key. `UNIQUE (subject_uuid, author_id)` backs this up.
//! - Overwriting a review deletes every vote entry on it.
//! - Removing a review deletes its votes first, in the same transaction.

use crate::model::review::{Review, ReviewDraft, ReviewId};
use crate::model::subject::{shortcut_key, SubjectId};
use crate::model::{SpaceId, UserId};
use crate::repo::{bool_to_int, parse_flag, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const REVIEW_SELECT_SQL: &str = "SELECT
    r.uuid AS uuid,
    r.author_id AS author_id,
    r.subject_uuid AS subject_uuid,
    r.anonymous AS anonymous,
    r.tier AS tier,
    r.text AS text,
    r.review_date AS review_date
FROM reviews r";

/// Outcome of an upsert: the stored row and whether it replaced an older one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertedReview {
    pub review: Review,
    /// `true` when an existing row was overwritten in place.
    pub replaced: bool,
    /// Vote entries deleted by the overwrite.
    pub votes_cleared: usize,
}

/// Repository interface for review records.
pub trait ReviewRepository {
    /// Creates the review for `(draft.author_id, draft.subject_id)` or
    /// overwrites it in place, clearing its votes.
    ///
    /// Fails with `RaceAborted` when the subject no longer exists.
    fn upsert_review(&self, draft: &ReviewDraft) -> RepoResult<UpsertedReview>;
    fn find_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        shortcut: &str,
    ) -> RepoResult<Option<Review>>;
    /// Deletes the author's review on the subject and its votes. Returns
    /// whether a row was removed.
    fn remove_review(&self, space_id: SpaceId, author_id: UserId, shortcut: &str)
        -> RepoResult<bool>;
    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    /// All reviews on subjects of one space.
    fn list_reviews(&self, space_id: SpaceId) -> RepoResult<Vec<Review>>;
    /// All reviews written by one author, across spaces.
    fn list_reviews_for_author(&self, author_id: UserId) -> RepoResult<Vec<Review>>;
    fn list_reviews_for_subject(&self, subject_id: SubjectId) -> RepoResult<Vec<Review>>;
    fn count_reviews_for_subject(&self, subject_id: SubjectId) -> RepoResult<u32>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn upsert_review(&self, draft: &ReviewDraft) -> RepoResult<UpsertedReview> {
        draft.validate()?;

        let subject_uuid = draft.subject_id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !subject_exists(&tx, &subject_uuid)? {
            return Err(RepoError::RaceAborted(draft.subject_id));
        }

        let existing: Option<String> = tx
            .query_row(
                "SELECT uuid FROM reviews WHERE subject_uuid = ?1 AND author_id = ?2;",
                params![subject_uuid.as_str(), draft.author_id],
                |row| row.get(0),
            )
            .optional()?;

        let (review_uuid, replaced, votes_cleared) = match existing {
            Some(review_uuid) => {
                tx.execute(
                    "UPDATE reviews
                     SET anonymous = ?2,
                         tier = ?3,
                         text = ?4,
                         review_date = ?5
                     WHERE uuid = ?1;",
                    params![
                        review_uuid.as_str(),
                        bool_to_int(draft.anonymous),
                        draft.tier,
                        draft.text.as_str(),
                        draft.date,
                    ],
                )?;
                let cleared = tx.execute(
                    "DELETE FROM review_votes WHERE review_uuid = ?1;",
                    [review_uuid.as_str()],
                )?;
                (review_uuid, true, cleared)
            }
            None => {
                let review_uuid = Uuid::new_v4().to_string();
                tx.execute(
                    "INSERT INTO reviews (
                        uuid,
                        subject_uuid,
                        author_id,
                        anonymous,
                        tier,
                        text,
                        review_date
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                    params![
                        review_uuid.as_str(),
                        subject_uuid.as_str(),
                        draft.author_id,
                        bool_to_int(draft.anonymous),
                        draft.tier,
                        draft.text.as_str(),
                        draft.date,
                    ],
                )?;
                (review_uuid, false, 0)
            }
        };

        let review = load_review(&tx, &review_uuid)?.ok_or_else(|| {
            RepoError::InvalidData(format!("review {review_uuid} missing right after write"))
        })?;
        tx.commit()?;

        Ok(UpsertedReview {
            review,
            replaced,
            votes_cleared,
        })
    }

    fn find_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        shortcut: &str,
    ) -> RepoResult<Option<Review>> {
        let Ok(key) = shortcut_key(shortcut) else {
            return Ok(None);
        };
        let mut reviews = query_reviews(
            self.conn,
            &format!(
                "{REVIEW_SELECT_SQL}
                 INNER JOIN subjects s ON s.uuid = r.subject_uuid
                 WHERE s.space_id = ?1
                   AND s.shortcut_key = ?2
                   AND r.author_id = ?3;"
            ),
            params![space_id, key, author_id],
        )?;
        Ok(reviews.pop())
    }

    fn remove_review(
        &self,
        space_id: SpaceId,
        author_id: UserId,
        shortcut: &str,
    ) -> RepoResult<bool> {
        let Ok(key) = shortcut_key(shortcut) else {
            return Ok(false);
        };
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let review_uuid: Option<String> = tx
            .query_row(
                "SELECT r.uuid
                 FROM reviews r
                 INNER JOIN subjects s ON s.uuid = r.subject_uuid
                 WHERE s.space_id = ?1
                   AND s.shortcut_key = ?2
                   AND r.author_id = ?3;",
                params![space_id, key, author_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(review_uuid) = review_uuid else {
            return Ok(false);
        };

        tx.execute(
            "DELETE FROM review_votes WHERE review_uuid = ?1;",
            [review_uuid.as_str()],
        )?;
        tx.execute(
            "DELETE FROM reviews WHERE uuid = ?1;",
            [review_uuid.as_str()],
        )?;
        tx.commit()?;
        Ok(true)
    }

    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        load_review(self.conn, &id.to_string())
    }

    fn list_reviews(&self, space_id: SpaceId) -> RepoResult<Vec<Review>> {
        query_reviews(
            self.conn,
            &format!(
                "{REVIEW_SELECT_SQL}
                 INNER JOIN subjects s ON s.uuid = r.subject_uuid
                 WHERE s.space_id = ?1
                 ORDER BY r.rowid ASC;"
            ),
            params![space_id],
        )
    }

    fn list_reviews_for_author(&self, author_id: UserId) -> RepoResult<Vec<Review>> {
        query_reviews(
            self.conn,
            &format!("{REVIEW_SELECT_SQL} WHERE r.author_id = ?1 ORDER BY r.rowid ASC;"),
            params![author_id],
        )
    }

    fn list_reviews_for_subject(&self, subject_id: SubjectId) -> RepoResult<Vec<Review>> {
        query_reviews(
            self.conn,
            &format!("{REVIEW_SELECT_SQL} WHERE r.subject_uuid = ?1 ORDER BY r.rowid ASC;"),
            params![subject_id.to_string()],
        )
    }

    fn count_reviews_for_subject(&self, subject_id: SubjectId) -> RepoResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE subject_uuid = ?1;",
            [subject_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn subject_exists(conn: &Connection, subject_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM subjects WHERE uuid = ?1);",
        [subject_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_review(conn: &Connection, review_uuid: &str) -> RepoResult<Option<Review>> {
    let mut reviews = query_reviews(
        conn,
        &format!("{REVIEW_SELECT_SQL} WHERE r.uuid = ?1;"),
        [review_uuid],
    )?;
    Ok(reviews.pop())
}

fn query_reviews(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Vec<Review>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut reviews = Vec::new();
    while let Some(row) = rows.next()? {
        reviews.push(parse_review_row(row)?);
    }
    Ok(reviews)
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<Review> {
    let uuid_text: String = row.get("uuid")?;
    let subject_text: String = row.get("subject_uuid")?;

    let tier_value: i64 = row.get("tier")?;
    let tier = u8::try_from(tier_value).map_err(|_| {
        RepoError::InvalidData(format!("invalid tier value `{tier_value}` in reviews.tier"))
    })?;

    let date: NaiveDate = row.get("review_date")?;

    let review = Review {
        id: parse_uuid(&uuid_text, "reviews.uuid")?,
        author_id: row.get("author_id")?,
        subject_id: parse_uuid(&subject_text, "reviews.subject_uuid")?,
        anonymous: parse_flag(row.get("anonymous")?, "reviews.anonymous")?,
        tier,
        text: row.get("text")?,
        date,
    };
    review
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("review {uuid_text}: {err}")))?;
    Ok(review)
}
