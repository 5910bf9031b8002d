//! Vote ledger: per-review map of voter to up/down, absence meaning neutral.
//!
//! # Invariants
//! - At most one entry per `(review, voter)`; writes are last-write-wins.
//! - Every state change is idempotent for the same voter and target state.
//! - `positive + negative` equals the number of non-neutral voters.

use crate::model::review::ReviewId;
use crate::model::vote::{VoteState, VoteTally};
use crate::model::UserId;
use crate::repo::{bool_to_int, parse_flag, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Relevance vote storage keyed by `(review, voter)`.
pub trait VoteLedger {
    /// Moves `voter` to `state` on the review. Fails with `ReviewNotFound`
    /// when the review does not exist.
    fn set_vote(&self, review_id: ReviewId, voter_id: UserId, state: VoteState)
        -> RepoResult<()>;
    fn vote_of(&self, review_id: ReviewId, voter_id: UserId) -> RepoResult<VoteState>;
    /// Counts for the review, or `None` when the review does not exist.
    fn tally(&self, review_id: ReviewId) -> RepoResult<Option<VoteTally>>;

    fn vote_up(&self, review_id: ReviewId, voter_id: UserId) -> RepoResult<()> {
        self.set_vote(review_id, voter_id, VoteState::Up)
    }

    fn vote_down(&self, review_id: ReviewId, voter_id: UserId) -> RepoResult<()> {
        self.set_vote(review_id, voter_id, VoteState::Down)
    }

    fn vote_neutral(&self, review_id: ReviewId, voter_id: UserId) -> RepoResult<()> {
        self.set_vote(review_id, voter_id, VoteState::Neutral)
    }

    fn positive_count(&self, review_id: ReviewId) -> RepoResult<u32> {
        Ok(self.tally(review_id)?.unwrap_or_default().positive)
    }

    fn negative_count(&self, review_id: ReviewId) -> RepoResult<u32> {
        Ok(self.tally(review_id)?.unwrap_or_default().negative)
    }
}

/// SQLite-backed vote ledger.
pub struct SqliteVoteLedger<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVoteLedger<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl VoteLedger for SqliteVoteLedger<'_> {
    fn set_vote(
        &self,
        review_id: ReviewId,
        voter_id: UserId,
        state: VoteState,
    ) -> RepoResult<()> {
        let review_uuid = review_id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !review_exists(&tx, &review_uuid)? {
            return Err(RepoError::ReviewNotFound(review_id));
        }

        match state.as_stored() {
            Some(vote) => {
                tx.execute(
                    "INSERT INTO review_votes (review_uuid, voter_id, vote)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT (review_uuid, voter_id) DO UPDATE SET vote = excluded.vote;",
                    params![review_uuid.as_str(), voter_id, bool_to_int(vote)],
                )?;
            }
            None => {
                tx.execute(
                    "DELETE FROM review_votes WHERE review_uuid = ?1 AND voter_id = ?2;",
                    params![review_uuid.as_str(), voter_id],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn vote_of(&self, review_id: ReviewId, voter_id: UserId) -> RepoResult<VoteState> {
        let stored: Option<i64> = self
            .conn
            .query_row(
                "SELECT vote FROM review_votes WHERE review_uuid = ?1 AND voter_id = ?2;",
                params![review_id.to_string(), voter_id],
                |row| row.get(0),
            )
            .optional()?;
        let vote = stored
            .map(|value| parse_flag(value, "review_votes.vote"))
            .transpose()?;
        Ok(VoteState::from_stored(vote))
    }

    fn tally(&self, review_id: ReviewId) -> RepoResult<Option<VoteTally>> {
        let review_uuid = review_id.to_string();
        // Single statement so the existence check and both counts see one snapshot.
        let (exists, positive, negative): (i64, u32, u32) = self.conn.query_row(
            "SELECT
                EXISTS(SELECT 1 FROM reviews WHERE uuid = ?1),
                COALESCE(SUM(CASE WHEN vote = 1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN vote = 0 THEN 1 ELSE 0 END), 0)
             FROM review_votes
             WHERE review_uuid = ?1;",
            [review_uuid.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        if exists == 0 {
            return Ok(None);
        }
        Ok(Some(VoteTally { positive, negative }))
    }
}

fn review_exists(conn: &Connection, review_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM reviews WHERE uuid = ?1);",
        [review_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
