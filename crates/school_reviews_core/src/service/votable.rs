//! Voting capability for anything rendered with up/down/neutral reactions.
//!
//! # Invariants
//! - A target that vanished in the meantime yields `Ok(None)`, never an error.
//! - Every successful call returns the tally as it is after the change.

use crate::model::review::ReviewId;
use crate::model::vote::{VoteState, VoteTally};
use crate::model::UserId;
use crate::repo::vote_repo::VoteLedger;
use crate::repo::{RepoError, RepoResult};
use log::debug;

/// Narrow interface a page needs to react to vote buttons.
pub trait Votable {
    fn vote_up(&self, voter_id: UserId) -> RepoResult<Option<VoteTally>>;
    fn vote_down(&self, voter_id: UserId) -> RepoResult<Option<VoteTally>>;
    fn vote_neutral(&self, voter_id: UserId) -> RepoResult<Option<VoteTally>>;
    /// Current counts, `None` when the target is gone.
    fn tally(&self) -> RepoResult<Option<VoteTally>>;
}

/// Projection of one review onto a vote ledger.
pub struct ReviewVotes<'a, L: VoteLedger> {
    review_id: ReviewId,
    ledger: &'a L,
}

impl<'a, L: VoteLedger> ReviewVotes<'a, L> {
    pub fn new(review_id: ReviewId, ledger: &'a L) -> Self {
        Self { review_id, ledger }
    }

    pub fn review_id(&self) -> ReviewId {
        self.review_id
    }

    fn apply(&self, voter_id: UserId, state: VoteState) -> RepoResult<Option<VoteTally>> {
        match self.ledger.set_vote(self.review_id, voter_id, state) {
            Ok(()) => {}
            Err(RepoError::ReviewNotFound(_)) => {
                debug!(
                    "event=vote_set module=vote status=target_gone review_id={}",
                    self.review_id
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        }
        debug!(
            "event=vote_set module=vote status=ok review_id={} state={:?}",
            self.review_id, state
        );
        self.ledger.tally(self.review_id)
    }
}

impl<L: VoteLedger> Votable for ReviewVotes<'_, L> {
    fn vote_up(&self, voter_id: UserId) -> RepoResult<Option<VoteTally>> {
        self.apply(voter_id, VoteState::Up)
    }

    fn vote_down(&self, voter_id: UserId) -> RepoResult<Option<VoteTally>> {
        self.apply(voter_id, VoteState::Down)
    }

    fn vote_neutral(&self, voter_id: UserId) -> RepoResult<Option<VoteTally>> {
        self.apply(voter_id, VoteState::Neutral)
    }

    fn tally(&self) -> RepoResult<Option<VoteTally>> {
        self.ledger.tally(self.review_id)
    }
}
