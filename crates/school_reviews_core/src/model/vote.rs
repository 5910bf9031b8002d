//! Relevance votes on reviews.

use serde::{Deserialize, Serialize};

/// One voter's opinion on one review. `Neutral` is the absence of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    Up,
    Down,
    Neutral,
}

impl VoteState {
    /// Stored `vote` column value; `None` means no row.
    pub fn as_stored(self) -> Option<bool> {
        match self {
            Self::Up => Some(true),
            Self::Down => Some(false),
            Self::Neutral => None,
        }
    }

    pub fn from_stored(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Up,
            Some(false) => Self::Down,
            None => Self::Neutral,
        }
    }
}

/// Up/down counts for one review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub positive: u32,
    pub negative: u32,
}

impl VoteTally {
    /// Number of distinct voters that are not neutral.
    pub fn total(&self) -> u32 {
        self.positive + self.negative
    }
}

#[cfg(test)]
mod tests {
    use super::{VoteState, VoteTally};

    #[test]
    fn stored_value_maps_both_ways() {
        for state in [VoteState::Up, VoteState::Down, VoteState::Neutral] {
            assert_eq!(VoteState::from_stored(state.as_stored()), state);
        }
    }

    #[test]
    fn total_counts_non_neutral_voters() {
        let tally = VoteTally {
            positive: 2,
            negative: 3,
        };
        assert_eq!(tally.total(), 5);
        assert_eq!(VoteTally::default().total(), 0);
    }
}
