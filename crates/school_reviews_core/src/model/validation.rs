use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before any write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Tier outside `TIER_MIN..=TIER_MAX`.
    InvalidTier(u8),
    /// Review text empty or whitespace-only.
    EmptyText,
    /// Subject shortcut empty or whitespace-only.
    EmptyShortcut,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTier(tier) => write!(f, "tier {tier} is outside the range 1..=5"),
            Self::EmptyText => write!(f, "review text cannot be empty"),
            Self::EmptyShortcut => write!(f, "subject shortcut cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
