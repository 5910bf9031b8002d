//! Domain model for subjects, reviews and relevance votes.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and callers.
//! - Keep input validation next to the data it guards.
//!
//! # Invariants
//! - Space and user identifiers are opaque values owned by the host platform.
//! - Subjects and reviews are identified by stable UUIDs.

pub mod review;
pub mod subject;
pub mod validation;
pub mod vote;

/// Community space (tenant) identifier supplied by the host platform.
pub type SpaceId = i64;

/// Member identifier supplied by the host platform.
pub type UserId = i64;
