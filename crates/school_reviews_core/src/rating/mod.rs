//! Stateless derivations over loaded reviews.
//!
//! # Invariants
//! - Nothing in this module touches storage.

pub mod aggregate;
