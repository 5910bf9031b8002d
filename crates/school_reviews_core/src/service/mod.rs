//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations callers invoke.
//! - Keep command/rendering layers decoupled from storage details.

pub mod review_service;
pub mod subject_service;
pub mod votable;
