//! Orchestration error types.
//!
//! Collaborator failures are data ([`crate::step::StepResult`]), never
//! errors. The variants here cover only the conditions that stop a plan
//! before its steps can run.

use common::PlayerId;
use thiserror::Error;

/// Errors that abort a reset orchestration.
#[derive(Debug, Error)]
pub enum ResetError {
    /// The player service reported no record for this ID.
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    /// The player lookup itself failed (transport error, unexpected status,
    /// malformed payload). Distinct from "not found".
    #[error("Player lookup failed: {0}")]
    PlayerLookup(String),
}

/// Convenience type alias for orchestration results.
pub type Result<T> = std::result::Result<T, ResetError>;
