//! Error types for the arena simulation.
//!
//! Every recoverable failure is returned as an explicit [`Result`];
//! nothing inside the tick loop reports recoverable errors. A deploy
//! rejection carries the exact reason so the calling UI can surface it.

use thiserror::Error;

use crate::battle::MatchState;
use crate::entity::Side;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Top-level error type for all arena simulation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// The essence pool cannot cover the template's cost.
    #[error("Insufficient essence: need {required}, have {available}")]
    InsufficientResource {
        /// Essence required by the deploy.
        required: u32,
        /// Essence currently in the pool.
        available: u32,
    },

    /// The deploy position is outside the requesting side's half of the arena.
    #[error("Illegal placement for {side:?} at ({x}, {y})")]
    IllegalPlacement {
        /// Requested X coordinate.
        x: i64,
        /// Requested Y coordinate.
        y: i64,
        /// Side that requested the deploy.
        side: Side,
    },

    /// Deploys are only accepted while the match is running or in overtime.
    #[error("Match not active (state: {0:?})")]
    MatchNotActive(MatchState),

    /// A unit template failed validation at construction.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Invalid battle state for the requested operation.
    #[error("Invalid battle state: {0}")]
    InvalidState(String),
}
