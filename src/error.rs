//! Error types for the puzzle model.
//!
//! Search outcomes are not errors; see [`crate::solver::SolveResult`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// `apply_move` was called with a move that `is_legal_move` rejects
    #[error("invalid move: cannot pour vial {from} into vial {to}")]
    InvalidMove { from: usize, to: usize },

    #[error("vial {vial} holds {layers} layers, capacity is 4")]
    VialOverflow { vial: usize, layers: usize },

    #[error("malformed move {0:?}, expected FROM>TO")]
    MalformedMove(String),

    #[error("malformed canonical key {0:?}")]
    MalformedKey(String),

    #[error("unknown color token {0:?}")]
    UnknownColor(String),

    #[error("vial count mismatch: expected {expected}, found {found}")]
    VialCountMismatch { expected: usize, found: usize },

    /// The replacement state does not hold the same multiset of layers
    #[error("color mismatch: states do not hold the same layers")]
    ColorMismatch,
}
