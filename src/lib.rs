//! Water sort puzzle model and bounded solver.
//!
//! The puzzle model is a set of pure operations over [`PuzzleState`]; the
//! solver runs a breadth-first search over the move graph they induce and
//! returns a shortest pour sequence, or reports why it could not find one.

pub mod error;
pub mod hint;
pub mod key;
pub mod puzzle;
pub mod session;
pub mod solver;

// Re-export main types
pub use error::PuzzleError;
pub use hint::{HintOutcome, HintWorker};
pub use key::{canonical_key, CanonicalKey};
pub use puzzle::{
    apply_move, is_goal, is_legal_move, Color, Move, PuzzleFile, PuzzleState, Vial, VIAL_CAPACITY,
};
pub use session::Game;
pub use solver::{
    solve, solve_with_config, AbortReason, CancelToken, SearchStats, Solution, SolveResult,
    SolverConfig, SolverReport,
};
