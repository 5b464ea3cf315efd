//! Interactive game session with undo and redo.
//!
//! Each accepted pour stores a snapshot of the previous state. Snapshots are
//! cheap because the puzzle model never mutates a state in place.

use crate::error::PuzzleError;
use crate::puzzle::{Move, PuzzleState};
use crate::solver::{solve_with_config, SolveResult, SolverConfig};

#[derive(Debug, Clone)]
pub struct Game {
    state: PuzzleState,
    undo_stack: Vec<PuzzleState>,
    redo_stack: Vec<PuzzleState>,
}

impl Game {
    pub fn new(state: PuzzleState) -> Self {
        Self {
            state,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn is_solved(&self) -> bool {
        self.state.is_goal()
    }

    /// Number of pours currently applied (undone pours excluded)
    pub fn moves_made(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pour `from` into `to`. Illegal pours are rejected and leave the game unchanged.
    pub fn pour(&mut self, from: usize, to: usize) -> Result<(), PuzzleError> {
        if !self.state.is_legal_move(from, to) {
            return Err(PuzzleError::InvalidMove { from, to });
        }
        let next = self.state.apply_move(from, to)?;
        let previous = std::mem::replace(&mut self.state, next);
        self.undo_stack.push(previous);
        self.redo_stack.clear();
        Ok(())
    }

    pub fn play(&mut self, mv: Move) -> Result<(), PuzzleError> {
        self.pour(mv.from, mv.to)
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.state, previous);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.state, next);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    /// Replace the board, e.g. with an edited or restored copy. The new state
    /// must have the same vials and layers; history is cleared.
    pub fn replace(&mut self, state: PuzzleState) -> Result<(), PuzzleError> {
        self.state.ensure_compatible(&state)?;
        self.state = state;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }

    /// Search from the current board
    pub fn hint(&self, config: &SolverConfig) -> SolveResult {
        solve_with_config(&self.state, config, None).result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Color::{Blue as B, Red as R};

    fn create_game() -> Game {
        Game::new(PuzzleState::new(vec![vec![R, R, R, B], vec![B, B, B], vec![R]]).unwrap())
    }

    #[test]
    fn test_pour_and_undo_redo() {
        let mut game = create_game();
        let start = game.state().clone();

        game.pour(0, 1).unwrap();
        let after_first = game.state().clone();
        assert_eq!(game.moves_made(), 1);

        assert!(game.undo());
        assert_eq!(game.state(), &start);
        assert!(!game.undo());

        assert!(game.redo());
        assert_eq!(game.state(), &after_first);
        assert!(!game.redo());

        game.play(Move::new(0, 2)).unwrap();
        assert!(game.is_solved());
        assert_eq!(game.moves_made(), 2);
    }

    #[test]
    fn test_new_pour_clears_redo() {
        let mut game = create_game();
        game.pour(0, 1).unwrap();
        game.undo();
        assert!(game.can_redo());
        game.pour(0, 1).unwrap();
        assert!(!game.can_redo());
    }

    #[test]
    fn test_illegal_pour_rejected() {
        let mut game = create_game();
        let before = game.state().clone();
        assert_eq!(game.pour(2, 0), Err(PuzzleError::InvalidMove { from: 2, to: 0 }));
        assert_eq!(game.pour(1, 1), Err(PuzzleError::InvalidMove { from: 1, to: 1 }));
        assert_eq!(game.state(), &before);
        assert!(!game.can_undo());
    }

    #[test]
    fn test_replace_checks_shape() {
        let mut game = create_game();
        let wrong_count = PuzzleState::new(vec![vec![R, R, R, R], vec![B, B, B, B]]).unwrap();
        assert_eq!(
            game.replace(wrong_count),
            Err(PuzzleError::VialCountMismatch { expected: 3, found: 2 })
        );

        let rearranged =
            PuzzleState::new(vec![vec![R, R, R, R], vec![B, B, B, B], vec![]]).unwrap();
        game.pour(0, 1).unwrap();
        game.replace(rearranged.clone()).unwrap();
        assert_eq!(game.state(), &rearranged);
        assert_eq!(game.moves_made(), 0);
    }

    #[test]
    fn test_hint_matches_solver() {
        let game = create_game();
        let hint = game.hint(&SolverConfig::default());
        assert_eq!(hint.first_move(), Some(Move::new(0, 1)));
    }
}
