//! Bounded breadth-first solver.
//!
//! The search finds a shortest pour sequence that sorts the puzzle. It is
//! bounded by a maximum depth and by a budget of expanded nodes, and can be
//! cancelled cooperatively through a [`CancelToken`].
//!
//! Moves are generated source-ascending then destination-ascending, so among
//! several shortest solutions the one with the lexicographically smallest
//! move at the first differing step is returned.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, trace};

use crate::key::{canonical_key, CanonicalKey};
use crate::puzzle::{Move, PuzzleState};

/// Configuration for the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Nodes at this depth are not expanded
    pub max_depth: usize,
    /// Maximum number of expanded nodes
    pub node_budget: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 14,
            node_budget: 200_000,
        }
    }
}

/// Shared flag a caller sets to stop an in-flight search
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A shortest solving sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub min_moves: usize,
    /// `None` when the puzzle is already solved
    pub first_move: Option<Move>,
    pub path: Vec<Move>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    NodeBudget,
    Cancelled,
}

/// Outcome of a search. Only `Solved` carries a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Solved(Solution),
    /// Every state within the depth bound was explored without reaching a goal
    Exhausted,
    /// Stopped before completing; a solution may still exist
    Aborted(AbortReason),
}

impl SolveResult {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveResult::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveResult::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn first_move(&self) -> Option<Move> {
        self.solution().and_then(|s| s.first_move)
    }

    pub fn status(&self) -> &'static str {
        match self {
            SolveResult::Solved(_) => "solved",
            SolveResult::Exhausted => "exhausted",
            SolveResult::Aborted(_) => "aborted",
        }
    }

    /// Human-readable description of the outcome
    pub fn reason(&self) -> String {
        match self {
            SolveResult::Solved(s) if s.min_moves == 0 => "Already solved".to_string(),
            SolveResult::Solved(s) => format!("Solved in {} moves", s.min_moves),
            SolveResult::Exhausted => "No solution found within depth limit".to_string(),
            SolveResult::Aborted(AbortReason::NodeBudget) => {
                "Search aborted (node limit)".to_string()
            }
            SolveResult::Aborted(AbortReason::Cancelled) => "Search cancelled".to_string(),
        }
    }
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub states_discovered: usize,
    pub max_depth_reached: usize,
    pub time_elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct SolverReport {
    pub result: SolveResult,
    pub stats: SearchStats,
}

/// Visited-table entry. Immutable once inserted.
#[derive(Debug)]
struct SearchNode {
    depth: usize,
    /// Parent key and the move that produced this state; `None` for the root
    parent: Option<(CanonicalKey, Move)>,
}

/// Find a shortest solution within `max_depth` moves and `node_budget` expansions.
pub fn solve(initial: &PuzzleState, max_depth: usize, node_budget: usize) -> SolveResult {
    let config = SolverConfig {
        max_depth,
        node_budget,
    };
    solve_with_config(initial, &config, None).result
}

/// Run the search, returning the outcome together with search counters.
///
/// When `cancel` is set the search stops at the next expansion with
/// [`AbortReason::Cancelled`].
pub fn solve_with_config(
    initial: &PuzzleState,
    config: &SolverConfig,
    cancel: Option<&CancelToken>,
) -> SolverReport {
    let start_time = Instant::now();
    let mut stats = SearchStats::default();

    debug!(
        vials = initial.vial_count(),
        max_depth = config.max_depth,
        node_budget = config.node_budget,
        "starting search"
    );

    let result = search(initial, config, cancel, &mut stats);
    stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;

    debug!(
        outcome = result.status(),
        nodes_expanded = stats.nodes_expanded,
        states_discovered = stats.states_discovered,
        time_elapsed_ms = stats.time_elapsed_ms,
        "search finished"
    );

    SolverReport { result, stats }
}

fn search(
    initial: &PuzzleState,
    config: &SolverConfig,
    cancel: Option<&CancelToken>,
    stats: &mut SearchStats,
) -> SolveResult {
    if initial.is_goal() {
        return SolveResult::Solved(Solution {
            min_moves: 0,
            first_move: None,
            path: Vec::new(),
        });
    }

    let root_key = canonical_key(initial);
    let mut nodes: HashMap<CanonicalKey, SearchNode> = HashMap::new();
    nodes.insert(
        root_key.clone(),
        SearchNode {
            depth: 0,
            parent: None,
        },
    );
    stats.states_discovered = 1;

    let mut queue: VecDeque<(PuzzleState, CanonicalKey, usize)> = VecDeque::new();
    queue.push_back((initial.clone(), root_key, 0));
    let mut layer = 0;

    while let Some((state, key, depth)) = queue.pop_front() {
        stats.nodes_expanded += 1;
        if stats.nodes_expanded > config.node_budget {
            return SolveResult::Aborted(AbortReason::NodeBudget);
        }
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return SolveResult::Aborted(AbortReason::Cancelled);
        }

        if depth > layer {
            layer = depth;
            trace!(
                depth,
                frontier = queue.len() + 1,
                nodes_expanded = stats.nodes_expanded,
                "entering layer"
            );
        }
        if depth >= config.max_depth {
            continue;
        }

        for mv in state.legal_moves() {
            let Ok(next) = state.apply_move(mv.from, mv.to) else {
                continue;
            };
            let next_key = canonical_key(&next);
            if nodes.contains_key(&next_key) {
                continue;
            }

            nodes.insert(
                next_key.clone(),
                SearchNode {
                    depth: depth + 1,
                    parent: Some((key.clone(), mv)),
                },
            );
            stats.states_discovered += 1;
            stats.max_depth_reached = stats.max_depth_reached.max(depth + 1);

            if next.is_goal() {
                let path = reconstruct_path(&nodes, &next_key);
                return SolveResult::Solved(Solution {
                    min_moves: depth + 1,
                    first_move: path.first().copied(),
                    path,
                });
            }
            queue.push_back((next, next_key, depth + 1));
        }
    }

    SolveResult::Exhausted
}

/// Walk parent links from `goal` back to the root, then reverse.
fn reconstruct_path(nodes: &HashMap<CanonicalKey, SearchNode>, goal: &CanonicalKey) -> Vec<Move> {
    let mut moves = Vec::with_capacity(nodes.get(goal).map_or(0, |n| n.depth));
    let mut cursor = goal;
    while let Some((parent, mv)) = nodes.get(cursor).and_then(|n| n.parent.as_ref()) {
        moves.push(*mv);
        cursor = parent;
    }
    moves.reverse();
    moves
}
