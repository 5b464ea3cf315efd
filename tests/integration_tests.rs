// Integration tests for the public library API

use std::time::Duration;

use water_sort_solver::Color::{Blue as B, Red as R, Yellow as Y};
use water_sort_solver::{
    apply_move, canonical_key, is_goal, is_legal_move, solve, solve_with_config, AbortReason,
    CanonicalKey, Game, HintWorker, Move, PuzzleFile, PuzzleState, SolveResult, SolverConfig,
};

fn three_color_puzzle() -> PuzzleState {
    PuzzleState::new(vec![
        vec![R, B, Y, R],
        vec![Y, B, R, B],
        vec![B, Y, R, Y],
        vec![],
        vec![],
    ])
    .unwrap()
}

mod model {
    use super::*;

    #[test]
    fn pour_run_and_clipping() {
        let s = PuzzleState::new(vec![vec![R, R, B, B], vec![], vec![Y, Y, Y], vec![B, B, B]])
            .unwrap();
        let poured = apply_move(&s, 0, 1).unwrap();
        assert_eq!(poured.vial(0).unwrap().layers(), &[R, R]);
        assert_eq!(poured.vial(1).unwrap().layers(), &[B, B]);

        let clipped = apply_move(&s, 0, 3).unwrap();
        assert_eq!(clipped.vial(0).unwrap().layers(), &[R, R, B]);
        assert_eq!(clipped.vial(3).unwrap().layers(), &[B, B, B, B]);

        assert!(!is_legal_move(&s, 2, 0));
        assert!(apply_move(&s, 2, 0).is_err());
    }

    #[test]
    fn goal_requires_full_vials() {
        let full = PuzzleState::new(vec![vec![R, R, R, R], vec![]]).unwrap();
        let partial = PuzzleState::new(vec![vec![R, R, R], vec![R]]).unwrap();
        assert!(is_goal(&full));
        assert!(!is_goal(&partial));
    }

    #[test]
    fn key_round_trips_through_text() {
        let s = three_color_puzzle();
        let key = canonical_key(&s);
        let parsed: CanonicalKey = key.as_str().parse().unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.decode().unwrap(), s);
    }

    #[test]
    fn demo_puzzle_file_parses() {
        let json = include_str!("../demos/seven_vials.json");
        let file: PuzzleFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.vials.vial_count(), 7);
        assert_eq!(file.vials.layer_count(), 20);
    }
}

mod search {
    use super::*;

    #[test]
    fn solution_replays_to_goal() {
        let s = three_color_puzzle();
        let config = SolverConfig::default();
        let report = solve_with_config(&s, &config, None);
        if let SolveResult::Solved(solution) = &report.result {
            let mut game = Game::new(s.clone());
            for &mv in &solution.path {
                game.play(mv).unwrap();
            }
            assert!(game.is_solved());
            assert_eq!(game.moves_made(), solution.min_moves);
            assert_eq!(solution.first_move, solution.path.first().copied());
        }
        assert!(report.stats.nodes_expanded <= config.node_budget);
    }

    #[test]
    fn identical_runs_agree() {
        let s = three_color_puzzle();
        assert_eq!(solve(&s, 14, 200_000), solve(&s, 14, 200_000));
    }

    #[test]
    fn small_budget_aborts_instead_of_hanging() {
        let s = three_color_puzzle();
        assert_eq!(solve(&s, 14, 1), SolveResult::Aborted(AbortReason::NodeBudget));
    }

    #[test]
    fn zero_depth_is_exhausted() {
        let s = three_color_puzzle();
        let result = solve(&s, 0, 200_000);
        assert_eq!(result, SolveResult::Exhausted);
        assert!(result.solution().is_none());
    }

    #[test]
    fn hint_worker_tracks_latest_board() {
        let mut game = Game::new(
            PuzzleState::new(vec![vec![R, R, R, B], vec![B, B, B], vec![R]]).unwrap(),
        );
        let mut worker = HintWorker::new(SolverConfig::default());
        worker.request(game.state().clone());

        game.pour(0, 1).unwrap();
        let generation = worker.request(game.state().clone());

        let outcome = worker.wait_latest(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.generation, generation);
        assert_eq!(&outcome.state, game.state());
        assert_eq!(outcome.report.result.first_move(), Some(Move::new(0, 2)));
    }
}
