//! Background hint searches for interactive callers.
//!
//! Every request is tagged with a generation number. Starting a new request
//! cancels the previous search, and any completion whose generation is not
//! the latest is dropped, so an old board's result never replaces a newer one.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use crate::puzzle::PuzzleState;
use crate::solver::{solve_with_config, CancelToken, SolverConfig, SolverReport};

/// A finished search and the board it was launched for
#[derive(Debug, Clone)]
pub struct HintOutcome {
    pub generation: u64,
    pub state: PuzzleState,
    pub report: SolverReport,
}

pub struct HintWorker {
    config: SolverConfig,
    generation: u64,
    current: Option<CancelToken>,
    tx: Sender<HintOutcome>,
    rx: Receiver<HintOutcome>,
    latest: Option<HintOutcome>,
}

impl HintWorker {
    pub fn new(config: SolverConfig) -> Self {
        let (tx, rx) = unbounded();
        Self {
            config,
            generation: 0,
            current: None,
            tx,
            rx,
            latest: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start searching `state` on a background thread, superseding any
    /// earlier request. Returns the new generation.
    pub fn request(&mut self, state: PuzzleState) -> u64 {
        self.cancel();
        self.generation += 1;
        self.latest = None;

        let generation = self.generation;
        let token = CancelToken::new();
        self.current = Some(token.clone());
        let tx = self.tx.clone();
        let config = self.config;

        thread::spawn(move || {
            let report = solve_with_config(&state, &config, Some(&token));
            // receiver gone means the worker was dropped
            let _ = tx.send(HintOutcome {
                generation,
                state,
                report,
            });
        });

        generation
    }

    /// Cancel the in-flight search, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// Latest result for the current generation, without blocking
    pub fn try_latest(&mut self) -> Option<&HintOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            self.accept(outcome);
        }
        self.latest.as_ref()
    }

    /// Block up to `timeout` for the current generation's result
    pub fn wait_latest(&mut self, timeout: Duration) -> Option<&HintOutcome> {
        let deadline = Instant::now() + timeout;
        while self.latest.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => self.accept(outcome),
                Err(_) => break,
            }
        }
        self.latest.as_ref()
    }

    fn accept(&mut self, outcome: HintOutcome) {
        if outcome.generation == self.generation {
            self.current = None;
            self.latest = Some(outcome);
        } else {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding stale hint"
            );
        }
    }
}

impl Drop for HintWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}
