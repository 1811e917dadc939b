mod beam;
mod driver;
mod eval;
mod limits;
mod movegen;
mod visited;

#[cfg(test)]
mod tests;

pub use driver::BeamSolver;
pub use eval::EvalWeights;
pub use limits::SearchLimits;

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, PairMetrics, PairSummary};
use crate::rotation::Rotation;

/// Tunable knobs for one solver instance. The per-iteration limits derived
/// from the base values grow with board size and widen across iterations;
/// see [`SearchLimits`].
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub beam_width: usize,
    pub beam_width_cap: usize,
    pub max_depth: usize,
    pub max_nodes: usize,
    pub max_children_per_node: usize,
    pub max_iterations: usize,
    pub rotation_sizes: Vec<usize>,
    pub time_limit_ms: f64,
    pub use_global_hash: bool,
    pub shake_max_length: usize,
    pub max_shakes: usize,
    pub shake_accept_equal_probability: f64,
    pub shake_time_ratio: f64,
    pub refinement_attempts: usize,
    pub refinement_sample: usize,
    pub refinement_time_budget_ms: f64,
    pub weights: EvalWeights,
    pub seed: Option<u64>,
    /// Reserved; the committed search path is sequential and never reads it.
    pub max_parallel_tasks: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            beam_width: 48,
            beam_width_cap: 512,
            max_depth: 40,
            max_nodes: 240_000,
            max_children_per_node: 56,
            max_iterations: 12,
            rotation_sizes: vec![2, 3, 4, 5],
            time_limit_ms: 290_000.0,
            use_global_hash: true,
            shake_max_length: 8,
            max_shakes: 4,
            shake_accept_equal_probability: 0.2,
            shake_time_ratio: 0.85,
            refinement_attempts: 64,
            refinement_sample: 96,
            refinement_time_budget_ms: 1_500.0,
            weights: EvalWeights::default(),
            seed: None,
            max_parallel_tasks: 0,
        }
    }
}

/// Outcome of one `solve` call. `operations` always replays from the initial
/// board to a board whose pair summary equals `summary`.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub operations: Vec<Rotation>,
    pub summary: PairSummary,
    pub solved: bool,
    pub explored_nodes: u64,
    pub elapsed_ms: f64,
}

/// Mutable per-solve state shared by the beam iterations, the shake walk and
/// the refinement pass: the wall clock, the explored-node counter, and the
/// solver-owned PRNG.
pub(crate) struct SearchContext {
    started: Instant,
    time_limit_ms: f64,
    pub(crate) explored_nodes: u64,
    pub(crate) reached_limit: bool,
    pub(crate) rng: StdRng,
}

impl SearchContext {
    pub(crate) fn new(config: &SolverConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            started: Instant::now(),
            time_limit_ms: config.time_limit_ms,
            explored_nodes: 0,
            reached_limit: false,
            rng,
        }
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1_000.0
    }

    /// Polls the wall clock. Once the budget is exhausted the flag sticks, so
    /// every caller up the stack unwinds to a best-effort result.
    pub(crate) fn out_of_time(&mut self) -> bool {
        if !self.reached_limit && self.elapsed_ms() >= self.time_limit_ms {
            self.reached_limit = true;
        }
        self.reached_limit
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) board: Board,
    pub(crate) path: Vec<Rotation>,
    pub(crate) metrics: PairMetrics,
    pub(crate) depth: usize,
    pub(crate) score: f64,
}

impl SearchNode {
    pub(crate) fn unmatched(&self) -> usize {
        self.metrics.summary.unmatched
    }

    pub(crate) fn is_goal(&self) -> bool {
        self.metrics.summary.unmatched == 0
            && self.metrics.summary.matched * 2 == self.board.cell_count()
    }

    /// Root relocation compares on unmatched pairs first, then the total
    /// remaining distance.
    pub(crate) fn improvement_key(&self) -> (usize, usize) {
        improvement_key(&self.metrics)
    }

    /// Shake acceptance and greedy refinement fold the max distance in as a
    /// tiebreaker on top of the total.
    pub(crate) fn distance_key(&self) -> (usize, usize) {
        distance_key(&self.metrics)
    }
}

pub(crate) fn improvement_key(metrics: &PairMetrics) -> (usize, usize) {
    (metrics.summary.unmatched, metrics.total_unmatched_distance)
}

pub(crate) fn distance_key(metrics: &PairMetrics) -> (usize, usize) {
    (
        metrics.summary.unmatched,
        metrics.total_unmatched_distance + metrics.max_unmatched_distance,
    )
}
