use std::cmp::Ordering;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use super::beam::{self, IterationOutcome};
use super::{distance_key, eval, limits, movegen};
use super::{SearchContext, SearchNode, SearchReport, SolverConfig};
use crate::board::{Board, PairMetrics};
use crate::error::Result;
use crate::rotation::Rotation;

/// Iterative-deepening beam search. Each iteration sweeps from the current
/// root under widening limits; strict improvement relocates the root, a
/// plateau triggers a shake walk, and a final greedy pass squeezes out
/// last-mile improvements. Exhausted time is never an error: `solve` always
/// hands back the best operation sequence it found.
pub struct BeamSolver {
    config: SolverConfig,
}

impl BeamSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, board: &Board) -> Result<SearchReport> {
        let mut ctx = SearchContext::new(&self.config);
        let metrics = board.evaluate_pair_metrics();
        let score = eval::score(&self.config.weights, &metrics, 0, 0, &mut ctx.rng);
        let mut current_root = SearchNode {
            board: board.clone(),
            path: Vec::new(),
            metrics,
            depth: 0,
            score,
        };

        let mut report = SearchReport {
            operations: Vec::new(),
            summary: current_root.metrics.summary,
            solved: current_root.is_goal(),
            explored_nodes: 0,
            elapsed_ms: 0.0,
        };
        if report.solved {
            report.elapsed_ms = ctx.elapsed_ms();
            return Ok(report);
        }

        let base = limits::plan(&self.config, board.size());
        let mut report_key = current_root.improvement_key();
        let mut best_score = current_root.score;
        let mut shakes_used = 0_usize;
        let mut iteration = 0_usize;

        while iteration < self.config.max_iterations && !ctx.out_of_time() {
            let limits = limits::widen(base, iteration);
            info!(
                iteration,
                beam = limits.beam_width,
                depth = limits.max_depth,
                nodes = limits.max_nodes,
                unmatched = current_root.unmatched(),
                "beam iteration"
            );

            let outcome =
                beam::run_iteration(&current_root, limits, &self.config, &mut ctx)?;
            report.explored_nodes = ctx.explored_nodes;

            match outcome {
                IterationOutcome::Solved(node) => {
                    info!(
                        ops = node.path.len(),
                        explored = ctx.explored_nodes,
                        "search reached a solved board"
                    );
                    report.operations = node.path;
                    report.summary = node.metrics.summary;
                    report.solved = true;
                    report.elapsed_ms = ctx.elapsed_ms();
                    return Ok(report);
                }
                IterationOutcome::Partial {
                    best_unsolved: None,
                    ..
                } => break,
                IterationOutcome::Partial {
                    best_unsolved: Some(best),
                    best_score: sweep_best,
                } => {
                    if sweep_best > best_score {
                        best_score = sweep_best;
                    }
                    if best.improvement_key() < current_root.improvement_key() {
                        if best.improvement_key() < report_key {
                            report_key = best.improvement_key();
                            report.operations = best.path.clone();
                            report.summary = best.metrics.summary;
                        }
                        debug!(
                            unmatched = best.unmatched(),
                            ops = best.path.len(),
                            "relocating root to best partial"
                        );
                        current_root = reroot(best, &self.config, &mut ctx);
                        shakes_used = 0;
                        iteration += 1;
                        continue;
                    }

                    let in_shake_window =
                        ctx.elapsed_ms() < self.config.shake_time_ratio * self.config.time_limit_ms;
                    if shakes_used < self.config.max_shakes && in_shake_window {
                        shakes_used += 1;
                        if let Some(shaken) = self.shake(&current_root, &mut ctx)? {
                            if shaken.is_goal() {
                                report.operations = shaken.path;
                                report.summary = shaken.metrics.summary;
                                report.solved = true;
                                report.explored_nodes = ctx.explored_nodes;
                                report.elapsed_ms = ctx.elapsed_ms();
                                return Ok(report);
                            }
                            if shaken.improvement_key() < report_key {
                                report_key = shaken.improvement_key();
                                report.operations = shaken.path.clone();
                                report.summary = shaken.metrics.summary;
                            }
                            current_root = shaken;
                            // Accepted perturbation retries the same iteration.
                            continue;
                        }
                    }

                    if iteration + 1 < self.config.max_iterations {
                        iteration += 1;
                    } else {
                        break;
                    }
                }
            }
        }

        debug!(
            best_score,
            reached_limit = ctx.reached_limit,
            "main search loop finished"
        );

        self.refine(board, &mut report, &mut ctx)?;
        report.explored_nodes = ctx.explored_nodes;
        report.elapsed_ms = ctx.elapsed_ms();
        Ok(report)
    }

    /// Random walk away from a plateau: up to `shake_max_length` ops drawn
    /// from the head of the ordered candidate list. Committed on strict
    /// improvement, probabilistically on equality, immediately on a solved
    /// intermediate state.
    fn shake(&self, root: &SearchNode, ctx: &mut SearchContext) -> Result<Option<SearchNode>> {
        let steps = ctx.rng.gen_range(1..=self.config.shake_max_length.max(1));
        let mut node = root.clone();
        for _ in 0..steps {
            if ctx.out_of_time() {
                break;
            }
            let candidates = movegen::candidate_rotations(
                &node.board,
                &node.metrics,
                node.path.last().copied(),
                &self.config.rotation_sizes,
            );
            if candidates.is_empty() {
                break;
            }
            let pool = candidates.len().min(64);
            let rotation = candidates[ctx.rng.gen_range(0..pool)];
            node.board = node.board.applied(rotation)?;
            node.metrics = node.board.evaluate_pair_metrics();
            node.path.push(rotation);
            node.score = eval::score(
                &self.config.weights,
                &node.metrics,
                node.depth,
                node.path.len(),
                &mut ctx.rng,
            );
            ctx.explored_nodes += 1;

            if node.is_goal() {
                debug!(
                    steps = node.path.len() - root.path.len(),
                    "shake walked into a solved board"
                );
                return Ok(Some(node));
            }
        }

        if node.path.len() == root.path.len() {
            return Ok(None);
        }
        let accepted = match node.distance_key().cmp(&root.distance_key()) {
            Ordering::Less => true,
            Ordering::Equal => ctx
                .rng
                .gen_bool(self.config.shake_accept_equal_probability.clamp(0.0, 1.0)),
            Ordering::Greater => false,
        };
        debug!(
            accepted,
            steps = node.path.len() - root.path.len(),
            unmatched = node.unmatched(),
            "shake walk finished"
        );
        Ok(if accepted { Some(node) } else { None })
    }

    /// Greedy descent from the best result: repeatedly commits the single
    /// rotation that most reduces the remaining mismatch, within its own
    /// wall-clock budget.
    fn refine(
        &self,
        initial: &Board,
        report: &mut SearchReport,
        ctx: &mut SearchContext,
    ) -> Result<()> {
        if report.solved || ctx.out_of_time() {
            return Ok(());
        }

        let mut board = initial.clone();
        for &rotation in &report.operations {
            board.apply(rotation)?;
        }
        let mut metrics = board.evaluate_pair_metrics();
        let mut current_key = distance_key(&metrics);
        let pass_started = Instant::now();

        for _ in 0..self.config.refinement_attempts {
            if ctx.out_of_time() {
                break;
            }
            if pass_started.elapsed().as_secs_f64() * 1_000.0
                >= self.config.refinement_time_budget_ms
            {
                break;
            }

            let candidates = movegen::candidate_rotations(
                &board,
                &metrics,
                report.operations.last().copied(),
                &self.config.rotation_sizes,
            );
            let mut best: Option<((usize, usize), Rotation, Board, PairMetrics)> = None;
            for &rotation in candidates.iter().take(self.config.refinement_sample) {
                if ctx.out_of_time() {
                    break;
                }
                let next = board.applied(rotation)?;
                let next_metrics = next.evaluate_pair_metrics();
                ctx.explored_nodes += 1;
                let key = distance_key(&next_metrics);
                if key >= current_key {
                    continue;
                }
                match &best {
                    Some((best_key, ..)) if *best_key <= key => {}
                    _ => best = Some((key, rotation, next, next_metrics)),
                }
            }

            let Some((key, rotation, next, next_metrics)) = best else {
                break;
            };
            board = next;
            metrics = next_metrics;
            current_key = key;
            report.operations.push(rotation);
            report.summary = metrics.summary;
            debug!(
                unmatched = report.summary.unmatched,
                ops = report.operations.len(),
                "refinement committed a rotation"
            );
            if board.is_goal() {
                report.solved = true;
                info!(
                    ops = report.operations.len(),
                    "refinement reached a solved board"
                );
                break;
            }
        }
        Ok(())
    }
}

fn reroot(mut node: SearchNode, config: &SolverConfig, ctx: &mut SearchContext) -> SearchNode {
    node.depth = 0;
    node.score = eval::score(
        &config.weights,
        &node.metrics,
        0,
        node.path.len(),
        &mut ctx.rng,
    );
    node
}
