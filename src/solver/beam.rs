use tracing::debug;

use super::limits::SearchLimits;
use super::visited::VisitedSet;
use super::{eval, movegen, SearchContext, SearchNode, SolverConfig};
use crate::error::Result;

/// What one beam sweep produced. A solved node ends the whole search; a
/// partial sweep hands the driver its best unsolved node (if any child was
/// viable at all) so the root can be relocated.
pub(crate) enum IterationOutcome {
    Solved(SearchNode),
    Partial {
        best_unsolved: Option<SearchNode>,
        best_score: f64,
    },
}

/// Expands layers from `root` until the depth, node or time cap is hit.
/// Every layer is collapsed to the top `beam_width` children by score;
/// per-parent fan-out is capped adaptively so parents with many unmatched
/// pairs keep more children. Dedup spans the whole sweep (not a single
/// layer), so a state reached twice along different paths is only expanded
/// once; the set is rebuilt per sweep so widened retries can re-explore.
pub(crate) fn run_iteration(
    root: &SearchNode,
    limits: SearchLimits,
    config: &SolverConfig,
    ctx: &mut SearchContext,
) -> Result<IterationOutcome> {
    let mut visited = VisitedSet::new(4 * limits.max_nodes);
    let mut current_layer = vec![root.clone()];
    let mut best_unsolved: Option<SearchNode> = None;
    let mut best_score = root.score;
    let mut iteration_nodes = 0_usize;

    for _ in 0..limits.max_depth {
        if ctx.out_of_time() || iteration_nodes >= limits.max_nodes {
            break;
        }

        let mut next_layer: Vec<SearchNode> = Vec::new();
        for parent in &current_layer {
            if ctx.out_of_time() || iteration_nodes >= limits.max_nodes {
                break;
            }

            let candidates = movegen::candidate_rotations(
                &parent.board,
                &parent.metrics,
                parent.path.last().copied(),
                &config.rotation_sizes,
            );
            let mut children: Vec<SearchNode> = Vec::new();
            for rotation in candidates {
                if ctx.out_of_time() || iteration_nodes >= limits.max_nodes {
                    break;
                }

                let board = parent.board.applied(rotation)?;
                if config.use_global_hash && !visited.insert(board.hash()) {
                    continue;
                }
                let metrics = board.evaluate_pair_metrics();
                let mut path = parent.path.clone();
                path.push(rotation);
                let depth = parent.depth + 1;
                let score = eval::score(&config.weights, &metrics, depth, path.len(), &mut ctx.rng);
                let child = SearchNode {
                    board,
                    path,
                    metrics,
                    depth,
                    score,
                };

                iteration_nodes += 1;
                ctx.explored_nodes += 1;

                if child.is_goal() {
                    return Ok(IterationOutcome::Solved(child));
                }
                if child.score > best_score {
                    best_score = child.score;
                }
                match &best_unsolved {
                    Some(best) if best.improvement_key() <= child.improvement_key() => {}
                    _ => best_unsolved = Some(child.clone()),
                }
                children.push(child);
            }

            let cap = child_cap(&limits, parent.unmatched(), children.len());
            if children.len() > cap {
                children.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));
                children.truncate(cap);
            }
            next_layer.extend(children);
        }

        if next_layer.is_empty() {
            break;
        }
        if next_layer.len() > limits.beam_width {
            next_layer.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));
            next_layer.truncate(limits.beam_width);
        }
        current_layer = next_layer;
    }

    debug!(
        expanded = iteration_nodes,
        deduped = visited.len(),
        "sweep exhausted its caps"
    );
    Ok(IterationOutcome::Partial {
        best_unsolved,
        best_score,
    })
}

fn child_cap(limits: &SearchLimits, parent_unmatched: usize, available: usize) -> usize {
    let adaptive =
        limits.max_children_per_node + 2 * parent_unmatched + (limits.beam_width / 8).max(1);
    let ceiling = limits.beam_width + limits.beam_width / 2 + 32;
    available.min(adaptive).min(ceiling)
}
