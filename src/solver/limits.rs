use super::SolverConfig;

/// Per-iteration caps derived from the base configuration and the board
/// size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub beam_width: usize,
    pub max_depth: usize,
    pub max_nodes: usize,
    pub max_children_per_node: usize,
}

/// Scales the base caps for the board size: an 8-wide board runs the base
/// configuration, larger boards grow superlinearly (node budget cubically).
/// Small boards get floors so short searches still have room to finish.
pub(crate) fn plan(config: &SolverConfig, board_size: usize) -> SearchLimits {
    let scale = (board_size as f64 / 8.0).max(1.0);
    let mut limits = SearchLimits {
        beam_width: scaled(config.beam_width, scale, 1.35)
            .min(config.beam_width_cap.max(1))
            .max(1),
        max_depth: scaled(config.max_depth, scale, 1.25),
        max_nodes: scaled(config.max_nodes, scale, 3.0),
        max_children_per_node: scaled(config.max_children_per_node, scale, 1.1),
    };
    if board_size <= 8 {
        limits.max_depth = limits.max_depth.max(48);
        limits.max_nodes = limits.max_nodes.max(280_000);
        limits.max_children_per_node = limits.max_children_per_node.max(64);
    }
    limits
}

/// Widens the planned caps on every retry from the same root.
pub(crate) fn widen(mut limits: SearchLimits, iteration: usize) -> SearchLimits {
    if iteration == 0 {
        return limits;
    }
    let growth = iteration as f64;
    limits.beam_width = (limits.beam_width as f64 * (1.0 + 0.45 * growth)).ceil() as usize;
    limits.max_nodes = (limits.max_nodes as f64 * (1.0 + 0.6 * growth)).ceil() as usize;
    limits.max_depth += 10 * iteration;
    limits.max_children_per_node += (5 * iteration).max(8);
    limits
}

fn scaled(base: usize, scale: f64, exponent: f64) -> usize {
    (base as f64 * scale.powf(exponent)).ceil() as usize
}
