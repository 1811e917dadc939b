use rand::rngs::StdRng;
use rand::Rng;

use crate::board::PairMetrics;

/// Keeps solved states ahead of any achievable weighted sum.
pub(crate) const SOLVED_BONUS: f64 = 1_000_000.0;

/// Evaluation weights, sign policy "higher is better". The noise term breaks
/// ties between otherwise identical children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalWeights {
    pub matched: f64,
    pub unmatched: f64,
    pub total_distance: f64,
    pub max_distance: f64,
    pub depth: f64,
    pub operation: f64,
    pub noise: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            matched: 11.0,
            unmatched: 13.0,
            total_distance: 0.26,
            max_distance: 0.075,
            depth: 0.025,
            operation: 0.05,
            noise: 1e-3,
        }
    }
}

pub(crate) fn score(
    weights: &EvalWeights,
    metrics: &PairMetrics,
    depth: usize,
    path_len: usize,
    rng: &mut StdRng,
) -> f64 {
    let summary = metrics.summary;
    let mut score = weights.matched * summary.matched as f64
        - weights.unmatched * summary.unmatched as f64
        - weights.total_distance * metrics.total_unmatched_distance as f64
        - weights.max_distance * metrics.max_unmatched_distance as f64
        - weights.depth * depth as f64
        - weights.operation * path_len as f64
        + weights.noise * rng.gen::<f64>();
    if summary.unmatched == 0 {
        score += SOLVED_BONUS;
    }
    score
}
