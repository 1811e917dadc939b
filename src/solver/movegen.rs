use std::cmp::Reverse;

use itertools::iproduct;

use crate::board::{Board, PairMetrics};
use crate::rotation::Rotation;

/// Enumerates the candidate rotations for one expansion, skipping the op
/// that produced the node (re-rotating the same square is never useful as
/// the very next step). With unmatched pairs on the board the candidates are
/// restricted to those touching at least one unmatched cell and ordered by
/// how many they touch, via a 2-D prefix sum over the mask.
pub(crate) fn candidate_rotations(
    board: &Board,
    metrics: &PairMetrics,
    last: Option<Rotation>,
    rotation_sizes: &[usize],
) -> Vec<Rotation> {
    let size = board.size();
    let mut candidates = Vec::new();
    for &k in rotation_sizes {
        if k < 2 || k > size {
            continue;
        }
        for (y, x) in iproduct!(0..=size - k, 0..=size - k) {
            let rotation = Rotation::new(x, y, k);
            if last == Some(rotation) {
                continue;
            }
            candidates.push(rotation);
        }
    }

    if metrics.summary.unmatched == 0 || metrics.unmatched_mask.len() != size * size {
        return candidates;
    }

    let prefix = mask_prefix_sums(&metrics.unmatched_mask, size);
    let mut weighted: Vec<(Rotation, usize)> = candidates
        .into_iter()
        .map(|rotation| (rotation, footprint_sum(&prefix, size, rotation)))
        .filter(|&(_, impact)| impact > 0)
        .collect();
    // Stable sort: equal-impact candidates keep enumeration order.
    weighted.sort_by_key(|&(_, impact)| Reverse(impact));
    weighted.into_iter().map(|(rotation, _)| rotation).collect()
}

/// `(size + 1)²` inclusive prefix sums; entry `(x, y)` holds the mask total
/// over the rectangle `[0, x) × [0, y)`.
fn mask_prefix_sums(mask: &[u8], size: usize) -> Vec<usize> {
    let stride = size + 1;
    let mut prefix = vec![0_usize; stride * stride];
    for y in 0..size {
        for x in 0..size {
            prefix[(y + 1) * stride + x + 1] = mask[y * size + x] as usize
                + prefix[y * stride + x + 1]
                + prefix[(y + 1) * stride + x]
                - prefix[y * stride + x];
        }
    }
    prefix
}

fn footprint_sum(prefix: &[usize], size: usize, rotation: Rotation) -> usize {
    let stride = size + 1;
    let (x0, y0) = (rotation.x, rotation.y);
    let (x1, y1) = (rotation.x + rotation.size, rotation.y + rotation.size);
    prefix[y1 * stride + x1] + prefix[y0 * stride + x0]
        - prefix[y0 * stride + x1]
        - prefix[y1 * stride + x0]
}

#[cfg(test)]
mod tests {
    use super::candidate_rotations;
    use crate::board::Board;
    use crate::rotation::Rotation;

    fn mask_count(board: &Board, rotation: Rotation) -> usize {
        let mask = &board.evaluate_pair_metrics().unmatched_mask;
        let mut total = 0;
        for dy in 0..rotation.size {
            for dx in 0..rotation.size {
                total += mask[(rotation.y + dy) * board.size() + rotation.x + dx] as usize;
            }
        }
        total
    }

    #[test]
    fn solved_boards_enumerate_every_rotation_in_order() {
        let board = Board::new(4, vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7]).unwrap();
        let metrics = board.evaluate_pair_metrics();
        let candidates = candidate_rotations(&board, &metrics, None, &[2, 3, 4, 5]);
        // 9 placements of k=2, 4 of k=3, 1 of k=4; k=5 does not fit.
        assert_eq!(candidates.len(), 14);
        assert_eq!(candidates[0], Rotation::new(0, 0, 2));
        assert_eq!(candidates[13], Rotation::new(0, 0, 4));
    }

    #[test]
    fn the_previous_rotation_is_never_repeated() {
        let board = Board::new(4, vec![0, 1, 0, 1, 2, 3, 2, 3, 4, 5, 4, 5, 6, 7, 6, 7]).unwrap();
        let metrics = board.evaluate_pair_metrics();
        let last = Rotation::new(1, 1, 2);
        let candidates = candidate_rotations(&board, &metrics, Some(last), &[2, 3, 4, 5]);
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|&rotation| rotation != last));
    }

    #[test]
    fn every_candidate_touches_an_unmatched_cell() {
        // Left half solved, right half scrambled.
        let board = Board::new(4, vec![0, 0, 4, 5, 1, 1, 5, 4, 2, 2, 6, 7, 3, 3, 7, 6]).unwrap();
        let metrics = board.evaluate_pair_metrics();
        assert!(metrics.summary.unmatched > 0);
        let candidates = candidate_rotations(&board, &metrics, None, &[2, 3, 4, 5]);
        assert!(!candidates.is_empty());
        for &rotation in &candidates {
            assert!(
                mask_count(&board, rotation) > 0,
                "rotation {rotation:?} has no impact"
            );
        }
    }

    #[test]
    fn candidates_are_ordered_by_non_increasing_impact() {
        let board = Board::new(4, vec![0, 1, 0, 1, 2, 3, 2, 3, 4, 5, 4, 5, 6, 7, 6, 7]).unwrap();
        let metrics = board.evaluate_pair_metrics();
        let candidates = candidate_rotations(&board, &metrics, None, &[2, 3, 4, 5]);
        let impacts: Vec<usize> = candidates
            .iter()
            .map(|&rotation| mask_count(&board, rotation))
            .collect();
        assert!(impacts.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(impacts.iter().all(|&impact| impact > 0));
    }

    #[test]
    fn oversized_rotation_sizes_are_skipped() {
        let board = Board::new(2, vec![0, 0, 1, 1]).unwrap();
        let metrics = board.evaluate_pair_metrics();
        let candidates = candidate_rotations(&board, &metrics, None, &[2, 3, 4, 5]);
        assert_eq!(candidates, vec![Rotation::new(0, 0, 2)]);
    }
}
