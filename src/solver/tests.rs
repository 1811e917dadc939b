use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::Board;
use crate::rotation::Rotation;
use crate::solver::{BeamSolver, SolverConfig};

/// Rows of horizontally adjacent pairs: `[0,0,1,1], [2,2,3,3], ...`
fn solved_board(size: usize) -> Board {
    let mut cells = Vec::with_capacity(size * size);
    let mut label = 0;
    for _ in 0..size {
        for _ in 0..size / 2 {
            cells.push(label);
            cells.push(label);
            label += 1;
        }
    }
    Board::new(size, cells).unwrap()
}

fn shuffled_board(size: usize, seed: u64) -> Board {
    let mut cells: Vec<i32> = (0..(size * size / 2) as i32)
        .flat_map(|label| [label, label])
        .collect();
    cells.shuffle(&mut StdRng::seed_from_u64(seed));
    Board::new(size, cells).unwrap()
}

fn replay(initial: &Board, operations: &[Rotation]) -> Board {
    let mut board = initial.clone();
    for &rotation in operations {
        board.apply(rotation).unwrap();
    }
    board
}

#[test]
fn an_already_solved_board_returns_an_empty_path() {
    let board = solved_board(2);
    let report = BeamSolver::new(SolverConfig::default())
        .solve(&board)
        .unwrap();
    assert!(report.solved);
    assert!(report.operations.is_empty());
    assert_eq!(report.summary.matched, 2);
    assert_eq!(report.summary.unmatched, 0);
    assert_eq!(report.explored_nodes, 0);
}

#[test]
fn vertically_adjacent_pairs_need_no_operations() {
    let board = Board::new(2, vec![0, 1, 0, 1]).unwrap();
    let report = BeamSolver::new(SolverConfig::default())
        .solve(&board)
        .unwrap();
    assert!(report.solved);
    assert!(report.operations.is_empty());
}

#[test]
fn a_single_rotation_scramble_is_solved_in_the_first_sweep() {
    let rotation = Rotation::new(1, 0, 2);
    let mut board = solved_board(4);
    for _ in 0..3 {
        board.apply(rotation).unwrap();
    }
    assert!(!board.is_goal());

    let config = SolverConfig {
        seed: Some(11),
        ..SolverConfig::default()
    };
    let report = BeamSolver::new(config).solve(&board).unwrap();
    assert!(report.solved);
    assert_eq!(report.operations, vec![rotation]);
    assert!(report.explored_nodes > 0);
    assert!(replay(&board, &report.operations).is_goal());
}

#[test]
fn refinement_alone_recovers_a_single_rotation_scramble() {
    let rotation = Rotation::new(1, 0, 2);
    let mut board = solved_board(4);
    for _ in 0..3 {
        board.apply(rotation).unwrap();
    }

    // No beam iterations at all: only the greedy pass runs.
    let config = SolverConfig {
        max_iterations: 0,
        seed: Some(11),
        ..SolverConfig::default()
    };
    let report = BeamSolver::new(config).solve(&board).unwrap();
    assert!(report.solved);
    assert_eq!(report.operations, vec![rotation]);
    assert!(replay(&board, &report.operations).is_goal());
}

#[test]
fn identical_seeds_reproduce_the_same_operations() {
    let rotation = Rotation::new(1, 0, 2);
    let mut board = solved_board(4);
    for _ in 0..3 {
        board.apply(rotation).unwrap();
    }

    let config = SolverConfig {
        seed: Some(42),
        ..SolverConfig::default()
    };
    let first = BeamSolver::new(config.clone()).solve(&board).unwrap();
    let second = BeamSolver::new(config).solve(&board).unwrap();
    assert_eq!(first.operations, second.operations);
    assert_eq!(first.solved, second.solved);
}

#[test]
fn a_time_capped_run_still_reports_a_consistent_result() {
    let board = shuffled_board(4, 99);
    let config = SolverConfig {
        time_limit_ms: 200.0,
        max_iterations: 2,
        seed: Some(5),
        ..SolverConfig::default()
    };
    let report = BeamSolver::new(config).solve(&board).unwrap();

    let replayed = replay(&board, &report.operations);
    assert_eq!(replayed.evaluate_pairs(), report.summary);
    assert_eq!(replayed.is_goal(), report.solved);
    assert!(report.elapsed_ms >= 0.0);
}

#[test]
fn a_plateauing_search_keeps_its_report_consistent() {
    // Deliberately starved limits on a 10x10 board: the sweeps plateau, the
    // shake path runs, and the result must still replay correctly.
    let board = shuffled_board(10, 1);
    let config = SolverConfig {
        beam_width: 2,
        max_depth: 2,
        max_nodes: 60,
        max_children_per_node: 4,
        max_iterations: 3,
        shake_max_length: 4,
        max_shakes: 2,
        seed: Some(17),
        ..SolverConfig::default()
    };
    let report = BeamSolver::new(config).solve(&board).unwrap();

    assert!(report.explored_nodes > 0);
    let replayed = replay(&board, &report.operations);
    assert_eq!(replayed.evaluate_pairs(), report.summary);
    assert_eq!(replayed.is_goal(), report.solved);
}
