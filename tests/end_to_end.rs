use rotamatch::generate;
use rotamatch::problem::{self, Problem};
use rotamatch::solver::{BeamSolver, SolverConfig};

#[test]
fn generated_problems_solve_and_replay_end_to_end() {
    let doc = generate::generate_document(4, 2024).unwrap();
    let problem = Problem::from_text(&doc).unwrap();
    let board = problem.make_board().unwrap();

    let config = SolverConfig {
        time_limit_ms: 2_000.0,
        max_iterations: 2,
        seed: Some(1),
        ..SolverConfig::default()
    };
    let report = BeamSolver::new(config).solve(&board).unwrap();

    let answer = problem::serialize_answer(&report.operations);
    let parsed = problem::parse_answer(&answer).unwrap();
    assert_eq!(parsed, report.operations);

    let mut replayed = board.clone();
    for rotation in parsed {
        replayed.apply(rotation).unwrap();
    }
    assert_eq!(replayed.evaluate_pairs(), report.summary);
    assert_eq!(replayed.is_goal(), report.solved);
}

#[test]
fn the_parser_accepts_what_the_generator_writes() {
    for size in [4_usize, 6, 8] {
        let doc = generate::generate_document(size, size as u64).unwrap();
        let problem = Problem::from_text(&doc).unwrap();
        assert_eq!(problem.size, size);
        assert_eq!(problem.entities.len(), size * size);
    }
}
