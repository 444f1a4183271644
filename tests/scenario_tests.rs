//! Canonical boards for each engine

use arcade_advisor::core::DecisionEngine;
use arcade_advisor::engine::{MineSolver, PlacementEvaluator, SnakePlanner};
use arcade_advisor::types::{
    ActionKind, AnalysisDetail, BlockBoard, Direction, MineBoard, PieceKind, Position, RiskLevel,
    SnakeBoard,
};

#[test]
fn test_mine_zero_clue_clears_neighbours() {
    let mut board = MineBoard::new(5, 5, vec![Position::new(4, 4)]);
    board.reveal(Position::new(0, 0));
    assert_eq!(board.adjacent_mines(Position::new(0, 0)), 0);

    let mut solver = MineSolver::default();
    let analysis = solver.analyze(&board);

    for n in [Position::new(1, 0), Position::new(0, 1), Position::new(1, 1)] {
        assert_eq!(analysis.detail.mine_probability(n), Some(0.0), "{}", n);
        assert!(analysis
            .suggested_actions
            .iter()
            .any(|a| a.kind == ActionKind::Reveal && a.target == Some(n)));
    }
    assert_eq!(analysis.confidence, 1.0);
    assert_eq!(analysis.risk_assessment, RiskLevel::Low);
    assert_eq!(analysis.suggested_actions[0].priority, 10);
    assert_eq!(analysis.suggested_actions[2].priority, 8);
}

#[test]
fn test_snake_open_board_has_path_and_low_risk() {
    let board = SnakeBoard::new(
        20,
        20,
        vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
        Direction::Right,
        Position::new(10, 10),
    );
    let mut planner = SnakePlanner::default();
    let analysis = planner.analyze(&board);

    let path = analysis.detail.path_to_food().expect("expected a path");
    assert_eq!(path.len(), 10);
    assert_eq!(path.last(), Some(&Position::new(10, 10)));
    assert!(analysis.confidence >= 0.8);
    assert_eq!(analysis.risk_assessment, RiskLevel::Low);
    assert_eq!(analysis.suggested_actions.len(), 3);
    assert_eq!(analysis.suggested_actions[0].priority, 10);
    assert!(analysis.alternative_options.is_empty());
}

#[test]
fn test_i_piece_on_empty_board_lies_flat() {
    let board = BlockBoard::new(PieceKind::I);
    let mut evaluator = PlacementEvaluator::default();
    let analysis = evaluator.analyze(&board);

    let best = analysis.best_action().expect("expected a placement");
    assert_eq!(
        best.kind,
        ActionKind::Place {
            rotation: 0,
            column: 0
        }
    );
    assert_eq!(best.target, Some(Position::new(0, 19)));

    match &analysis.detail {
        AnalysisDetail::Blocks {
            candidates_evaluated,
            best: Some(features),
        } => {
            assert_eq!(*candidates_evaluated, 17);
            assert_eq!(features.holes, 0);
            assert_eq!(features.bumpiness, 1);
            assert_eq!(features.aggregate_height, 4);
        }
        other => panic!("unexpected detail: {:?}", other),
    }
}

#[test]
fn test_snapshots_load_from_json() {
    let snake: SnakeBoard = serde_json::from_str(
        r#"{"width":20,"height":20,"body":[{"x":5,"y":5},{"x":4,"y":5}],"direction":"right","food":{"x":10,"y":10}}"#,
    )
    .unwrap();
    assert_eq!(snake.head(), Some(Position::new(5, 5)));

    let blocks: BlockBoard = serde_json::from_str(
        r#"{"cells":[[null,null],["i",null]],"active":"t"}"#,
    )
    .unwrap();
    assert_eq!(blocks.width(), 2);
    assert!(blocks.is_occupied(Position::new(0, 1)));
    assert_eq!(blocks.level, 0);

    let ragged = serde_json::from_str::<BlockBoard>(r#"{"cells":[[null,null],[null]],"active":"t"}"#);
    assert!(ragged.is_err());
}
