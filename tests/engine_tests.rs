//! Shared engine interface: configuration, telemetry, hints and explanations

use std::sync::Arc;

use arcade_advisor::core::{
    AdvisorConfig, ConfigError, ConfigProvider, DecisionEngine, EngineContext, SharedConfig,
    StepByStepExplainer, TelemetryLog, TelemetrySink,
};
use arcade_advisor::engine::{MineSolver, PlacementEvaluator, SnakePlanner};
use arcade_advisor::types::{
    BlockBoard, Direction, GameKind, MineBoard, PieceKind, Position, SnakeBoard,
};

fn opening_mine_board() -> MineBoard {
    let mut board = MineBoard::new(5, 5, vec![Position::new(4, 4)]);
    board.reveal(Position::new(0, 0));
    board
}

fn open_snake_board() -> SnakeBoard {
    SnakeBoard::new(
        20,
        20,
        vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
        Direction::Right,
        Position::new(10, 10),
    )
}

fn index_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {:?} in:\n{}", needle, haystack))
}

#[test]
fn test_suggestion_before_analysis_is_the_sentinel() {
    let solver = MineSolver::default();
    let suggestion = solver.suggestion();
    assert!(suggestion.action.is_none());
    assert_eq!(suggestion.confidence, 0.0);
    assert!(solver.last_analysis().is_none());
}

#[test]
fn test_suggestion_quotes_the_metric() {
    let mut solver = MineSolver::default();
    solver.analyze(&opening_mine_board());
    let suggestion = solver.suggestion();
    assert_eq!(suggestion.action.target, Some(Position::new(1, 0)));
    assert!(suggestion.explanation.contains("0% mine probability"));

    let mut planner = SnakePlanner::default();
    planner.analyze(&open_snake_board());
    assert!(planner
        .suggestion()
        .explanation
        .contains("shortest path to the food (10 steps)"));
}

#[test]
fn test_difficulty_is_shared_and_nan_is_rejected() {
    let config = SharedConfig::default();
    let mines = MineSolver::new(Arc::new(config.clone()));
    let blocks = PlacementEvaluator::new(Arc::new(config.clone()));

    mines.set_difficulty_level(0.8).unwrap();
    assert_eq!(blocks.difficulty_level(), 0.8);

    assert_eq!(
        blocks.set_difficulty_level(f64::NAN),
        Err(ConfigError::NonFiniteDifficulty)
    );
    assert_eq!(mines.difficulty_level(), 0.8);

    blocks.set_debug_mode(true);
    assert!(mines.is_debug_mode_enabled());
}

#[test]
fn test_hint_tiers() {
    let mut solver = MineSolver::default();
    solver.analyze(&opening_mine_board());

    let easy = solver.hint(0.1);
    assert_eq!(easy.indicators.len(), 3);
    assert!(easy.detail.is_some());
    assert_eq!(easy.confidence, Some(1.0));

    let medium = solver.hint(0.5);
    assert_eq!(medium.indicators, vec![Position::new(1, 0)]);
    assert!(medium.detail.is_none());

    let hard = solver.hint(0.9);
    assert!(hard.indicators.is_empty());
    assert!(hard.confidence.is_none());
    assert!(!hard.message.contains('('));

    // Non-finite falls back to the configured 0.5.
    assert_eq!(solver.hint(f64::NAN), medium);
}

#[test]
fn test_easy_hint_for_a_cornered_snake() {
    let board = SnakeBoard::new(
        5,
        5,
        vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(0, 2),
        ],
        Direction::Left,
        Position::new(4, 4),
    );
    let mut planner = SnakePlanner::default();
    let analysis = planner.analyze(&board);
    assert!(analysis.suggested_actions.is_empty());

    let hint = planner.hint(0.1);
    assert_eq!(hint.indicators.len(), 3);
    assert_eq!(hint.confidence, Some(0.0));
    let detail = hint.detail.expect("expected detail");
    assert!(detail.contains("Every move leads into a wall or the body."));
}

#[test]
fn test_telemetry_only_in_debug_mode() {
    let config = SharedConfig::default();
    let log = Arc::new(TelemetryLog::new());
    let ctx = EngineContext::new(GameKind::Snake, Arc::new(config.clone()))
        .with_telemetry(log.clone());
    let mut planner = SnakePlanner::with_context(ctx);

    planner.analyze(&open_snake_board());
    assert!(log.is_empty());

    planner.set_debug_mode(true);
    planner.analyze(&open_snake_board());
    let record = log.latest(GameKind::Snake).expect("expected a record");
    assert_eq!(record.metrics["path_len"], 10.0);
    assert_eq!(record.metrics["safe_moves"], 3.0);

    let text = planner.explain_decision(&planner.suggestion());
    assert!(text.contains("[debug]"));
    assert!(text.contains("\"path_len\":10.0"));
}

#[test]
fn test_explanation_sections_in_fixed_order() {
    let config = SharedConfig::default();
    config.update(&mut |cfg: &mut AdvisorConfig| {
        cfg.debug_mode = true;
        cfg.educational_mode = true;
    });
    let ctx = EngineContext::new(GameKind::Tetris, Arc::new(config))
        .with_telemetry(Arc::new(TelemetryLog::new()))
        .with_explainer(Arc::new(StepByStepExplainer));
    let mut evaluator = PlacementEvaluator::with_context(ctx);
    evaluator.analyze(&BlockBoard::new(PieceKind::T));

    let suggestion = evaluator.suggestion();
    let text = evaluator.explain_decision(&suggestion);

    let order = [
        "Action:",
        "Confidence:",
        "Priority: 10",
        "Reasoning:",
        "Alternatives:",
        "[debug]",
        "Last telemetry:",
        "[walkthrough]",
    ];
    let positions: Vec<usize> = order.iter().map(|s| index_of(&text, s)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);

    assert_eq!(text, evaluator.explain_decision(&suggestion));
}

#[test]
fn test_presentation_toggles_drop_sections() {
    let config = SharedConfig::default();
    config.update(&mut |cfg: &mut AdvisorConfig| {
        cfg.show_confidence = false;
        cfg.show_alternatives = false;
    });
    let mut evaluator = PlacementEvaluator::new(Arc::new(config));
    evaluator.analyze(&BlockBoard::new(PieceKind::O));
    let text = evaluator.explain_decision(&evaluator.suggestion());
    assert!(!text.contains("Confidence:"));
    assert!(!text.contains("Alternatives:"));
    assert!(!text.contains("[debug]"));
    assert!(text.starts_with("Action: "));
}
