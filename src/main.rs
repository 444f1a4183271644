//! Advisor demo host (default binary).
//!
//! Runs each engine on its canonical board and prints the analysis as JSON,
//! followed by the suggestion explanation and a hint at the configured
//! difficulty. Settings come from `ADVISOR_*` environment variables.

use std::sync::Arc;

use anyhow::Result;

use arcade_advisor::core::{
    AdvisorConfig, ConfigProvider, DecisionEngine, EngineContext, SharedConfig,
    StepByStepExplainer, TelemetryLog, TelemetrySink,
};
use arcade_advisor::engine::{adaptive_drop_interval_ms, MineSolver, PlacementEvaluator, SnakePlanner};
use arcade_advisor::types::{
    BlockBoard, Direction, GameKind, MineBoard, PieceKind, Position, SnakeBoard,
};

fn main() -> Result<()> {
    let config = SharedConfig::from_env();
    let telemetry = Arc::new(TelemetryLog::new());
    let explainer = Arc::new(StepByStepExplainer);

    let context = |game: GameKind| {
        EngineContext::new(game, Arc::new(config.clone()))
            .with_telemetry(telemetry.clone())
            .with_explainer(explainer.clone())
    };

    let settings = config.snapshot();

    let mut mines = MineSolver::with_context(context(GameKind::Minesweeper));
    let mut board = MineBoard::new(5, 5, vec![Position::new(4, 4)]);
    board.reveal(Position::new(0, 0));
    report(&mut mines, &board, &settings)?;

    let mut snake = SnakePlanner::with_context(context(GameKind::Snake));
    let board = SnakeBoard::new(
        20,
        20,
        vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
        Direction::Right,
        Position::new(10, 10),
    );
    report(&mut snake, &board, &settings)?;
    if let Some(food) = snake.place_food(&board, &mut rand::rng()) {
        println!("Next food cell: {}", food);
    }

    let mut blocks = PlacementEvaluator::with_context(context(GameKind::Tetris));
    let board = BlockBoard::new(PieceKind::I);
    report(&mut blocks, &board, &settings)?;
    println!(
        "Drop interval at level {}: {}ms",
        board.level,
        adaptive_drop_interval_ms(board.level, board.lines_cleared, board.pieces_placed)
    );

    if settings.debug_mode {
        println!("\n== telemetry ==");
        for game in [GameKind::Minesweeper, GameKind::Snake, GameKind::Tetris] {
            if let Some(record) = telemetry.latest(game) {
                println!("{}", record.to_json());
            }
        }
    }

    Ok(())
}

fn report<E: DecisionEngine>(
    engine: &mut E,
    snapshot: &E::Snapshot,
    settings: &AdvisorConfig,
) -> Result<()> {
    let analysis = engine.analyze(snapshot);
    println!("== {} ==", engine.game().as_str());
    println!("{}", serde_json::to_string_pretty(&analysis)?);

    let suggestion = engine.suggestion();
    println!("\n{}", engine.explain_decision(&suggestion));

    let hint = engine.hint(settings.difficulty);
    println!("\nHint ({:.2}): {}", settings.difficulty, hint.message);
    if let Some(detail) = &hint.detail {
        println!("{}", detail);
    }
    println!();
    Ok(())
}
