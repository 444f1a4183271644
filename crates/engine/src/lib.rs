//! Game engines - one `DecisionEngine` per supported game
//!
//! # Module Structure
//!
//! - [`minesweeper`]: `MineSolver`, constraint extraction and bounded enumeration
//! - [`snake`]: `SnakePlanner`, move safety, A*, flood fill and food placement
//! - [`tetris`]: `PlacementEvaluator`, drop simulation and board heuristics
//! - [`pieces`]: tetromino shapes and their distinct rotations
//! - [`speed`]: adaptive fall-speed signal
//!
//! # Bounds
//!
//! | Search | Limit |
//! |--------|-------|
//! | Mine enumeration | 15 constrained cells, 1000 solutions |
//! | Flood fill | 50 cells |
//! | Placement search | distinct rotations x columns |
//!
//! All engines are deterministic except food placement, which draws from the
//! `rand::Rng` the caller passes in.
//!
//! # Example
//!
//! ```
//! use arcade_advisor_core::DecisionEngine;
//! use arcade_advisor_engine::PlacementEvaluator;
//! use arcade_advisor_types::{BlockBoard, PieceKind};
//!
//! let mut engine = PlacementEvaluator::default();
//! let analysis = engine.analyze(&BlockBoard::new(PieceKind::I));
//! assert_eq!(analysis.suggested_actions[0].priority, 10);
//! println!("{}", engine.explain_decision(&engine.suggestion()));
//! ```

pub mod minesweeper;
pub mod pieces;
pub mod snake;
pub mod speed;
pub mod tetris;

// Re-export commonly used types for convenience
pub use minesweeper::{solve, MineSolver, SolveReport};
pub use snake::{find_path, flood_fill, place_strategic_food, safe_moves, SnakePlanner};
pub use speed::{adaptive_drop_interval_ms, level_drop_interval_ms};
pub use tetris::{rank_placements, Placement, PlacementEvaluator};
