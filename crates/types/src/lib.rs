//! Core types module - board snapshots, actions and analysis results
//!
//! This crate defines the value types shared by every decision engine and by the
//! host that drives them. All types are plain data with no behaviour beyond
//! construction helpers and accessors, which makes them usable in any context
//! (engine internals, presentation layers, JSON fixtures).
//!
//! # Layout
//!
//! - [`board`]: `Position`, `Direction` and the rectangular `BoardMatrix<T>`
//! - [`snapshot`]: read-only board snapshots for the three supported games
//! - [`analysis`]: `Action`, `Analysis`, `Suggestion` and `Hint`
//!
//! # Coordinates
//!
//! All grids use screen coordinates: `x` grows to the right, `y` grows downward,
//! `(0, 0)` is the top-left cell. `Direction::Up` therefore decreases `y`.
//!
//! # Drop Intervals by Level
//!
//! Gravity for the falling-block game (milliseconds per row), used as the base
//! of the adaptive fall-speed signal:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 1000ms |
//! | 1 | 800ms |
//! | 2 | 650ms |
//! | 3 | 500ms |
//! | 4 | 400ms |
//! | 5 | 320ms |
//! | 6 | 250ms |
//! | 7 | 200ms |
//! | 8 | 160ms |
//! | 9+ | 120ms floor, 100ms absolute minimum |
//!
//! # Examples
//!
//! ```
//! use arcade_advisor_types::{BoardMatrix, PieceKind, Position, Rotation};
//!
//! assert_eq!(PieceKind::T.as_str(), "T");
//! assert_eq!(Rotation::East.index(), 1);
//!
//! let mut grid = BoardMatrix::new(4, 3, false);
//! assert!(grid.set(Position::new(1, 2), true));
//! assert_eq!(grid.get(Position::new(1, 2)), Some(&true));
//! assert_eq!(grid.get(Position::new(4, 0)), None);
//! ```

pub mod analysis;
pub mod board;
pub mod snapshot;

pub use analysis::{
    Action, ActionKind, ActionMetric, Analysis, AnalysisDetail, GameKind, Hint, PlacementFeatures,
    RiskLevel, Suggestion,
};
pub use board::{BoardError, BoardMatrix, Direction, Position};
pub use snapshot::{BlockBoard, Cell, MineBoard, SnakeBoard};

use serde::{Deserialize, Serialize};

/// Default falling-block board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Default falling-block board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Base gravity interval at level 0 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 0, Index 8 = Level 8
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Drop interval used past the end of [`DROP_INTERVALS`] (120ms)
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Absolute minimum drop interval (100ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All piece kinds in canonical order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Convert to uppercase display letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// All rotation states in clockwise order starting at spawn
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Number of clockwise quarter turns from spawn
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_table_is_strictly_decreasing_and_above_floor() {
        for pair in DROP_INTERVALS.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert_eq!(DROP_INTERVALS[0], BASE_DROP_MS);
        assert!(DROP_INTERVALS[8] > DROP_INTERVAL_FLOOR_MS);
        assert!(DROP_INTERVAL_FLOOR_MS > DROP_INTERVAL_MIN_MS);
    }

    #[test]
    fn rotation_index_follows_clockwise_order() {
        for (expected, r) in Rotation::ALL.iter().enumerate() {
            assert_eq!(r.index() as usize, expected);
        }
    }

    #[test]
    fn piece_letters_are_distinct() {
        let letters: std::collections::HashSet<&str> =
            PieceKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(letters.len(), PieceKind::ALL.len());
    }
}
