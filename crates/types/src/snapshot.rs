//! Read-only board snapshots handed to the engines by the host.
//!
//! Snapshots are owned by the host; engines only borrow them for the duration
//! of one `analyze` call.

use serde::{Deserialize, Serialize};

use crate::board::{BoardError, BoardMatrix, Direction, Position};
use crate::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Cell on a falling-block board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;

/// Mine-detection grid as the host sees it, ground truth included.
///
/// The mine list is only consulted to compute the clue number shown on a
/// revealed cell, which the player can already see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineBoardParts")]
pub struct MineBoard {
    revealed: BoardMatrix<bool>,
    flagged: BoardMatrix<bool>,
    mines: Vec<Position>,
}

/// Unchecked wire form of [`MineBoard`]; decoding goes through `from_parts`
#[derive(Deserialize)]
struct MineBoardParts {
    revealed: BoardMatrix<bool>,
    flagged: BoardMatrix<bool>,
    mines: Vec<Position>,
}

impl TryFrom<MineBoardParts> for MineBoard {
    type Error = BoardError;

    fn try_from(parts: MineBoardParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.revealed, parts.flagged, parts.mines)
    }
}

impl MineBoard {
    /// A fully hidden board with the given mine layout
    pub fn new(width: usize, height: usize, mines: Vec<Position>) -> Self {
        Self {
            revealed: BoardMatrix::new(width, height, false),
            flagged: BoardMatrix::new(width, height, false),
            mines,
        }
    }

    pub fn from_parts(
        revealed: BoardMatrix<bool>,
        flagged: BoardMatrix<bool>,
        mines: Vec<Position>,
    ) -> Result<Self, BoardError> {
        if revealed.width() != flagged.width() || revealed.height() != flagged.height() {
            return Err(BoardError::DimensionMismatch);
        }
        Ok(Self {
            revealed,
            flagged,
            mines,
        })
    }

    pub fn width(&self) -> usize {
        self.revealed.width()
    }

    pub fn height(&self) -> usize {
        self.revealed.height()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.revealed.in_bounds(pos)
    }

    /// Mark a single cell as revealed. No cascade; the host owns reveal rules.
    pub fn reveal(&mut self, pos: Position) -> bool {
        self.revealed.set(pos, true)
    }

    pub fn set_flag(&mut self, pos: Position, flagged: bool) -> bool {
        self.flagged.set(pos, flagged)
    }

    pub fn is_revealed(&self, pos: Position) -> bool {
        self.revealed.get(pos).copied().unwrap_or(false)
    }

    pub fn is_flagged(&self, pos: Position) -> bool {
        self.flagged.get(pos).copied().unwrap_or(false)
    }

    /// Hidden and not flagged
    pub fn is_unknown(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.is_revealed(pos) && !self.is_flagged(pos)
    }

    pub fn is_mine(&self, pos: Position) -> bool {
        self.mines.contains(&pos)
    }

    pub fn total_mines(&self) -> usize {
        self.mines.len()
    }

    /// The clue number a revealed cell displays
    pub fn adjacent_mines(&self, pos: Position) -> usize {
        pos.neighbors8().filter(|n| self.is_mine(*n)).count()
    }

    pub fn flagged_count(&self) -> usize {
        self.revealed
            .positions()
            .filter(|p| self.is_flagged(*p))
            .count()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
            .positions()
            .filter(|p| self.is_revealed(*p))
            .count()
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        self.revealed.positions()
    }
}

/// Movement-grid snapshot. `body[0]` is the head, the last element the tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeBoard {
    pub width: i32,
    pub height: i32,
    pub body: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
}

impl SnakeBoard {
    pub fn new(
        width: i32,
        height: i32,
        body: Vec<Position>,
        direction: Direction,
        food: Position,
    ) -> Self {
        Self {
            width,
            height,
            body,
            direction,
            food,
        }
    }

    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }

    pub fn tail(&self) -> Option<Position> {
        self.body.last().copied()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Body cells that stay occupied on the next step (everything but the tail)
    pub fn is_body_obstacle(&self, pos: Position) -> bool {
        let len = self.body.len();
        len > 1 && self.body[..len - 1].contains(&pos)
    }
}

/// Falling-block snapshot: the locked stack plus the active piece kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockBoard {
    pub cells: BoardMatrix<Cell>,
    pub active: PieceKind,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub lines_cleared: u32,
    #[serde(default)]
    pub pieces_placed: u32,
}

impl BlockBoard {
    /// Empty standard-size (10x20) board
    pub fn new(active: PieceKind) -> Self {
        Self::with_size(BOARD_WIDTH as usize, BOARD_HEIGHT as usize, active)
    }

    pub fn with_size(width: usize, height: usize, active: PieceKind) -> Self {
        Self {
            cells: BoardMatrix::new(width, height, None),
            active,
            level: 0,
            lines_cleared: 0,
            pieces_placed: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        matches!(self.cells.get(pos), Some(Some(_)))
    }
}
