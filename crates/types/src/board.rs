//! Board module - grid coordinates and the rectangular cell matrix
//!
//! `BoardMatrix<T>` keeps its cells in a flat row-major `Vec` (`y * width + x`)
//! so every game board shares the same indexing and bounds rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate. Ordering is row-major (by `y`, then `x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position one step away in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The up-to-8 surrounding cells in a fixed scan order (row above, same row, row below)
    pub fn neighbors8(self) -> impl Iterator<Item = Position> {
        const OFFSETS: [(i32, i32); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        OFFSETS
            .into_iter()
            .map(move |(dx, dy)| Position::new(self.x + dx, self.y + dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed enumeration order used wherever moves are listed
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// `(dx, dy)` in screen coordinates
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Direction that moves `from` onto the 4-adjacent cell `to`
    pub fn between(from: Position, to: Position) -> Option<Self> {
        Direction::ALL
            .into_iter()
            .find(|dir| from.step(*dir) == to)
    }
}

/// Errors raised when building a board from untrusted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    DimensionMismatch,
}

impl BoardError {
    pub fn code(self) -> &'static str {
        match self {
            BoardError::RaggedRow { .. } => "ragged_row",
            BoardError::DimensionMismatch => "dimension_mismatch",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BoardError::RaggedRow { .. } => "row length differs from board width",
            BoardError::DimensionMismatch => "board layers have different dimensions",
        }
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "{}: row {} has {} cells, expected {}",
                self.message(),
                row,
                found,
                expected
            ),
            BoardError::DimensionMismatch => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for BoardError {}

/// Rectangular grid of cell values.
///
/// Invariant: `cells.len() == width * height`; every row has exactly `width` cells.
/// Serializes as a list of rows and re-validates that shape on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Vec<T>>",
    into = "Vec<Vec<T>>",
    bound(
        serialize = "T: Serialize + Clone",
        deserialize = "T: Deserialize<'de> + Clone"
    )
)]
pub struct BoardMatrix<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> BoardMatrix<T> {
    /// Create a `width` x `height` matrix with every cell set to `fill`
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Build from rows, rejecting rows whose length differs from the first row
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Convert back to a list of rows
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }
}

impl<T> BoardMatrix<T> {
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width + pos.x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Get cell at `pos`, `None` if out of bounds
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    /// Set cell at `pos`. Returns false if out of bounds
    pub fn set(&mut self, pos: Position, value: T) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks() panics on zero, and a zero-width board has no cells anyway.
        self.cells
            .chunks(self.width.max(1))
            .take(if self.width == 0 { 0 } else { self.height })
    }

    /// Iterate every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

impl<T: Clone> TryFrom<Vec<Vec<T>>> for BoardMatrix<T> {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl<T: Clone> From<BoardMatrix<T>> for Vec<Vec<T>> {
    fn from(value: BoardMatrix<T>) -> Self {
        value.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_index_and_bounds() {
        let mut m = BoardMatrix::new(3, 2, 0u8);
        assert!(m.set(Position::new(2, 1), 7));
        assert_eq!(m.get(Position::new(2, 1)), Some(&7));
        assert_eq!(m.cells[1 * 3 + 2], 7);

        assert!(!m.set(Position::new(3, 0), 1));
        assert!(!m.set(Position::new(0, -1), 1));
        assert_eq!(m.get(Position::new(-1, 0)), None);
        assert_eq!(m.get(Position::new(0, 2)), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let err = BoardMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
        assert_eq!(
            err,
            BoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(err.code(), "ragged_row");
    }

    #[test]
    fn test_zero_size_matrix_is_legal() {
        let m: BoardMatrix<bool> = BoardMatrix::from_rows(Vec::new()).unwrap();
        assert_eq!(m.width(), 0);
        assert_eq!(m.height(), 0);
        assert!(m.is_empty());
        assert_eq!(m.rows().count(), 0);
        assert_eq!(m.positions().count(), 0);
        assert_eq!(m.get(Position::new(0, 0)), None);
    }

    #[test]
    fn test_rows_roundtrip_preserves_layout() {
        let rows = vec![vec!['a', 'b'], vec!['c', 'd'], vec!['e', 'f']];
        let m = BoardMatrix::from_rows(rows.clone()).unwrap();
        assert_eq!(m.get(Position::new(1, 2)), Some(&'f'));
        assert_eq!(m.to_rows(), rows);
    }

    #[test]
    fn test_deserialize_validates_shape() {
        let ok: BoardMatrix<u8> = serde_json::from_str("[[1,0],[0,1]]").unwrap();
        assert_eq!(ok.width(), 2);
        assert!(serde_json::from_str::<BoardMatrix<u8>>("[[1,0],[0]]").is_err());
    }

    #[test]
    fn test_position_order_is_row_major() {
        let mut cells = vec![Position::new(1, 1), Position::new(2, 0), Position::new(0, 1)];
        cells.sort();
        assert_eq!(
            cells,
            vec![Position::new(2, 0), Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn test_direction_between_adjacent_cells() {
        let p = Position::new(5, 5);
        for dir in Direction::ALL {
            assert_eq!(Direction::between(p, p.step(dir)), Some(dir));
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::between(p, Position::new(7, 5)), None);
    }
}
