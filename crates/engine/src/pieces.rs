//! Pieces module - tetromino shapes per rotation state
//!
//! Shapes follow the SRS spawn boxes. The placement search only cares about
//! the set of cells a rotation occupies, so shapes are normalized (shifted so
//! the topmost and leftmost minos sit at 0) and rotations that normalize to
//! the same cells are enumerated once.

use arrayvec::ArrayVec;

use arcade_advisor_types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => match rotation {
            Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
            Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
            Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
            Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
        },
        PieceKind::O => [(1, 0), (2, 0), (1, 1), (2, 1)],
        PieceKind::T => match rotation {
            Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
            Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
        },
        PieceKind::S => match rotation {
            Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
            Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
            Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
            Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
        },
        PieceKind::Z => match rotation {
            Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
            Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
            Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
        },
        PieceKind::J => match rotation {
            Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
            Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
        },
        PieceKind::L => match rotation {
            Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
            Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
        },
    }
}

/// Shift a shape so its minimum x and y are both 0, minos sorted row-major
pub fn normalize(shape: PieceShape) -> PieceShape {
    let min_x = shape.iter().map(|m| m.0).min().unwrap_or(0);
    let min_y = shape.iter().map(|m| m.1).min().unwrap_or(0);
    let mut out = shape.map(|(x, y)| (x - min_x, y - min_y));
    out.sort_by_key(|&(x, y)| (y, x));
    out
}

/// Width of a normalized shape in columns
pub fn shape_width(shape: &PieceShape) -> i32 {
    shape.iter().map(|m| m.0 as i32).max().unwrap_or(0) + 1
}

/// Distinct normalized rotation states of `kind`, in clockwise order from spawn
pub fn distinct_rotations(kind: PieceKind) -> ArrayVec<(Rotation, PieceShape), 4> {
    let mut out: ArrayVec<(Rotation, PieceShape), 4> = ArrayVec::new();
    for rotation in Rotation::ALL {
        let shape = normalize(get_shape(kind, rotation));
        if out.iter().all(|(_, s)| *s != shape) {
            out.push((rotation, shape));
        }
    }
    out
}
