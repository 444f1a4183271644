//! Placement search for the falling-block board
//!
//! Every distinct rotation of the active piece is dropped at every column
//! where it fits. Each resting placement is scored on the hypothetical board
//! it leaves behind, before any full rows collapse.

use std::sync::Arc;

use arcade_advisor_core::{ConfigProvider, DecisionEngine, EngineContext, TelemetryRecord};
use arcade_advisor_types::{
    Action, ActionKind, ActionMetric, Analysis, AnalysisDetail, BlockBoard, BoardMatrix, Cell,
    GameKind, PieceKind, PlacementFeatures, Position, RiskLevel, Rotation,
};

use crate::pieces::{distinct_rotations, shape_width, PieceShape};

/// Number of placements suggested outright
const SUGGESTED_COUNT: usize = 3;

/// Number of further placements listed as alternatives
const ALTERNATIVE_COUNT: usize = 5;

/// Best score at which the score term of the confidence saturates
const CONFIDENCE_SCORE_SCALE: f64 = 20.0;

/// One resting position of the active piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rotation: Rotation,
    /// Leftmost column of the normalized shape
    pub column: i32,
    /// Top row of the normalized shape once it has landed
    pub row: i32,
    pub features: PlacementFeatures,
    pub score: f64,
}

fn collides(cells: &BoardMatrix<Cell>, shape: &PieceShape, column: i32, row: i32) -> bool {
    shape.iter().any(|&(dx, dy)| {
        let pos = Position::new(column + dx as i32, row + dy as i32);
        !matches!(cells.get(pos), Some(None))
    })
}

/// Resting row for `shape` dropped at `column`, or `None` when it does not fit at the top
pub fn drop_row(cells: &BoardMatrix<Cell>, shape: &PieceShape, column: i32) -> Option<i32> {
    if collides(cells, shape, column, 0) {
        return None;
    }
    let mut row = 0;
    while !collides(cells, shape, column, row + 1) {
        row += 1;
    }
    Some(row)
}

/// Per-column stack height: board height minus the first filled row
pub fn column_heights(cells: &BoardMatrix<Cell>) -> Vec<u32> {
    let height = cells.height();
    (0..cells.width())
        .map(|x| {
            (0..height)
                .find(|&y| matches!(cells.get(Position::new(x as i32, y as i32)), Some(Some(_))))
                .map_or(0, |y| (height - y) as u32)
        })
        .collect()
}

/// Heuristic terms of a board as it stands (full rows are counted, not removed)
pub fn board_features(cells: &BoardMatrix<Cell>) -> PlacementFeatures {
    let width = cells.width();
    let heights = column_heights(cells);

    let mut lines_cleared = 0;
    let mut completeness = 0.0;
    if width > 0 {
        for row in cells.rows() {
            let filled = row.iter().filter(|c| c.is_some()).count();
            if filled == width {
                lines_cleared += 1;
            }
            completeness += filled as f64 / width as f64;
        }
    }

    let mut holes = 0;
    for x in 0..width {
        let mut covered = false;
        for y in 0..cells.height() {
            match cells.get(Position::new(x as i32, y as i32)) {
                Some(Some(_)) => covered = true,
                Some(None) if covered => holes += 1,
                _ => {}
            }
        }
    }

    let bumpiness = heights
        .windows(2)
        .map(|w| w[0].abs_diff(w[1]))
        .sum();

    PlacementFeatures {
        lines_cleared,
        aggregate_height: heights.iter().sum(),
        holes,
        bumpiness,
        completeness,
    }
}

/// Every valid resting placement of `kind`, in rotation-then-column order
pub fn enumerate_placements(cells: &BoardMatrix<Cell>, kind: PieceKind) -> Vec<Placement> {
    let width = cells.width() as i32;
    let mut out = Vec::new();
    for (rotation, shape) in distinct_rotations(kind) {
        let last_column = width - shape_width(&shape);
        for column in 0..=last_column {
            let Some(row) = drop_row(cells, &shape, column) else {
                continue;
            };
            let mut after = cells.clone();
            for &(dx, dy) in &shape {
                after.set(
                    Position::new(column + dx as i32, row + dy as i32),
                    Some(kind),
                );
            }
            let features = board_features(&after);
            out.push(Placement {
                rotation,
                column,
                row,
                features,
                score: features.score(),
            });
        }
    }
    out
}

/// Placements sorted best first; ties keep enumeration order
pub fn rank_placements(cells: &BoardMatrix<Cell>, kind: PieceKind) -> Vec<Placement> {
    let mut placements = enumerate_placements(cells, kind);
    placements.sort_by(|a, b| b.score.total_cmp(&a.score));
    placements
}

/// Falling-block engine
pub struct PlacementEvaluator {
    ctx: EngineContext,
}

impl PlacementEvaluator {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self::with_context(EngineContext::new(GameKind::Tetris, config))
    }

    pub fn with_context(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    fn placement_action(kind: PieceKind, placement: &Placement, priority: i32) -> Action {
        let f = &placement.features;
        Action::new(
            ActionKind::Place {
                rotation: placement.rotation.index(),
                column: placement.column,
            },
            Some(Position::new(placement.column, placement.row)),
            priority,
            format!(
                "Place {} {} at column {}: {} line(s), {} hole(s), bumpiness {}",
                kind.as_str(),
                placement.rotation.as_str(),
                placement.column,
                f.lines_cleared,
                f.holes,
                f.bumpiness
            ),
        )
        .with_metric(ActionMetric::PlacementScore {
            score: placement.score,
        })
    }

    fn build_analysis(board: &BlockBoard, ranked: &[Placement]) -> Analysis {
        let height_ratio = if board.height() == 0 {
            0.0
        } else {
            let tallest = column_heights(&board.cells).into_iter().max().unwrap_or(0);
            tallest as f64 / board.height() as f64
        };

        let Some(best) = ranked.first() else {
            return Analysis::empty(
                GameKind::Tetris,
                RiskLevel::Critical,
                format!(
                    "The {} piece has no valid placement on this board.",
                    board.active.as_str()
                ),
            );
        };

        let suggested: Vec<Action> = ranked
            .iter()
            .take(SUGGESTED_COUNT)
            .enumerate()
            .map(|(i, p)| Self::placement_action(board.active, p, 10 - i as i32))
            .collect();
        let alternatives: Vec<Action> = ranked
            .iter()
            .skip(SUGGESTED_COUNT)
            .take(ALTERNATIVE_COUNT)
            .enumerate()
            .map(|(i, p)| Self::placement_action(board.active, p, 5 - i as i32))
            .collect();

        let mut confidence = 0.5 + 0.3 * (best.score / CONFIDENCE_SCORE_SCALE).clamp(0.0, 1.0)
            - 0.3 * height_ratio;
        if ranked.len() > SUGGESTED_COUNT {
            confidence += 0.1;
        }
        let confidence = confidence.clamp(0.0, 1.0);

        let risk = if height_ratio > 0.8 || best.score < -10.0 {
            RiskLevel::High
        } else if height_ratio > 0.6 || best.score < 0.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let f = &best.features;
        let reasoning = format!(
            "Evaluated {} placement(s) of the {} piece. Best: {} at column {} (score {:.1}: {} line(s), height {}, {} hole(s), bumpiness {}). Stack fills {:.0}% of the board height.",
            ranked.len(),
            board.active.as_str(),
            best.rotation.as_str(),
            best.column,
            best.score,
            f.lines_cleared,
            f.aggregate_height,
            f.holes,
            f.bumpiness,
            height_ratio * 100.0
        );

        Analysis {
            game: GameKind::Tetris,
            confidence,
            reasoning,
            suggested_actions: suggested,
            risk_assessment: risk,
            alternative_options: alternatives,
            detail: AnalysisDetail::Blocks {
                candidates_evaluated: ranked.len(),
                best: Some(best.features),
            },
        }
    }
}

impl Default for PlacementEvaluator {
    fn default() -> Self {
        Self::with_context(EngineContext::standalone(GameKind::Tetris))
    }
}

impl DecisionEngine for PlacementEvaluator {
    type Snapshot = BlockBoard;

    fn context(&self) -> &EngineContext {
        &self.ctx
    }

    fn analyze(&mut self, board: &BlockBoard) -> Analysis {
        let settings = self.ctx.settings();
        let ranked = rank_placements(&board.cells, board.active);
        let analysis = Self::build_analysis(board, &ranked);

        let mut record = TelemetryRecord::new(GameKind::Tetris)
            .with("rotations", distinct_rotations(board.active).len() as f64)
            .with("candidates", ranked.len() as f64);
        if let Some(best) = ranked.first() {
            record = record
                .with("best_score", best.score)
                .with("best_holes", best.features.holes)
                .with("best_lines", best.features.lines_cleared);
        }
        self.ctx.emit(&settings, record);

        self.ctx.store(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row_except(board: &mut BlockBoard, y: i32, gaps: &[i32]) {
        for x in 0..board.width() as i32 {
            if !gaps.contains(&x) {
                board.cells.set(Position::new(x, y), Some(PieceKind::O));
            }
        }
    }

    #[test]
    fn drop_row_rests_on_floor_and_stack() {
        let mut board = BlockBoard::new(PieceKind::O);
        let o = distinct_rotations(PieceKind::O)[0].1;
        assert_eq!(drop_row(&board.cells, &o, 0), Some(18));

        board.cells.set(Position::new(1, 10), Some(PieceKind::T));
        assert_eq!(drop_row(&board.cells, &o, 0), Some(8));
        assert_eq!(drop_row(&board.cells, &o, 2), Some(18));
    }

    #[test]
    fn blocked_top_row_has_no_resting_spot() {
        let mut board = BlockBoard::new(PieceKind::O);
        board.cells.set(Position::new(0, 0), Some(PieceKind::T));
        let o = distinct_rotations(PieceKind::O)[0].1;
        assert_eq!(drop_row(&board.cells, &o, 0), None);
        assert_eq!(drop_row(&board.cells, &o, 1), Some(18));
    }

    #[test]
    fn features_count_holes_and_bumpiness() {
        let mut cells: BoardMatrix<Cell> = BoardMatrix::new(3, 4, None);
        // Column 0: height 3 with one hole; column 2: height 1.
        cells.set(Position::new(0, 1), Some(PieceKind::I));
        cells.set(Position::new(0, 3), Some(PieceKind::I));
        cells.set(Position::new(2, 3), Some(PieceKind::I));

        let f = board_features(&cells);
        assert_eq!(f.aggregate_height, 4);
        assert_eq!(f.holes, 1);
        assert_eq!(f.bumpiness, 4);
        assert_eq!(f.lines_cleared, 0);
    }

    #[test]
    fn full_rows_count_before_collapse() {
        let mut board = BlockBoard::new(PieceKind::I);
        fill_row_except(&mut board, 19, &[0, 1, 2, 3]);
        let ranked = rank_placements(&board.cells, board.active);
        let best = ranked[0];
        assert_eq!(best.rotation, Rotation::North);
        assert_eq!(best.column, 0);
        assert_eq!(best.features.lines_cleared, 1);
    }

    #[test]
    fn o_piece_has_one_rotation_and_nine_columns() {
        let board = BlockBoard::new(PieceKind::O);
        assert_eq!(enumerate_placements(&board.cells, PieceKind::O).len(), 9);
        // I: 7 flat + 10 vertical
        assert_eq!(enumerate_placements(&board.cells, PieceKind::I).len(), 17);
    }

    #[test]
    fn priorities_follow_rank() {
        let mut engine = PlacementEvaluator::default();
        let analysis = engine.analyze(&BlockBoard::new(PieceKind::T));
        let priorities: Vec<i32> = analysis.suggested_actions.iter().map(|a| a.priority).collect();
        assert_eq!(priorities, vec![10, 9, 8]);
        let alt: Vec<i32> = analysis.alternative_options.iter().map(|a| a.priority).collect();
        assert_eq!(alt, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn board_too_narrow_is_critical() {
        let mut engine = PlacementEvaluator::default();
        let board = BlockBoard::with_size(3, 6, PieceKind::I);
        // Only the vertical I fits in three columns.
        assert_eq!(engine.analyze(&board).suggested_actions.len(), 3);

        let board = BlockBoard::with_size(0, 0, PieceKind::I);
        let analysis = engine.analyze(&board);
        assert!(analysis.suggested_actions.is_empty());
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.risk_assessment, RiskLevel::Critical);
    }

    #[test]
    fn tall_stack_raises_risk() {
        let mut board = BlockBoard::new(PieceKind::O);
        for y in 3..20 {
            fill_row_except(&mut board, y, &[y % 10]);
        }
        let mut engine = PlacementEvaluator::default();
        let analysis = engine.analyze(&board);
        assert_eq!(analysis.risk_assessment, RiskLevel::High);
    }
}
