//! Engine outputs: ranked actions, the analysis that carries them, and the
//! suggestion/hint shapes derived from an analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Direction, Position};

/// Which game an engine (or a result) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Minesweeper,
    Snake,
    Tetris,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Minesweeper => "minesweeper",
            GameKind::Snake => "snake",
            GameKind::Tetris => "tetris",
        }
    }
}

/// Ordinal danger summary of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an action asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionKind {
    /// Null-action sentinel: nothing to suggest
    None,
    Reveal,
    Flag,
    Move { direction: Direction },
    Place { rotation: u8, column: i32 },
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::None => "none",
            ActionKind::Reveal => "reveal",
            ActionKind::Flag => "flag",
            ActionKind::Move { .. } => "move",
            ActionKind::Place { .. } => "place",
        }
    }
}

/// The number an engine ranked an action by, quoted in explanations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionMetric {
    /// `estimated` is set when the probability comes from the single
    /// clue-density assignment rather than full enumeration
    MineProbability {
        probability: f64,
        #[serde(default)]
        estimated: bool,
    },
    OpenSpace { cells: usize, path_len: Option<usize> },
    PlacementScore { score: f64 },
}

/// A ranked, immutable recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub target: Option<Position>,
    /// Higher is preferred
    pub priority: i32,
    pub description: String,
    pub metric: Option<ActionMetric>,
}

impl Action {
    pub fn new(
        kind: ActionKind,
        target: Option<Position>,
        priority: i32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            target,
            priority,
            description: description.into(),
            metric: None,
        }
    }

    pub fn with_metric(mut self, metric: ActionMetric) -> Self {
        self.metric = Some(metric);
        self
    }

    /// The sentinel returned when no action is available
    pub fn none() -> Self {
        Self::new(ActionKind::None, None, 0, "No action available")
    }

    pub fn is_none(&self) -> bool {
        self.kind == ActionKind::None
    }
}

/// Heuristic terms of one simulated placement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementFeatures {
    pub lines_cleared: u32,
    pub aggregate_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
    pub completeness: f64,
}

impl PlacementFeatures {
    pub const LINES_WEIGHT: f64 = 10.0;
    pub const HEIGHT_WEIGHT: f64 = -0.5;
    pub const HOLES_WEIGHT: f64 = -3.0;
    pub const BUMPINESS_WEIGHT: f64 = -0.2;
    pub const COMPLETENESS_WEIGHT: f64 = 2.0;

    /// Fixed linear weighting of the terms
    pub fn score(&self) -> f64 {
        Self::LINES_WEIGHT * self.lines_cleared as f64
            + Self::HEIGHT_WEIGHT * self.aggregate_height as f64
            + Self::HOLES_WEIGHT * self.holes as f64
            + Self::BUMPINESS_WEIGHT * self.bumpiness as f64
            + Self::COMPLETENESS_WEIGHT * self.completeness
    }
}

/// Engine-specific findings kept alongside the generic analysis fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisDetail {
    Empty,
    Mines {
        /// Every unknown cell in row-major order
        probabilities: Vec<(Position, f64)>,
        constrained_cells: usize,
        solutions: usize,
        /// True when the heuristic fallback replaced exhaustive enumeration
        approximate: bool,
    },
    Snake {
        path_to_food: Option<Vec<Position>>,
        safe_moves: Vec<Direction>,
    },
    Blocks {
        candidates_evaluated: usize,
        best: Option<PlacementFeatures>,
    },
}

impl AnalysisDetail {
    /// Probability recorded for `pos`, if the detail is a mine analysis
    pub fn mine_probability(&self, pos: Position) -> Option<f64> {
        match self {
            AnalysisDetail::Mines { probabilities, .. } => probabilities
                .iter()
                .find(|(p, _)| *p == pos)
                .map(|(_, prob)| *prob),
            _ => None,
        }
    }

    pub fn path_to_food(&self) -> Option<&[Position]> {
        match self {
            AnalysisDetail::Snake { path_to_food, .. } => path_to_food.as_deref(),
            _ => None,
        }
    }
}

/// Result of one `analyze` call; superseded by the next one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub game: GameKind,
    /// In `[0, 1]`
    pub confidence: f64,
    pub reasoning: String,
    /// Ordered by descending priority
    pub suggested_actions: Vec<Action>,
    pub risk_assessment: RiskLevel,
    pub alternative_options: Vec<Action>,
    pub detail: AnalysisDetail,
}

impl Analysis {
    /// Degenerate result: nothing to suggest, zero confidence
    pub fn empty(game: GameKind, risk: RiskLevel, reasoning: impl Into<String>) -> Self {
        Self {
            game,
            confidence: 0.0,
            reasoning: reasoning.into(),
            suggested_actions: Vec::new(),
            risk_assessment: risk,
            alternative_options: Vec::new(),
            detail: AnalysisDetail::Empty,
        }
    }

    pub fn best_action(&self) -> Option<&Action> {
        self.suggested_actions.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub action: Action,
    pub confidence: f64,
    pub explanation: String,
}

impl Suggestion {
    pub fn none(explanation: impl Into<String>) -> Self {
        Self {
            action: Action::none(),
            confidence: 0.0,
            explanation: explanation.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hint {
    pub message: String,
    /// Cells a presentation layer may highlight
    pub indicators: Vec<Position>,
    pub confidence: Option<f64>,
    pub detail: Option<String>,
}
