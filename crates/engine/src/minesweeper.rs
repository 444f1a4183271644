//! Constraint solver for the mine-detection grid
//!
//! Each revealed clue becomes a constraint over its hidden, unflagged
//! neighbours. Small constraint sets are solved exactly by backtracking over
//! mine/safe assignments; larger ones fall back to a single approximate
//! assignment. Per-cell mine probability is the share of consistent
//! assignments that place a mine on the cell.

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;

use arcade_advisor_core::{ConfigProvider, DecisionEngine, EngineContext, TelemetryRecord};
use arcade_advisor_types::{
    Action, ActionKind, ActionMetric, Analysis, AnalysisDetail, GameKind, MineBoard, Position,
    RiskLevel,
};

/// Largest number of constrained cells solved by exhaustive enumeration
pub const MAX_EXACT_CELLS: usize = 15;

/// Enumeration stops after this many consistent assignments
pub const MAX_SOLUTIONS: usize = 1000;

/// Number of best guesses suggested when no cell is certain
const GUESS_COUNT: usize = 3;

/// Number of further guesses listed as alternatives
const ALTERNATIVE_GUESSES: usize = 5;

/// One revealed clue and the hidden cells it constrains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintGroup {
    pub clue: Position,
    /// Hidden, unflagged neighbours of the clue
    pub cells: Vec<Position>,
    pub flagged: usize,
    /// The number shown on the clue
    pub total: usize,
}

impl ConstraintGroup {
    /// Mines still to be placed among `cells`; negative on an over-flagged clue
    pub fn remaining(&self) -> i64 {
        self.total as i64 - self.flagged as i64
    }
}

/// Everything the solver derived from one board
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub constraints: Vec<ConstraintGroup>,
    /// Cells touched by at least one constraint, in order of first appearance
    pub variables: Vec<Position>,
    /// Consistent assignments over `variables` (`true` = mine)
    pub solutions: Vec<Vec<bool>>,
    pub approximate: bool,
    /// Every unknown cell in row-major order
    pub probabilities: Vec<(Position, f64)>,
}

/// Build one constraint per revealed, non-mine cell that still has hidden neighbours
pub fn extract_constraints(board: &MineBoard) -> Vec<ConstraintGroup> {
    board
        .positions()
        .filter(|p| board.is_revealed(*p) && !board.is_mine(*p))
        .filter_map(|clue| {
            let mut cells = Vec::new();
            let mut flagged = 0;
            for n in clue.neighbors8().filter(|n| board.in_bounds(*n)) {
                if board.is_flagged(n) {
                    flagged += 1;
                } else if !board.is_revealed(n) {
                    cells.push(n);
                }
            }
            if cells.is_empty() {
                return None;
            }
            Some(ConstraintGroup {
                clue,
                cells,
                flagged,
                total: board.adjacent_mines(clue),
            })
        })
        .collect()
}

struct IndexedConstraint {
    vars: Vec<usize>,
    required: i64,
}

impl IndexedConstraint {
    fn satisfied_by(&self, assignment: &[bool]) -> bool {
        let mines = self.vars.iter().filter(|&&v| assignment[v]).count() as i64;
        mines == self.required
    }
}

/// Backtracking search; variables are assigned in index order, safe before mine.
struct Enumerator<'a> {
    constraints: &'a [IndexedConstraint],
    by_var: Vec<Vec<usize>>,
    assignment: Vec<bool>,
    solutions: Vec<Vec<bool>>,
    nodes: usize,
}

impl<'a> Enumerator<'a> {
    fn new(var_count: usize, constraints: &'a [IndexedConstraint]) -> Self {
        let mut by_var = vec![Vec::new(); var_count];
        for (ci, c) in constraints.iter().enumerate() {
            for &v in &c.vars {
                by_var[v].push(ci);
            }
        }
        Self {
            constraints,
            by_var,
            assignment: vec![false; var_count],
            solutions: Vec::new(),
            nodes: 0,
        }
    }

    /// A constraint touching `var` can still be met given vars `0..=var` are fixed
    fn feasible_after(&self, var: usize) -> bool {
        self.by_var[var].iter().all(|&ci| {
            let c = &self.constraints[ci];
            let mut mines = 0i64;
            let mut open = 0i64;
            for &v in &c.vars {
                if v > var {
                    open += 1;
                } else if self.assignment[v] {
                    mines += 1;
                }
            }
            mines <= c.required && mines + open >= c.required
        })
    }

    fn run(&mut self, var: usize) {
        if self.solutions.len() >= MAX_SOLUTIONS {
            return;
        }
        self.nodes += 1;
        if var == self.assignment.len() {
            if self
                .constraints
                .iter()
                .all(|c| c.satisfied_by(&self.assignment))
            {
                self.solutions.push(self.assignment.clone());
            }
            return;
        }
        for value in [false, true] {
            self.assignment[var] = value;
            if self.feasible_after(var) {
                self.run(var + 1);
            }
        }
        self.assignment[var] = false;
    }
}

/// Single approximate assignment: a cell is a mine when the average mine
/// density of the constraints around it exceeds one half.
fn approximate_assignment(var_count: usize, constraints: &[IndexedConstraint]) -> Vec<bool> {
    let mut sum = vec![0.0f64; var_count];
    let mut touches = vec![0usize; var_count];
    for c in constraints {
        let ratio = c.required as f64 / c.vars.len() as f64;
        for &v in &c.vars {
            sum[v] += ratio;
            touches[v] += 1;
        }
    }
    sum.iter()
        .zip(&touches)
        .map(|(s, &t)| t > 0 && s / t as f64 > 0.5)
        .collect()
}

/// Run constraint extraction, enumeration (or approximation) and probability
/// estimation for `board`.
pub fn solve(board: &MineBoard) -> SolveReport {
    let constraints = extract_constraints(board);

    let mut variables: Vec<Position> = Vec::new();
    let mut index: HashMap<Position, usize> = HashMap::new();
    for group in &constraints {
        for &cell in &group.cells {
            index.entry(cell).or_insert_with(|| {
                variables.push(cell);
                variables.len() - 1
            });
        }
    }

    let indexed: Vec<IndexedConstraint> = constraints
        .iter()
        .map(|g| IndexedConstraint {
            vars: g.cells.iter().map(|c| index[c]).collect(),
            required: g.remaining(),
        })
        .collect();

    let approximate = variables.len() > MAX_EXACT_CELLS;
    let solutions = if approximate {
        vec![approximate_assignment(variables.len(), &indexed)]
    } else {
        let mut search = Enumerator::new(variables.len(), &indexed);
        search.run(0);
        trace!(
            "mine enumeration: {} vars, {} nodes, {} solutions",
            variables.len(),
            search.nodes,
            search.solutions.len()
        );
        search.solutions
    };

    let unknown: Vec<Position> = board.positions().filter(|p| board.is_unknown(*p)).collect();
    let remaining_mines = board.total_mines() as f64 - board.flagged_count() as f64;
    let board_wide = if unknown.is_empty() {
        0.0
    } else {
        (remaining_mines / unknown.len() as f64).clamp(0.0, 1.0)
    };

    let mut mine_counts = vec![0usize; variables.len()];
    for solution in &solutions {
        for (count, &is_mine) in mine_counts.iter_mut().zip(solution) {
            if is_mine {
                *count += 1;
            }
        }
    }

    let probabilities = unknown
        .iter()
        .map(|&cell| {
            let p = match index.get(&cell) {
                // An inconsistent clue set has no solutions; fall back to the global density.
                Some(&v) if !solutions.is_empty() => {
                    mine_counts[v] as f64 / solutions.len() as f64
                }
                _ => board_wide,
            };
            (cell, p)
        })
        .collect();

    SolveReport {
        constraints,
        variables,
        solutions,
        approximate,
        probabilities,
    }
}

/// Mine-grid engine
pub struct MineSolver {
    ctx: EngineContext,
}

impl MineSolver {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self::with_context(EngineContext::new(GameKind::Minesweeper, config))
    }

    pub fn with_context(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    fn build_analysis(board: &MineBoard, report: &SolveReport) -> Analysis {
        let probs = &report.probabilities;
        let total_cells = board.width() * board.height();
        let revealed_fraction = if total_cells == 0 {
            0.0
        } else {
            board.revealed_count() as f64 / total_cells as f64
        };
        let min_prob = probs.iter().map(|(_, p)| *p).fold(f64::INFINITY, f64::min);

        let detail = AnalysisDetail::Mines {
            probabilities: probs.clone(),
            constrained_cells: report.variables.len(),
            solutions: report.solutions.len(),
            approximate: report.approximate,
        };

        let safe: Vec<Position> = probs
            .iter()
            .filter(|(_, p)| *p == 0.0)
            .map(|(c, _)| *c)
            .collect();
        let mines: Vec<Position> = probs
            .iter()
            .filter(|(_, p)| *p == 1.0)
            .map(|(c, _)| *c)
            .collect();

        let risk = if !safe.is_empty() {
            RiskLevel::Low
        } else if min_prob < 0.3 || revealed_fraction < 0.2 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };

        if probs.is_empty() {
            let mut analysis =
                Analysis::empty(GameKind::Minesweeper, risk, "No unknown cells remain to analyze.");
            analysis.detail = detail;
            return analysis;
        }

        let mut suggested = Vec::new();
        let mut alternatives = Vec::new();

        let estimated = report.approximate;
        let metric = |probability: f64| ActionMetric::MineProbability {
            probability,
            estimated,
        };
        let (safe_text, mine_text) = if estimated {
            ("estimated safe by clue density", "estimated mine by clue density")
        } else {
            ("safe in every consistent layout", "a mine in every consistent layout")
        };

        for (i, &cell) in safe.iter().enumerate() {
            suggested.push(
                Action::new(
                    ActionKind::Reveal,
                    Some(cell),
                    10 - i as i32,
                    format!("Reveal {}: {}", cell, safe_text),
                )
                .with_metric(metric(0.0)),
            );
        }
        for (i, &cell) in mines.iter().enumerate() {
            suggested.push(
                Action::new(
                    ActionKind::Flag,
                    Some(cell),
                    9 - i as i32,
                    format!("Flag {}: {}", cell, mine_text),
                )
                .with_metric(metric(1.0)),
            );
        }

        let (confidence, reasoning) = if !safe.is_empty() || !mines.is_empty() {
            // Stable: safe cells stay ahead of mines at equal priority.
            suggested.sort_by_key(|a| std::cmp::Reverse(a.priority));
            let confidence = if safe.is_empty() { 0.9 } else { 1.0 };
            (
                confidence,
                format!(
                    "Found {} safe cell(s) and {} certain mine(s) from {} clue(s) over {} cell(s).",
                    safe.len(),
                    mines.len(),
                    report.constraints.len(),
                    report.variables.len()
                ),
            )
        } else {
            let mut ranked: Vec<(Position, f64)> = probs.clone();
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
            for (i, &(cell, p)) in ranked.iter().take(GUESS_COUNT).enumerate() {
                suggested.push(
                    Action::new(
                        ActionKind::Reveal,
                        Some(cell),
                        5 - i as i32,
                        format!("Guess {}: {:.1}% mine probability", cell, p * 100.0),
                    )
                    .with_metric(metric(p)),
                );
            }
            for (i, &(cell, p)) in ranked
                .iter()
                .skip(GUESS_COUNT)
                .take(ALTERNATIVE_GUESSES)
                .enumerate()
            {
                alternatives.push(
                    Action::new(
                        ActionKind::Reveal,
                        Some(cell),
                        2 - i as i32,
                        format!("Guess {}: {:.1}% mine probability", cell, p * 100.0),
                    )
                    .with_metric(metric(p)),
                );
            }
            let (best, p) = ranked[0];
            (
                (1.0 - min_prob).max(0.1),
                format!(
                    "No cell is certain. Best guess {} has a {:.1}% mine probability.",
                    best,
                    p * 100.0
                ),
            )
        };

        let reasoning = if report.approximate {
            format!(
                "{} Too many constrained cells ({}) for exact enumeration; probabilities are a heuristic approximation.",
                reasoning,
                report.variables.len()
            )
        } else if report.solutions.len() >= MAX_SOLUTIONS {
            format!(
                "{} Enumeration stopped at {} layouts, so probabilities come from a partial sample that favours early cells being safe.",
                reasoning, MAX_SOLUTIONS
            )
        } else {
            reasoning
        };

        Analysis {
            game: GameKind::Minesweeper,
            confidence,
            reasoning,
            suggested_actions: suggested,
            risk_assessment: risk,
            alternative_options: alternatives,
            detail,
        }
    }
}

impl Default for MineSolver {
    fn default() -> Self {
        Self::with_context(EngineContext::standalone(GameKind::Minesweeper))
    }
}

impl DecisionEngine for MineSolver {
    type Snapshot = MineBoard;

    fn context(&self) -> &EngineContext {
        &self.ctx
    }

    fn analyze(&mut self, board: &MineBoard) -> Analysis {
        let settings = self.ctx.settings();
        let report = solve(board);
        let analysis = Self::build_analysis(board, &report);

        let safe = report
            .probabilities
            .iter()
            .filter(|(_, p)| *p == 0.0)
            .count();
        self.ctx.emit(
            &settings,
            TelemetryRecord::new(GameKind::Minesweeper)
                .with("constraints", report.constraints.len() as f64)
                .with("constrained_cells", report.variables.len() as f64)
                .with("solutions", report.solutions.len() as f64)
                .with("unknown_cells", report.probabilities.len() as f64)
                .with("approximate", if report.approximate { 1.0 } else { 0.0 })
                .with("safe_cells", safe as f64),
        );

        self.ctx.store(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(
        width: usize,
        height: usize,
        mines: &[(i32, i32)],
        revealed: &[(i32, i32)],
    ) -> MineBoard {
        let mut board = MineBoard::new(
            width,
            height,
            mines.iter().map(|&(x, y)| Position::new(x, y)).collect(),
        );
        for &(x, y) in revealed {
            board.reveal(Position::new(x, y));
        }
        board
    }

    #[test]
    fn constraint_counts_flags_and_unknowns() {
        let mut board = board_with(3, 3, &[(0, 0), (2, 0)], &[(1, 1)]);
        board.set_flag(Position::new(0, 0), true);

        let groups = extract_constraints(&board);
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.clue, Position::new(1, 1));
        assert_eq!(g.total, 2);
        assert_eq!(g.flagged, 1);
        assert_eq!(g.cells.len(), 7);
        assert_eq!(g.remaining(), 1);
    }

    #[test]
    fn one_two_pattern_pins_down_mines() {
        // Row 0 hidden, row 1 revealed: three 1-clues over a single mine at (1, 0).
        let board = board_with(3, 2, &[(1, 0)], &[(0, 1), (1, 1), (2, 1)]);
        let report = solve(&board);

        assert_eq!(report.variables.len(), 3);
        assert_eq!(report.solutions, vec![vec![false, true, false]]);
        assert!(!report.approximate);
    }

    #[test]
    fn empty_constraint_set_has_one_trivial_solution() {
        let board = board_with(4, 4, &[(3, 3)], &[]);
        let report = solve(&board);
        assert!(report.variables.is_empty());
        assert_eq!(report.solutions, vec![Vec::<bool>::new()]);
        // 1 mine over 16 unknown cells.
        assert!(report.probabilities.iter().all(|(_, p)| *p == 1.0 / 16.0));
    }

    #[test]
    fn enumeration_is_capped() {
        let constraints: Vec<IndexedConstraint> = (0..5)
            .map(|i| IndexedConstraint {
                vars: vec![i * 3, i * 3 + 1, i * 3 + 2],
                required: 1,
            })
            .collect();
        let mut search = Enumerator::new(15, &constraints);
        search.run(0);
        // 3^5 = 243 layouts, below the cap.
        assert_eq!(search.solutions.len(), 243);

        let loose: Vec<IndexedConstraint> = vec![IndexedConstraint {
            vars: (0..15).collect(),
            required: 7,
        }];
        let mut search = Enumerator::new(15, &loose);
        search.run(0);
        assert_eq!(search.solutions.len(), MAX_SOLUTIONS);
    }

    #[test]
    fn approximation_thresholds_on_average_density() {
        let constraints = vec![
            IndexedConstraint {
                vars: vec![0, 1],
                required: 2,
            },
            IndexedConstraint {
                vars: vec![1, 2, 3, 4],
                required: 1,
            },
        ];
        // var 0: 1.0; var 1: (1.0 + 0.25) / 2 = 0.625; vars 2..4: 0.25
        assert_eq!(
            approximate_assignment(5, &constraints),
            vec![true, true, false, false, false]
        );
    }

    #[test]
    fn guesses_when_nothing_is_certain() {
        // 50/50 between (0, 0) and (1, 0) behind the clue at (0, 1).
        let board = board_with(2, 3, &[(0, 0)], &[(0, 1), (1, 1), (0, 2), (1, 2)]);
        let mut solver = MineSolver::default();
        let analysis = solver.analyze(&board);

        assert_eq!(analysis.suggested_actions.len(), 2);
        assert_eq!(analysis.suggested_actions[0].priority, 5);
        assert_eq!(analysis.suggested_actions[1].priority, 4);
        assert_eq!(analysis.confidence, 0.5);
        // Revealed fraction 4/6 and min probability 0.5.
        assert_eq!(analysis.risk_assessment, RiskLevel::High);
    }

    #[test]
    fn certain_mines_only_gives_point_nine() {
        let board = board_with(2, 1, &[(0, 0)], &[(1, 0)]);
        let mut solver = MineSolver::default();
        let analysis = solver.analyze(&board);
        assert_eq!(analysis.suggested_actions.len(), 1);
        assert_eq!(analysis.suggested_actions[0].kind, ActionKind::Flag);
        assert_eq!(analysis.suggested_actions[0].priority, 9);
        assert_eq!(analysis.confidence, 0.9);
    }

    #[test]
    fn solved_board_yields_empty_analysis() {
        let mut board = board_with(2, 1, &[(0, 0)], &[(1, 0)]);
        board.set_flag(Position::new(0, 0), true);
        let mut solver = MineSolver::default();
        let analysis = solver.analyze(&board);
        assert!(analysis.suggested_actions.is_empty());
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn zero_size_board_does_not_panic() {
        let board = MineBoard::new(0, 0, Vec::new());
        let mut solver = MineSolver::default();
        let analysis = solver.analyze(&board);
        assert!(analysis.suggested_actions.is_empty());
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.risk_assessment, RiskLevel::Medium);
    }

    /// `width` x 2 board: row 1 revealed, mines at every third cell of row 0,
    /// so the row-1 clues constrain exactly `width` cells.
    fn clue_strip(width: usize) -> MineBoard {
        let mines: Vec<(i32, i32)> = (0..width as i32).step_by(3).map(|x| (x, 0)).collect();
        let revealed: Vec<(i32, i32)> = (0..width as i32).map(|x| (x, 1)).collect();
        board_with(width, 2, &mines, &revealed)
    }

    #[test]
    fn fifteen_cells_are_enumerated_exactly() {
        let report = solve(&clue_strip(15));
        assert_eq!(report.variables.len(), MAX_EXACT_CELLS);
        assert!(!report.approximate);
        assert_eq!(report.solutions.len(), 1);
        let prob = |x| {
            report
                .probabilities
                .iter()
                .find(|(p, _)| *p == Position::new(x, 0))
                .map(|(_, p)| *p)
        };
        assert_eq!(prob(0), Some(1.0));
        assert_eq!(prob(1), Some(0.0));
    }

    #[test]
    fn sixteen_cells_fall_back_to_the_heuristic() {
        let board = clue_strip(16);
        let report = solve(&board);
        assert_eq!(report.variables.len(), MAX_EXACT_CELLS + 1);
        assert!(report.approximate);
        assert_eq!(report.solutions.len(), 1);

        let mut solver = MineSolver::default();
        let analysis = solver.analyze(&board);
        assert!(analysis.reasoning.contains("heuristic approximation"));
        assert_eq!(analysis.detail.mine_probability(Position::new(0, 0)), Some(0.0));

        let best = analysis.best_action().unwrap();
        assert!(best.description.contains("estimated safe by clue density"));
        assert!(matches!(
            best.metric,
            Some(ActionMetric::MineProbability {
                estimated: true,
                ..
            })
        ));
        assert!(analysis
            .suggested_actions
            .iter()
            .all(|a| !a.description.contains("every consistent layout")));
    }

    #[test]
    fn capped_enumeration_is_called_a_sample() {
        // Two 4-clues over 8 cells each, sharing (2, 2): 15 cells, over 1000 layouts.
        let board = board_with(
            5,
            5,
            &[
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (4, 4),
                (3, 4),
                (2, 4),
                (4, 3),
            ],
            &[(1, 1), (3, 3)],
        );
        let report = solve(&board);
        assert_eq!(report.variables.len(), 15);
        assert!(!report.approximate);
        assert_eq!(report.solutions.len(), MAX_SOLUTIONS);

        let analysis = MineSolver::default().analyze(&board);
        assert!(analysis.reasoning.contains("partial sample"));
    }
}
