//! Path planning for the movement grid
//!
//! The tail cell is not an obstacle because it moves away on the next step,
//! unless the head lands on food, in which case the body grows and the tail
//! stays put.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use arrayvec::ArrayVec;
use log::trace;
use rand::seq::IndexedRandom;
use rand::Rng;

use arcade_advisor_core::{ConfigProvider, DecisionEngine, EngineContext, TelemetryRecord};
use arcade_advisor_types::{
    Action, ActionKind, ActionMetric, Analysis, AnalysisDetail, Direction, GameKind, Position,
    RiskLevel, SnakeBoard,
};

/// Flood fill stops after visiting this many cells
pub const FLOOD_FILL_CAP: usize = 50;

/// Strategic food must sit this far (Manhattan) from the head
pub const STRATEGIC_DISTANCE: std::ops::RangeInclusive<u32> = 3..=8;

/// Depth limit of the path count used to qualify strategic food cells
pub const STRATEGIC_PATH_DEPTH: u32 = 3;

/// Why a candidate move is unsafe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveHazard {
    Wall,
    Body,
}

impl MoveHazard {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveHazard::Wall => "wall",
            MoveHazard::Body => "body",
        }
    }
}

/// Cell is outside the grid or occupied on the next step. `goal` is the
/// cell the head is heading for; reaching it keeps the tail in place.
fn is_blocked(board: &SnakeBoard, pos: Position, goal: Position) -> bool {
    !board.in_bounds(pos)
        || board.is_body_obstacle(pos)
        || (pos == goal && board.body.contains(&pos))
}

/// Every direction except the reverse of the current heading, in `Direction::ALL` order
pub fn candidate_moves(board: &SnakeBoard) -> ArrayVec<Direction, 4> {
    let reverse = board.direction.opposite();
    Direction::ALL
        .into_iter()
        .filter(|d| *d != reverse)
        .collect()
}

/// What moving the head in `dir` would hit, if anything
pub fn move_hazard(board: &SnakeBoard, dir: Direction) -> Option<MoveHazard> {
    let head = board.head()?;
    let next = head.step(dir);
    if !board.in_bounds(next) {
        Some(MoveHazard::Wall)
    } else if is_blocked(board, next, board.food) {
        Some(MoveHazard::Body)
    } else {
        None
    }
}

pub fn safe_moves(board: &SnakeBoard) -> ArrayVec<Direction, 4> {
    if board.head().is_none() {
        return ArrayVec::new();
    }
    candidate_moves(board)
        .into_iter()
        .filter(|d| move_hazard(board, *d).is_none())
        .collect()
}

/// A* result plus the number of nodes taken off the open set
struct Search {
    path: Option<Vec<Position>>,
    expanded: usize,
}

fn astar(board: &SnakeBoard, goal: Position) -> Search {
    let Some(start) = board.head() else {
        return Search {
            path: None,
            expanded: 0,
        };
    };

    let mut open: Vec<Position> = vec![start];
    let mut closed: HashSet<Position> = HashSet::new();
    let mut g: HashMap<Position, u32> = HashMap::from([(start, 0)]);
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut expanded = 0;

    while !open.is_empty() {
        // First minimum in insertion order wins.
        let mut best = 0;
        let mut best_f = u32::MAX;
        for (i, p) in open.iter().enumerate() {
            let f = g[p] + p.manhattan(goal);
            if f < best_f {
                best = i;
                best_f = f;
            }
        }
        let current = open.remove(best);
        expanded += 1;

        if current == goal {
            let mut path = vec![current];
            let mut at = current;
            while let Some(&prev) = came_from.get(&at) {
                if prev == start {
                    break;
                }
                path.push(prev);
                at = prev;
            }
            path.reverse();
            if goal == start {
                path.clear();
            }
            return Search {
                path: Some(path),
                expanded,
            };
        }
        closed.insert(current);

        let tentative = g[&current] + 1;
        for dir in Direction::ALL {
            let next = current.step(dir);
            if closed.contains(&next) || is_blocked(board, next, goal) {
                continue;
            }
            if open.contains(&next) {
                if tentative >= g[&next] {
                    continue;
                }
            } else {
                open.push(next);
            }
            came_from.insert(next, current);
            g.insert(next, tentative);
        }
    }

    trace!("a*: no path from {} to {} after {} nodes", start, goal, expanded);
    Search {
        path: None,
        expanded,
    }
}

/// Shortest path from the head to `goal`, head excluded, goal included.
/// An empty path means the head already sits on the goal.
pub fn find_path(board: &SnakeBoard, goal: Position) -> Option<Vec<Position>> {
    astar(board, goal).path
}

/// Open cells reachable from `start`, breadth first, capped at [`FLOOD_FILL_CAP`]
pub fn flood_fill(board: &SnakeBoard, start: Position) -> usize {
    if !board.in_bounds(start) || board.is_body_obstacle(start) {
        return 0;
    }
    let mut seen: HashSet<Position> = HashSet::from([start]);
    let mut queue: VecDeque<Position> = VecDeque::from([start]);
    let mut visited = 0;
    while let Some(pos) = queue.pop_front() {
        visited += 1;
        if visited >= FLOOD_FILL_CAP {
            break;
        }
        for dir in Direction::ALL {
            let next = pos.step(dir);
            if board.in_bounds(next) && !board.is_body_obstacle(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}

/// Number of simple paths of at most `depth` steps from `from` to `to`,
/// stopping once it exceeds `limit`
fn count_paths(
    board: &SnakeBoard,
    from: Position,
    to: Position,
    depth: u32,
    limit: usize,
    visited: &mut Vec<Position>,
) -> usize {
    if from == to {
        return 1;
    }
    if depth == 0 {
        return 0;
    }
    let mut total = 0;
    for dir in Direction::ALL {
        let next = from.step(dir);
        if visited.contains(&next) || is_blocked(board, next, to) {
            continue;
        }
        visited.push(next);
        total += count_paths(board, next, to, depth - 1, limit - total, visited);
        visited.pop();
        if total > limit {
            break;
        }
    }
    total
}

fn is_empty_cell(board: &SnakeBoard, pos: Position) -> bool {
    pos != board.food && !board.body.contains(&pos)
}

/// Cells that qualify as challenging food spots: 3 to 8 steps from the head
/// and reachable by only one or two short paths
pub fn strategic_food_cells(board: &SnakeBoard) -> Vec<Position> {
    let Some(head) = board.head() else {
        return Vec::new();
    };
    (0..board.height)
        .flat_map(|y| (0..board.width).map(move |x| Position::new(x, y)))
        .filter(|&pos| is_empty_cell(board, pos))
        .filter(|&pos| STRATEGIC_DISTANCE.contains(&head.manhattan(pos)))
        .filter(|&pos| {
            let mut visited = vec![head];
            let paths = count_paths(board, head, pos, STRATEGIC_PATH_DEPTH, 2, &mut visited);
            (1..=2).contains(&paths)
        })
        .collect()
}

/// Pick a challenging food cell at random, or any empty cell when none
/// qualifies. `None` only when the grid is full.
pub fn place_strategic_food<R: Rng + ?Sized>(board: &SnakeBoard, rng: &mut R) -> Option<Position> {
    let qualified = strategic_food_cells(board);
    if let Some(&pos) = qualified.choose(rng) {
        return Some(pos);
    }
    place_random_food(board, rng)
}

/// Any empty cell, uniformly
pub fn place_random_food<R: Rng + ?Sized>(board: &SnakeBoard, rng: &mut R) -> Option<Position> {
    let empty: Vec<Position> = (0..board.height)
        .flat_map(|y| (0..board.width).map(move |x| Position::new(x, y)))
        .filter(|&pos| is_empty_cell(board, pos))
        .collect();
    empty.choose(rng).copied()
}

/// Movement-grid engine
pub struct SnakePlanner {
    ctx: EngineContext,
}

impl SnakePlanner {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self::with_context(EngineContext::new(GameKind::Snake, config))
    }

    pub fn with_context(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Next food cell: strategic in challenge mode, uniform otherwise.
    /// Randomness comes from the caller's `rng`.
    pub fn place_food<R: Rng + ?Sized>(&self, board: &SnakeBoard, rng: &mut R) -> Option<Position> {
        if self.ctx.settings().challenge_mode {
            place_strategic_food(board, rng)
        } else {
            place_random_food(board, rng)
        }
    }

    fn build_analysis(board: &SnakeBoard, search: &Search) -> Analysis {
        let Some(head) = board.head() else {
            return Analysis::empty(
                GameKind::Snake,
                RiskLevel::Critical,
                "The snake has no body to plan from.",
            );
        };

        let safe = safe_moves(board);
        let path = search.path.as_ref();
        let path_step = path
            .and_then(|p| p.first())
            .and_then(|&first| Direction::between(head, first))
            .filter(|d| safe.contains(d));

        let mut ranked: Vec<(Action, usize)> = safe
            .iter()
            .enumerate()
            .map(|(i, &dir)| {
                let space = flood_fill(board, head.step(dir));
                let action = if Some(dir) == path_step {
                    let steps = path.map_or(0, Vec::len);
                    Action::new(
                        ActionKind::Move { direction: dir },
                        Some(head.step(dir)),
                        10,
                        format!(
                            "Move {} toward the food ({} step(s) away, {} open cell(s))",
                            dir.as_str(),
                            steps,
                            space
                        ),
                    )
                    .with_metric(ActionMetric::OpenSpace {
                        cells: space,
                        path_len: Some(steps),
                    })
                } else {
                    let base = if path.is_some() { 5 } else { 8 };
                    Action::new(
                        ActionKind::Move { direction: dir },
                        Some(head.step(dir)),
                        base - i as i32,
                        format!("Move {}: {} open cell(s) reachable", dir.as_str(), space),
                    )
                    .with_metric(ActionMetric::OpenSpace {
                        cells: space,
                        path_len: None,
                    })
                };
                (action, space)
            })
            .collect();
        ranked.sort_by(|a, b| b.0.priority.cmp(&a.0.priority).then(b.1.cmp(&a.1)));
        let suggested: Vec<Action> = ranked.into_iter().map(|(a, _)| a).collect();

        let alternatives: Vec<Action> = candidate_moves(board)
            .into_iter()
            .filter_map(|dir| {
                let hazard = move_hazard(board, dir)?;
                Some(Action::new(
                    ActionKind::Move { direction: dir },
                    Some(head.step(dir)),
                    0,
                    format!("Moving {} hits the {}", dir.as_str(), hazard.as_str()),
                ))
            })
            .collect();

        let detail = AnalysisDetail::Snake {
            path_to_food: search.path.clone(),
            safe_moves: safe.to_vec(),
        };

        let path_text = match path {
            Some(p) => format!("Food at {} is {} step(s) away.", board.food, p.len()),
            None => format!("No path to the food at {} exists.", board.food),
        };

        if safe.is_empty() {
            let mut analysis = Analysis::empty(
                GameKind::Snake,
                RiskLevel::Critical,
                format!("{} Every move leads into a wall or the body.", path_text),
            );
            analysis.alternative_options = alternatives;
            analysis.detail = detail;
            return analysis;
        }

        let confidence =
            (0.5 + 0.15 * safe.len() as f64 + if path.is_some() { 0.3 } else { 0.0 }).min(1.0);
        let risk = match safe.len() {
            1 => RiskLevel::High,
            2 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        };

        Analysis {
            game: GameKind::Snake,
            confidence,
            reasoning: format!("{} {} safe move(s) available.", path_text, safe.len()),
            suggested_actions: suggested,
            risk_assessment: risk,
            alternative_options: alternatives,
            detail,
        }
    }
}

impl Default for SnakePlanner {
    fn default() -> Self {
        Self::with_context(EngineContext::standalone(GameKind::Snake))
    }
}

impl DecisionEngine for SnakePlanner {
    type Snapshot = SnakeBoard;

    fn context(&self) -> &EngineContext {
        &self.ctx
    }

    fn analyze(&mut self, board: &SnakeBoard) -> Analysis {
        let settings = self.ctx.settings();
        let search = astar(board, board.food);
        let analysis = Self::build_analysis(board, &search);

        self.ctx.emit(
            &settings,
            TelemetryRecord::new(GameKind::Snake)
                .with("safe_moves", safe_moves(board).len() as f64)
                .with("nodes_expanded", search.expanded as f64)
                .with("path_found", if search.path.is_some() { 1.0 } else { 0.0 })
                .with(
                    "path_len",
                    search.path.as_ref().map_or(0.0, |p| p.len() as f64),
                )
                .with("body_len", board.body.len() as f64),
        );

        self.ctx.store(analysis)
    }
}
