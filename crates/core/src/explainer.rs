//! Educational walkthroughs - step-by-step reading of an analysis

use crate::types::{Analysis, AnalysisDetail, PlacementFeatures, Position};

pub trait Explainer: Send + Sync {
    /// Ordered teaching steps for `analysis`; empty when there is nothing to teach
    fn walkthrough(&self, analysis: &Analysis) -> Vec<String>;
}

/// Default explainer: numbered steps built from the engine detail
#[derive(Debug, Clone, Copy, Default)]
pub struct StepByStepExplainer;

impl Explainer for StepByStepExplainer {
    fn walkthrough(&self, analysis: &Analysis) -> Vec<String> {
        let mut steps = match &analysis.detail {
            AnalysisDetail::Mines {
                probabilities,
                constrained_cells,
                solutions,
                approximate,
            } => mine_steps(probabilities, *constrained_cells, *solutions, *approximate),
            AnalysisDetail::Snake {
                path_to_food,
                safe_moves,
            } => snake_steps(path_to_food.as_ref().map(Vec::len), safe_moves.len()),
            AnalysisDetail::Blocks {
                candidates_evaluated,
                best,
            } => block_steps(*candidates_evaluated, best.as_ref()),
            AnalysisDetail::Empty => vec![format!(
                "There is nothing to analyze on this {} board yet.",
                analysis.game.as_str()
            )],
        };

        if let Some(best) = analysis.best_action() {
            steps.push(format!("Conclusion: {}.", best.description));
        }

        steps
            .into_iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s))
            .collect()
    }
}

fn mine_steps(
    probabilities: &[(Position, f64)],
    constrained: usize,
    solutions: usize,
    approximate: bool,
) -> Vec<String> {
    let mut steps = vec![
        "Each revealed number says how many of its hidden neighbours are mines, minus the flags already placed.".to_string(),
        format!(
            "{} hidden cells touch at least one number; the other {} are only limited by the total mine count.",
            constrained,
            probabilities.len().saturating_sub(constrained)
        ),
    ];
    if approximate {
        steps.push(
            "Too many cells are involved to try every layout, so each cell is judged by the average pressure of the numbers around it.".to_string(),
        );
    } else {
        steps.push(format!(
            "Trying every mine layout that satisfies all numbers gives {} consistent layouts.",
            solutions
        ));
    }
    let safe = probabilities.iter().filter(|(_, p)| *p == 0.0).count();
    let mines = probabilities.iter().filter(|(_, p)| *p == 1.0).count();
    steps.push(format!(
        "A cell that is empty in every layout is safe ({} found); one that is a mine in every layout can be flagged ({} found).",
        safe, mines
    ));
    steps
}

fn snake_steps(path_len: Option<usize>, safe_moves: usize) -> Vec<String> {
    let mut steps = vec![format!(
        "First rule out moves into a wall or into the body: {} of the possible moves are safe.",
        safe_moves
    )];
    match path_len {
        Some(len) => steps.push(format!(
            "A shortest-path search reaches the food in {} steps, so the first step of that path comes first.",
            len
        )),
        None => steps.push(
            "No route to the food exists right now, so the priority is staying alive with the most open space.".to_string(),
        ),
    }
    steps.push(
        "Open space around each safe move is counted to avoid trapping yourself.".to_string(),
    );
    steps
}

fn block_steps(candidates: usize, best: Option<&PlacementFeatures>) -> Vec<String> {
    let mut steps = vec![format!(
        "Every rotation and column for the current piece is dropped in turn: {} legal placements.",
        candidates
    )];
    if let Some(f) = best {
        steps.push(format!(
            "The best one clears {} lines, leaves {} holes, a total stack height of {} and bumpiness {}.",
            f.lines_cleared, f.holes, f.aggregate_height, f.bumpiness
        ));
        steps.push(format!(
            "Cleared lines are worth {} each, every hole costs {}, so avoid covering empty cells.",
            PlacementFeatures::LINES_WEIGHT,
            -PlacementFeatures::HOLES_WEIGHT
        ));
    }
    steps
}

/// Render the walkthrough as one block of text, or `None` if it is empty
pub fn render_walkthrough(explainer: &dyn Explainer, analysis: &Analysis) -> Option<String> {
    let steps = explainer.walkthrough(analysis);
    if steps.is_empty() {
        None
    } else {
        Some(steps.join("\n"))
    }
}
