//! Decision assembler - shapes an engine's `Analysis` into suggestions, tiered
//! hints and explanation text.
//!
//! Every function here is a pure function of (analysis, configuration snapshot,
//! telemetry record). Text is rendered in a fixed section order, so identical
//! inputs always give identical output.

use std::fmt::Write as _;

use arrayvec::ArrayVec;

use crate::config::AdvisorConfig;
use crate::explainer::{render_walkthrough, Explainer};
use crate::telemetry::TelemetryRecord;
use crate::types::{
    Action, ActionKind, ActionMetric, Analysis, Hint, Position, RiskLevel, Suggestion,
};

/// Below this difficulty hints carry full detail
pub const EASY_TIER_MAX: f64 = 0.3;
/// At or above this difficulty hints only name the risk category
pub const HARD_TIER_MIN: f64 = 0.7;

/// Number of alternatives rendered by an explanation
const ALTERNATIVES_SHOWN: usize = 3;

const NO_MOVES: &str = "No moves to suggest right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintTier {
    Detailed,
    Brief,
    Categorical,
}

impl HintTier {
    pub fn for_difficulty(difficulty: f64) -> Self {
        if difficulty < EASY_TIER_MAX {
            HintTier::Detailed
        } else if difficulty < HARD_TIER_MIN {
            HintTier::Brief
        } else {
            HintTier::Categorical
        }
    }
}

/// Shapes analyses using one configuration snapshot
pub struct DecisionAssembler<'a> {
    config: AdvisorConfig,
    explainer: Option<&'a dyn Explainer>,
}

impl<'a> DecisionAssembler<'a> {
    pub fn new(config: AdvisorConfig, explainer: Option<&'a dyn Explainer>) -> Self {
        Self { config, explainer }
    }

    /// Best action of `analysis` with a sentence quoting its metric
    pub fn suggestion(&self, analysis: Option<&Analysis>) -> Suggestion {
        let Some(analysis) = analysis else {
            return Suggestion::none("No analysis has been run yet.");
        };
        match analysis.best_action() {
            Some(action) => Suggestion {
                action: action.clone(),
                confidence: analysis.confidence,
                explanation: explain_action(action),
            },
            None => Suggestion {
                action: Action::none(),
                confidence: 0.0,
                explanation: analysis.reasoning.clone(),
            },
        }
    }

    pub fn hint(&self, analysis: Option<&Analysis>, difficulty: f64) -> Hint {
        let Some(analysis) = analysis else {
            return Hint {
                message: "Analyze the board first.".to_string(),
                ..Hint::default()
            };
        };

        let tier = HintTier::for_difficulty(difficulty);
        if tier == HintTier::Categorical {
            return Hint {
                message: risk_phrase(analysis.risk_assessment).to_string(),
                ..Hint::default()
            };
        }

        if tier == HintTier::Detailed {
            return self.detailed_hint(analysis);
        }

        match analysis.best_action() {
            Some(best) => Hint {
                message: short_message(best),
                indicators: best.target.into_iter().collect(),
                confidence: Some(analysis.confidence),
                detail: None,
            },
            None => Hint {
                message: NO_MOVES.to_string(),
                ..Hint::default()
            },
        }
    }

    /// Easy tier: up to three cells plus the full reasoning. Without
    /// suggestions the cells come from the rejected alternatives.
    fn detailed_hint(&self, analysis: &Analysis) -> Hint {
        let source = if analysis.suggested_actions.is_empty() {
            &analysis.alternative_options
        } else {
            &analysis.suggested_actions
        };
        let indicators: ArrayVec<Position, 3> =
            source.iter().filter_map(|a| a.target).take(3).collect();

        let mut detail = analysis.reasoning.clone();
        if self.config.educational_mode {
            if let Some(walkthrough) = self
                .explainer
                .and_then(|e| render_walkthrough(e, analysis))
            {
                detail.push_str("\n\n");
                detail.push_str(&walkthrough);
            }
        }

        let message = analysis
            .best_action()
            .map(|best| best.description.clone())
            .unwrap_or_else(|| NO_MOVES.to_string());

        Hint {
            message,
            indicators: indicators.to_vec(),
            confidence: Some(analysis.confidence),
            detail: Some(detail),
        }
    }

    /// Render the full explanation text in fixed section order
    pub fn explain(
        &self,
        suggestion: &Suggestion,
        analysis: Option<&Analysis>,
        telemetry: Option<&TelemetryRecord>,
    ) -> String {
        let cfg = &self.config;
        let mut out = String::new();

        let _ = writeln!(out, "Action: {}", suggestion.action.description);
        if cfg.show_confidence {
            let _ = writeln!(out, "Confidence: {:.0}%", suggestion.confidence * 100.0);
        }
        let _ = writeln!(out, "Priority: {}", suggestion.action.priority);

        let reasoning = analysis
            .map(|a| a.reasoning.as_str())
            .unwrap_or(suggestion.explanation.as_str());
        let _ = writeln!(out, "Reasoning: {}", reasoning);

        if let Some(analysis) = analysis {
            if cfg.show_alternatives {
                let alternatives: Vec<&Action> = analysis
                    .suggested_actions
                    .iter()
                    .filter(|a| **a != suggestion.action)
                    .chain(analysis.alternative_options.iter())
                    .take(ALTERNATIVES_SHOWN)
                    .collect();
                if !alternatives.is_empty() {
                    out.push_str("Alternatives:\n");
                    for alt in alternatives {
                        let _ = writeln!(out, "  - {} (priority {})", alt.description, alt.priority);
                    }
                }
            }

            if cfg.debug_mode {
                out.push_str("[debug]\n");
                let _ = writeln!(out, "  Risk: {}", analysis.risk_assessment);
                let _ = writeln!(
                    out,
                    "  Alternatives considered: {}",
                    analysis.alternative_options.len()
                );
                let _ = writeln!(out, "  Full reasoning: {}", analysis.reasoning);
                match telemetry {
                    Some(record) => {
                        let _ = writeln!(out, "  Last telemetry: {}", record.to_json());
                    }
                    None => out.push_str("  Last telemetry: none\n"),
                }
            }

            if cfg.educational_mode {
                if let Some(walkthrough) = self
                    .explainer
                    .and_then(|e| render_walkthrough(e, analysis))
                {
                    out.push_str("[walkthrough]\n");
                    out.push_str(&walkthrough);
                    out.push('\n');
                }
            }
        }

        out
    }
}

/// One sentence explaining `action` through the metric it was ranked by
pub fn explain_action(action: &Action) -> String {
    let at = action
        .target
        .map(|p| p.to_string())
        .unwrap_or_else(|| "the board".to_string());

    match (action.kind, action.metric) {
        (ActionKind::Flag, Some(ActionMetric::MineProbability { estimated: true, .. })) => {
            format!(
                "Cell {} is estimated to be a mine by clue density; too many cells to confirm it.",
                at
            )
        }
        (ActionKind::Flag, Some(ActionMetric::MineProbability { .. })) => format!(
            "Cell {} is a mine in every consistent layout (100% mine probability).",
            at
        ),
        (
            _,
            Some(ActionMetric::MineProbability {
                probability,
                estimated: true,
            }),
        ) if probability == 0.0 => format!(
            "Cell {} is estimated safe by clue density; too many cells to confirm it.",
            at
        ),
        (_, Some(ActionMetric::MineProbability { probability, .. })) if probability == 0.0 => {
            format!(
                "Cell {} is safe in every consistent layout (0% mine probability).",
                at
            )
        }
        (_, Some(ActionMetric::MineProbability { probability, .. })) => format!(
            "Cell {} is the least risky guess at {:.1}% mine probability.",
            at,
            probability * 100.0
        ),
        (ActionKind::Move { direction }, Some(ActionMetric::OpenSpace { cells, path_len })) => {
            match path_len {
                Some(len) => format!(
                    "Moving {} follows the shortest path to the food ({} steps) with {} open cells ahead.",
                    direction.as_str(),
                    len,
                    cells
                ),
                None => format!(
                    "Moving {} keeps {} open cells reachable.",
                    direction.as_str(),
                    cells
                ),
            }
        }
        (ActionKind::Place { rotation, column }, Some(ActionMetric::PlacementScore { score })) => {
            format!(
                "Placing at column {} with rotation {} scores {:.2}.",
                column, rotation, score
            )
        }
        _ => format!("{}.", action.description),
    }
}

fn short_message(action: &Action) -> String {
    match (action.kind, action.target) {
        (ActionKind::Reveal, Some(p)) => format!("Try revealing {}", p),
        (ActionKind::Flag, Some(p)) => format!("Consider flagging {}", p),
        (ActionKind::Move { direction }, _) => format!("Consider moving {}", direction.as_str()),
        (ActionKind::Place { column, .. }, _) => format!("Try the piece at column {}", column),
        _ => action.description.clone(),
    }
}

/// Categorical phrase for the hardest hint tier; never names a cell
pub fn risk_phrase(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "The position looks comfortable.",
        RiskLevel::Medium => "Proceed with care.",
        RiskLevel::High => "Danger ahead. Think before you act.",
        RiskLevel::Critical => "Critical situation!",
    }
}
