//! The engine interface shared by the three games.
//!
//! Each engine owns an [`EngineContext`] holding its injected collaborators and
//! the last analysis. Everything except `analyze` is implemented once here as
//! default trait methods on top of the [`DecisionAssembler`].

use std::sync::Arc;

use log::debug;

use crate::assembler::DecisionAssembler;
use crate::config::{AdvisorConfig, ConfigError, ConfigProvider, SharedConfig};
use crate::explainer::Explainer;
use crate::telemetry::{TelemetryRecord, TelemetrySink};
use crate::types::{Analysis, GameKind, Hint, Suggestion};

/// Collaborators and the single piece of retained state an engine carries
pub struct EngineContext {
    game: GameKind,
    config: Arc<dyn ConfigProvider>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    explainer: Option<Arc<dyn Explainer>>,
    last: Option<Analysis>,
}

impl EngineContext {
    pub fn new(game: GameKind, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            game,
            config,
            telemetry: None,
            explainer: None,
            last: None,
        }
    }

    /// Context with a private default configuration
    pub fn standalone(game: GameKind) -> Self {
        Self::new(game, Arc::new(SharedConfig::default()))
    }

    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    pub fn with_explainer(mut self, explainer: Arc<dyn Explainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Settings for one operation
    pub fn settings(&self) -> AdvisorConfig {
        self.config.snapshot()
    }

    pub fn last(&self) -> Option<&Analysis> {
        self.last.as_ref()
    }

    /// Replace the retained analysis and hand back a copy for the caller
    pub fn store(&mut self, analysis: Analysis) -> Analysis {
        self.last = Some(analysis.clone());
        analysis
    }

    /// Push a telemetry record if debug mode was on for this call
    pub fn emit(&self, settings: &AdvisorConfig, record: TelemetryRecord) {
        if !settings.debug_mode {
            return;
        }
        debug!("{} telemetry: {}", self.game.as_str(), record.to_json());
        if let Some(sink) = &self.telemetry {
            sink.record(record);
        }
    }

    pub fn latest_telemetry(&self) -> Option<TelemetryRecord> {
        self.telemetry.as_ref().and_then(|s| s.latest(self.game))
    }

    pub fn assembler(&self, settings: AdvisorConfig) -> DecisionAssembler<'_> {
        DecisionAssembler::new(settings, self.explainer.as_deref())
    }
}

/// One engine per game: analyze a snapshot, then answer suggestion, hint and
/// explanation requests from the retained analysis without recomputing.
pub trait DecisionEngine {
    type Snapshot;

    fn context(&self) -> &EngineContext;

    /// Run the engine's algorithm on `snapshot`. Never fails: degenerate
    /// boards yield an analysis with no actions and zero confidence.
    fn analyze(&mut self, snapshot: &Self::Snapshot) -> Analysis;

    fn game(&self) -> GameKind {
        self.context().game()
    }

    fn last_analysis(&self) -> Option<&Analysis> {
        self.context().last()
    }

    fn suggestion(&self) -> Suggestion {
        let ctx = self.context();
        ctx.assembler(ctx.settings()).suggestion(ctx.last())
    }

    /// Hint tiered by `difficulty`; a non-finite value uses the configured level
    fn hint(&self, difficulty: f64) -> Hint {
        let ctx = self.context();
        let settings = ctx.settings();
        let difficulty = if difficulty.is_finite() {
            difficulty
        } else {
            settings.difficulty
        };
        ctx.assembler(settings).hint(ctx.last(), difficulty)
    }

    fn explain_decision(&self, suggestion: &Suggestion) -> String {
        let ctx = self.context();
        let settings = ctx.settings();
        let telemetry = if settings.debug_mode {
            ctx.latest_telemetry()
        } else {
            None
        };
        ctx.assembler(settings)
            .explain(suggestion, ctx.last(), telemetry.as_ref())
    }

    fn set_difficulty_level(&self, level: f64) -> Result<(), ConfigError> {
        self.context().config().set_difficulty(level)
    }

    fn difficulty_level(&self) -> f64 {
        self.context().settings().difficulty
    }

    fn set_debug_mode(&self, enabled: bool) {
        self.context().config().set_debug_mode(enabled);
    }

    fn is_debug_mode_enabled(&self) -> bool {
        self.context().settings().debug_mode
    }
}
