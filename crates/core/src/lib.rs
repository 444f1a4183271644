//! Shared decision layer - configuration, telemetry, explanations and the
//! engine trait
//!
//! This crate holds everything the three game engines have in common. It has
//! no game algorithms of its own and performs no I/O.
//!
//! # Module Structure
//!
//! - [`config`]: `AdvisorConfig`, the `ConfigProvider` interface and `SharedConfig`
//! - [`telemetry`]: `TelemetrySink` and the bounded in-memory `TelemetryLog`
//! - [`explainer`]: `Explainer` and the default `StepByStepExplainer`
//! - [`assembler`]: turns an `Analysis` into a `Suggestion`, a tiered `Hint`
//!   and explanation text
//! - [`engine`]: the `DecisionEngine` trait and the `EngineContext` each engine owns
//!
//! # Hint tiers
//!
//! | Difficulty | Hint contents |
//! |------------|---------------|
//! | `< 0.3` | message, highlighted cells, confidence, detailed reasoning (plus walkthrough in educational mode) |
//! | `0.3 .. 0.7` | short message, one highlighted cell, confidence |
//! | `>= 0.7` | one phrase derived from the risk level, no coordinates |
//!
//! # Example
//!
//! ```
//! use arcade_advisor_core::{ConfigProvider, SharedConfig};
//!
//! let config = SharedConfig::default();
//! config.set_difficulty(0.2).unwrap();
//!
//! // NaN is rejected and the previous value stays in effect.
//! assert!(config.set_difficulty(f64::NAN).is_err());
//! assert_eq!(config.snapshot().difficulty, 0.2);
//! ```

pub mod assembler;
pub mod config;
pub mod engine;
pub mod explainer;
pub mod telemetry;

pub use arcade_advisor_types as types;

// Re-export commonly used types for convenience
pub use assembler::{explain_action, risk_phrase, DecisionAssembler, HintTier};
pub use config::{validate_difficulty, AdvisorConfig, ConfigError, ConfigProvider, SharedConfig};
pub use engine::{DecisionEngine, EngineContext};
pub use explainer::{Explainer, StepByStepExplainer};
pub use telemetry::{TelemetryLog, TelemetryRecord, TelemetrySink};
