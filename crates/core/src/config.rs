//! Configuration provider - difficulty, debug flag and presentation toggles
//!
//! Engines never hold a configuration value of their own. They keep a
//! reference to a [`ConfigProvider`] and take one [`AdvisorConfig`] snapshot at
//! the start of every operation, so a change made mid-call only shows up on the
//! next call.

use std::fmt;
use std::sync::{Arc, RwLock};

use log::warn;

/// Settings read by every engine operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisorConfig {
    /// Hint tier selector in `[0, 1]`; lower means more help
    pub difficulty: f64,
    pub debug_mode: bool,
    pub show_confidence: bool,
    pub show_alternatives: bool,
    pub educational_mode: bool,
    /// Enables strategic food placement for the movement game
    pub challenge_mode: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            difficulty: 0.5,
            debug_mode: false,
            show_confidence: true,
            show_alternatives: true,
            educational_mode: false,
            challenge_mode: false,
        }
    }
}

impl AdvisorConfig {
    /// Load settings from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let difficulty = env::var("ADVISOR_DIFFICULTY")
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .and_then(|v| validate_difficulty(v).ok())
            .unwrap_or(defaults.difficulty);

        let flag = |name: &str, default: bool| {
            env::var(name)
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(default)
        };

        Self {
            difficulty,
            debug_mode: flag("ADVISOR_DEBUG", defaults.debug_mode),
            show_confidence: flag("ADVISOR_SHOW_CONFIDENCE", defaults.show_confidence),
            show_alternatives: flag("ADVISOR_SHOW_ALTERNATIVES", defaults.show_alternatives),
            educational_mode: flag("ADVISOR_EDUCATIONAL", defaults.educational_mode),
            challenge_mode: flag("ADVISOR_CHALLENGE", defaults.challenge_mode),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    NonFiniteDifficulty,
}

impl ConfigError {
    pub fn code(self) -> &'static str {
        match self {
            ConfigError::NonFiniteDifficulty => "invalid_difficulty",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ConfigError::NonFiniteDifficulty => "difficulty must be a finite number",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ConfigError {}

/// Finite values are clamped into `[0, 1]`; NaN and infinities are rejected.
pub fn validate_difficulty(level: f64) -> Result<f64, ConfigError> {
    if !level.is_finite() {
        return Err(ConfigError::NonFiniteDifficulty);
    }
    Ok(level.clamp(0.0, 1.0))
}

/// Source of the settings an engine reads per call
pub trait ConfigProvider: Send + Sync {
    /// Copy of the current settings
    fn snapshot(&self) -> AdvisorConfig;

    /// Apply an arbitrary edit. Implementations must keep difficulty valid.
    fn update(&self, edit: &mut dyn FnMut(&mut AdvisorConfig));

    /// Rejected values leave the previous difficulty in effect.
    fn set_difficulty(&self, level: f64) -> Result<(), ConfigError> {
        let level = validate_difficulty(level).inspect_err(|e| {
            warn!("rejected difficulty {}: {}", level, e);
        })?;
        self.update(&mut |cfg: &mut AdvisorConfig| cfg.difficulty = level);
        Ok(())
    }

    fn set_debug_mode(&self, enabled: bool) {
        self.update(&mut |cfg: &mut AdvisorConfig| cfg.debug_mode = enabled);
    }
}

/// Provider shared by any number of engines; clones see the same settings.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<AdvisorConfig>>,
}

impl SharedConfig {
    pub fn new(config: AdvisorConfig) -> Self {
        let mut config = config;
        config.difficulty = validate_difficulty(config.difficulty).unwrap_or(0.5);
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AdvisorConfig::from_env())
    }
}

impl ConfigProvider for SharedConfig {
    fn snapshot(&self) -> AdvisorConfig {
        // A panic while holding the lock cannot leave a half-written Copy value.
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn update(&self, edit: &mut dyn FnMut(&mut AdvisorConfig)) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = *guard;
        edit(&mut *guard);
        match validate_difficulty(guard.difficulty) {
            Ok(level) => guard.difficulty = level,
            Err(e) => {
                warn!("rejected difficulty {}: {}", guard.difficulty, e);
                guard.difficulty = previous.difficulty;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_difficulty_keeps_previous_value() {
        let config = SharedConfig::default();
        assert!(config.set_difficulty(0.2).is_ok());

        assert_eq!(
            config.set_difficulty(f64::NAN),
            Err(ConfigError::NonFiniteDifficulty)
        );
        assert!(config.set_difficulty(f64::INFINITY).is_err());
        assert_eq!(config.snapshot().difficulty, 0.2);
    }

    #[test]
    fn finite_difficulty_is_clamped() {
        let config = SharedConfig::default();
        config.set_difficulty(7.5).unwrap();
        assert_eq!(config.snapshot().difficulty, 1.0);
        config.set_difficulty(-3.0).unwrap();
        assert_eq!(config.snapshot().difficulty, 0.0);
    }

    #[test]
    fn update_cannot_smuggle_in_nan() {
        let config = SharedConfig::default();
        config.update(&mut |cfg: &mut AdvisorConfig| {
            cfg.difficulty = f64::NAN;
            cfg.educational_mode = true;
        });
        let snap = config.snapshot();
        assert_eq!(snap.difficulty, 0.5);
        assert!(snap.educational_mode);
    }

    #[test]
    fn clones_share_settings() {
        let a = SharedConfig::default();
        let b = a.clone();
        a.set_debug_mode(true);
        assert!(b.snapshot().debug_mode);
    }

    #[test]
    fn new_sanitizes_initial_difficulty() {
        let config = SharedConfig::new(AdvisorConfig {
            difficulty: f64::NAN,
            ..AdvisorConfig::default()
        });
        assert_eq!(config.snapshot().difficulty, 0.5);
    }
}
