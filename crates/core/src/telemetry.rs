//! Debug telemetry - per-call engine metrics pushed while debug mode is on.
//!
//! Records only hold deterministic counters so that the debug block of an
//! explanation stays identical for identical inputs.

use std::collections::{BTreeMap, VecDeque};
use std::sync::RwLock;

use serde::Serialize;

use crate::types::GameKind;

/// Maximum records kept by [`TelemetryLog`]
pub const TELEMETRY_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub game: GameKind,
    pub metrics: BTreeMap<String, f64>,
}

impl TelemetryRecord {
    pub fn new(game: GameKind) -> Self {
        Self {
            game,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<f64>) -> Self {
        self.metrics.insert(name.to_string(), value.into());
        self
    }

    /// Compact single-line JSON
    pub fn to_json(&self) -> String {
        // BTreeMap<String, f64> serialization cannot fail except on non-finite
        // floats, which serde_json writes as null.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

pub trait TelemetrySink: Send + Sync {
    fn record(&self, record: TelemetryRecord);

    /// Most recent record pushed for `game`
    fn latest(&self, game: GameKind) -> Option<TelemetryRecord>;
}

/// Bounded in-memory sink
#[derive(Debug, Default)]
pub struct TelemetryLog {
    records: RwLock<VecDeque<TelemetryRecord>>,
}

impl TelemetryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        match self.records.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every retained record, oldest first
    pub fn records(&self) -> Vec<TelemetryRecord> {
        match self.records.read() {
            Ok(guard) => guard.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }
}

impl TelemetrySink for TelemetryLog {
    fn record(&self, record: TelemetryRecord) {
        let mut guard = match self.records.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.len() == TELEMETRY_CAPACITY {
            guard.pop_front();
        }
        guard.push_back(record);
    }

    fn latest(&self, game: GameKind) -> Option<TelemetryRecord> {
        let guard = match self.records.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.iter().rev().find(|r| r.game == game).cloned()
    }
}
