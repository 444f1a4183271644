//! Arcade Advisor (workspace facade crate).
//!
//! Deterministic hint and decision engines for mine-grid, movement-grid and
//! falling-block games. The implementation lives in dedicated crates under
//! `crates/`; this package re-exports them as `arcade_advisor::{types,core,engine}`.

pub use arcade_advisor_core as core;
pub use arcade_advisor_engine as engine;
pub use arcade_advisor_types as types;
