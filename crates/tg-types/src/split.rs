//! Outer-split and fusion settings passed through to the CV engine.

use serde::{Deserialize, Serialize};

/// Outer cross-validation splitter: repeated group-aware shuffle splits.
///
/// Held fixed across a sweep so every trial's metrics come from the same
/// sequence of held-out group draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupShuffleConfig {
    /// Number of independent outer splits.
    pub n_splits: usize,
    /// Fraction of groups held out per split.
    pub test_size: f64,
    /// Seed for the engine's split generator.
    pub random_state: u64,
}

impl Default for GroupShuffleConfig {
    fn default() -> Self {
        Self {
            n_splits: 100,
            test_size: 0.2,
            random_state: 42,
        }
    }
}

/// Multi-omic fusion switches, passed to the engine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    pub early_fusion: bool,
    pub late_fusion: bool,
    /// Iteration budget for the late-fusion solver.
    pub n_iter_lf: u64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            early_fusion: false,
            late_fusion: false,
            n_iter_lf: 100_000,
        }
    }
}
