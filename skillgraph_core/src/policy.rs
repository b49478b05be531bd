//! Named policy constants for the analytics engines
//!
//! These values were fixed constants in earlier iterations of the product;
//! they are carried here as a config struct so callers can tune them
//! globally or per engine instance instead of recompiling.

use serde::{Deserialize, Serialize};

use crate::profile::mastery::Mastery;

/// Tunable policy values shared by the analytics engines
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Implied target mastery for role requirements without an explicit
    /// target (default: 70)
    pub default_target_mastery: Mastery,
    /// Proficiency bar for counting a requirement as matching in
    /// alignment (default: 50)
    pub matching_threshold: Mastery,
    /// Mastery increment applied per module-targeted skill when a roadmap
    /// module completes, capped at 100 (default: 10)
    pub completion_boost: u8,
    /// Gap at or above which a skill gap is high priority (default: 40)
    pub high_gap_threshold: u8,
    /// Gap at or above which a skill gap is medium priority (default: 20)
    pub medium_gap_threshold: u8,
    /// Advisory learning effort per gap point, in hours (default: 2.0)
    pub hours_per_gap_point: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            default_target_mastery: Mastery::clamped(70),
            matching_threshold: Mastery::clamped(50),
            completion_boost: 10,
            high_gap_threshold: 40,
            medium_gap_threshold: 20,
            hours_per_gap_point: 2.0,
        }
    }
}

impl PolicyConfig {
    pub fn with_default_target_mastery(mut self, target: Mastery) -> Self {
        self.default_target_mastery = target;
        self
    }

    pub fn with_matching_threshold(mut self, threshold: Mastery) -> Self {
        self.matching_threshold = threshold;
        self
    }

    pub fn with_completion_boost(mut self, boost: u8) -> Self {
        self.completion_boost = boost;
        self
    }
}
