//! Gap classification and aggregation
//!
//! Pure helpers for the gap analyzer: priority banding, report ordering,
//! the weighted aggregate score, and the advisory effort estimate.

use serde::{Deserialize, Serialize};

use super::analyzer::SkillGap;
use crate::policy::PolicyConfig;

/// Priority band of a skill gap
///
/// Declared low-to-high so `Ord` matches urgency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPriority {
    Low,
    Medium,
    High,
}

/// Classify a nonzero gap into a priority band
///
/// High for `gap >= high_gap_threshold`, medium for
/// `medium_gap_threshold <= gap < high_gap_threshold`, low otherwise.
/// Zero gaps never reach this function; they are excluded from the report
/// list upstream.
pub fn classify_priority(gap: u8, policy: &PolicyConfig) -> GapPriority {
    if gap >= policy.high_gap_threshold {
        GapPriority::High
    } else if gap >= policy.medium_gap_threshold {
        GapPriority::Medium
    } else {
        GapPriority::Low
    }
}

/// Weighted average of gaps over every target skill
///
/// Entries are `(gap, weight)` pairs for all targets, including zero-gap
/// skills, so a fully met target set scores 0. Result is a percentage in
/// [0, 100]; an empty target set scores 0.
pub fn weighted_gap_score(entries: &[(u8, f64)]) -> f64 {
    let total_weight: f64 = entries.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = entries.iter().map(|(gap, w)| f64::from(*gap) * w).sum();
    (weighted / total_weight).clamp(0.0, 100.0)
}

/// Order a gap list by priority descending, then gap descending
pub fn order_by_priority(skills: &mut [SkillGap]) {
    skills.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.gap.cmp(&a.gap))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Advisory hours needed to close the listed gaps
pub fn estimate_hours(skills: &[SkillGap], policy: &PolicyConfig) -> f64 {
    skills
        .iter()
        .map(|s| f64::from(s.gap) * policy.hours_per_gap_point)
        .sum()
}
