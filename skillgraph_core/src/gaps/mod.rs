//! Skill gap analysis
//!
//! Measures a user's mastery against a target role or explicit skill set,
//! classifies each deficiency into a priority band, and aggregates a
//! weighted gap score. Read-only over the skill graph store.

pub mod analyzer;
pub mod scoring;

// Public exports
pub use analyzer::{GapAnalyzer, GapReport, GapTarget, SkillGap};
pub use scoring::{classify_priority, weighted_gap_score, GapPriority};
