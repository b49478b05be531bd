//! User profile data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::mastery::Mastery;
use crate::catalog::types::SkillId;
use crate::roadmap::types::ModuleId;

/// Unique identifier for a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A skill held by a user
///
/// Exactly one row per (user, skill) pair; always references an existing
/// catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSkill {
    pub user_id: UserId,
    pub skill_id: SkillId,
    pub mastery: Mastery,
    pub last_updated: DateTime<Utc>,
}

impl UserSkill {
    pub fn new(user_id: UserId, skill_id: SkillId, mastery: Mastery) -> Self {
        Self {
            user_id,
            skill_id,
            mastery,
            last_updated: Utc::now(),
        }
    }
}

/// At-most-once key for a roadmap completion boost
///
/// One boost per (module, skill) pair per user, ever: re-completing a
/// module must not re-apply the mastery increment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoostKey {
    pub module_id: ModuleId,
    pub skill_id: SkillId,
}

/// Result of applying a completion boost
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoostOutcome {
    /// The increment was applied; carries the resulting mastery
    Applied { mastery: Mastery },
    /// This boost key was already consumed; mastery unchanged
    AlreadyApplied { mastery: Mastery },
}

impl BoostOutcome {
    pub fn mastery(&self) -> Mastery {
        match self {
            BoostOutcome::Applied { mastery } => *mastery,
            BoostOutcome::AlreadyApplied { mastery } => *mastery,
        }
    }

    pub fn newly_applied(&self) -> bool {
        matches!(self, BoostOutcome::Applied { .. })
    }
}
