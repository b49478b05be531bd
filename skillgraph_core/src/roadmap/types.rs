//! Learning roadmap data model
//!
//! Defines the roadmap -> module -> resource containment hierarchy along
//! with the derived completion fields. Module status and both completion
//! percentages are functions of resource progress and are recomputed on
//! every resource write, never set independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::types::SkillId;
use crate::profile::mastery::Mastery;
use crate::profile::types::UserId;

/// Unique identifier for a roadmap
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoadmapId(pub Uuid);

impl RoadmapId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoadmapId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoadmapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a roadmap module
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub Uuid);

impl ModuleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a module resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub Uuid);

impl ResourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounded resource progress [0, 100]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Progress(u8);

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("progress out of bounds: {value} (must be {min} to {max})")]
    OutOfBounds { value: u8, min: u8, max: u8 },
}

impl Progress {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    /// Create a new progress value with bounds validation
    ///
    /// # Errors
    /// Returns `ProgressError::OutOfBounds` if value > 100.
    pub fn new(value: u8) -> Result<Self, ProgressError> {
        if value > Self::MAX {
            return Err(ProgressError::OutOfBounds {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying value
    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether the resource is fully consumed
    pub fn is_complete(self) -> bool {
        self.0 == Self::MAX
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a learning resource
///
/// A closed set: the variants differ only in display metadata, not in
/// progress semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Video,
    Article,
    Course,
}

/// Lifecycle status of a module, derived from its resources
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// A learning resource within a module
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleResource {
    pub id: ResourceId,
    pub title: String,
    pub resource_type: ResourceType,
    pub url: String,
    pub progress: Progress,
}

/// A module within a roadmap
///
/// `status` and `completion_percentage` are derived from the resources via
/// `recompute`; the resource set is fixed at roadmap generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadmapModule {
    pub id: ModuleId,
    pub title: String,
    pub target_skills: Vec<SkillId>,
    pub resources: Vec<ModuleResource>,
    pub status: ModuleStatus,
    pub completion_percentage: f64,
}

impl RoadmapModule {
    /// Recompute the derived fields from resource progress
    ///
    /// Completion is the arithmetic mean of resource progress; status is
    /// `Completed` iff every resource is at 100, `NotStarted` iff the
    /// progress sum is 0 (including the zero-resource case), otherwise
    /// `InProgress`.
    pub fn recompute(&mut self) {
        if self.resources.is_empty() {
            self.completion_percentage = 0.0;
            self.status = ModuleStatus::NotStarted;
            return;
        }

        let sum: u32 = self
            .resources
            .iter()
            .map(|r| u32::from(r.progress.get()))
            .sum();
        let count = self.resources.len() as u32;

        self.completion_percentage = f64::from(sum) / f64::from(count);
        self.status = if sum == 0 {
            ModuleStatus::NotStarted
        } else if sum == count * u32::from(Progress::MAX) {
            ModuleStatus::Completed
        } else {
            ModuleStatus::InProgress
        };
    }
}

/// A user's learning roadmap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningRoadmap {
    pub id: RoadmapId,
    pub user_id: UserId,
    pub title: String,
    pub is_active: bool,
    pub modules: Vec<RoadmapModule>,
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
}

impl LearningRoadmap {
    /// Recompute roadmap progress as the mean of module completion
    pub fn recompute_progress(&mut self) {
        if self.modules.is_empty() {
            self.progress_percentage = 0.0;
            return;
        }
        let sum: f64 = self.modules.iter().map(|m| m.completion_percentage).sum();
        self.progress_percentage = sum / self.modules.len() as f64;
    }
}

/// Resource content supplied by the generation collaborator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub title: String,
    pub resource_type: ResourceType,
    pub url: String,
}

/// Module content supplied by the generation collaborator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub title: String,
    pub target_skills: Vec<SkillId>,
    pub resources: Vec<ResourceSpec>,
}

/// Roadmap content supplied by the generation collaborator
///
/// The core assigns ids, zeroed progress, and ownership structure; the
/// text, urls, and module-to-skill associations come from outside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadmapSpec {
    pub title: String,
    pub modules: Vec<ModuleSpec>,
}

/// One mastery change emitted by a module completion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasteryUpdate {
    pub skill_id: SkillId,
    pub mastery: Mastery,
    pub newly_applied: bool,
}

/// Result of a resource progress update
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressReceipt {
    pub roadmap_id: RoadmapId,
    pub module_id: ModuleId,
    pub resource_id: ResourceId,
    pub progress: Progress,
    pub module_status: ModuleStatus,
    pub module_completion: f64,
    pub roadmap_progress: f64,
    /// Boosts applied because the containing module just completed
    pub mastery_updates: Vec<MasteryUpdate>,
}

/// The next unfinished resource in a roadmap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NextResource {
    pub module_id: ModuleId,
    pub module_title: String,
    pub resource_id: ResourceId,
    pub title: String,
    pub resource_type: ResourceType,
    pub url: String,
}
