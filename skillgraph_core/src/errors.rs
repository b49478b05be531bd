//! Error types for the skill graph core

use thiserror::Error;

use crate::catalog::types::{RoleId, SkillId, WeightError};
use crate::profile::mastery::MasteryError;
use crate::profile::types::UserId;
use crate::roadmap::types::{ModuleId, ProgressError, ResourceId, RoadmapId};

/// Main error type for skill graph operations
///
/// Every variant is a deterministic local validation failure: retrying the
/// same call with the same input yields the same error, and a failed call
/// leaves all entities in their last valid state.
#[derive(Error, Debug)]
pub enum SkillGraphError {
    /// Mastery level outside [0, 100], rejected before any write
    #[error("invalid mastery level: {0}")]
    InvalidMastery(#[from] MasteryError),

    /// Resource progress outside [0, 100], rejected before any write
    #[error("invalid resource progress: {0}")]
    InvalidProgress(#[from] ProgressError),

    /// Requirement weight outside (0, 1]
    #[error("invalid requirement weight: {0}")]
    InvalidWeight(#[from] WeightError),

    /// Referenced skill absent from the catalog
    #[error("skill {0} not found in catalog")]
    UnknownSkill(SkillId),

    /// Referenced career role does not exist
    #[error("role {0} not found")]
    UnknownRole(RoleId),

    /// Referenced roadmap resource does not exist
    #[error("resource {0} not found")]
    UnknownResource(ResourceId),

    /// Referenced roadmap module does not exist
    #[error("module {0} not found")]
    UnknownModule(ModuleId),

    /// Referenced roadmap does not exist
    #[error("roadmap {0} not found")]
    UnknownRoadmap(RoadmapId),

    /// Alignment computed against a role with no skill requirements
    #[error("role {0} has no skill requirements")]
    EmptyRoleRequirements(RoleId),

    /// Progress update would lower a resource's stored value
    #[error("progress for resource {resource_id} would regress from {current} to {requested}")]
    RegressiveProgress {
        resource_id: ResourceId,
        current: u8,
        requested: u8,
    },

    /// Relationships from a skill to itself are not allowed
    #[error("relationship from skill {0} to itself is not allowed")]
    SelfRelationship(SkillId),

    /// Skill name already taken within its category
    #[error("skill named {name:?} already exists in category {category:?}")]
    DuplicateSkillName { name: String, category: String },

    /// Default gap analysis requested before a target role was chosen
    #[error("no target role set for user {0}")]
    TargetRoleNotSet(UserId),
}

/// Result type alias for skill graph operations
pub type Result<T> = std::result::Result<T, SkillGraphError>;
