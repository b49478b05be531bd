//! Skill Graph Core
//!
//! Analytics engine over a per-user skill graph:
//! - Gap Analysis: weighted deficiency against a target role or skill set
//! - Career Alignment: readiness scoring and role recommendations
//! - Roadmap Progress: module/roadmap aggregation with mastery feedback

// Module declarations
pub mod alignment;
pub mod catalog;
pub mod errors;
pub mod gaps;
pub mod policy;
pub mod profile;
pub mod projection;
pub mod roadmap;
pub mod service;

// Re-export main types
pub use catalog::{
    CareerRole, CatalogRepository, InMemoryCatalog, RelationGraph, RelationshipKind, RoleId,
    RoleLevel, RoleSkillRequirement, SkillCatalogEntry, SkillId, SkillRelationship, Weight,
    WeightError,
};

pub use profile::{
    BoostKey, BoostOutcome, InMemoryProfileStorage, Mastery, MasteryError, ProfileStorage,
    SkillGraphStore, UserId, UserSkill,
};

pub use gaps::{GapAnalyzer, GapPriority, GapReport, GapTarget, SkillGap};

pub use alignment::{AlignmentEngine, AlignmentReport, RequirementStanding, RoleRecommendation};

pub use roadmap::{
    InMemoryRoadmapStorage, LearningRoadmap, MasteryUpdate, ModuleId, ModuleResource, ModuleSpec,
    ModuleStatus, NextResource, Progress, ProgressError, ProgressReceipt, ResourceId,
    ResourceSpec, ResourceType, ResourceWrite, RoadmapId, RoadmapModule, RoadmapProgressEngine,
    RoadmapSpec, RoadmapStorage,
};

pub use projection::{
    CategorySummary, GraphLink, GraphNode, ProfileSummary, VisualizationData,
    VisualizationProjection,
};

pub use errors::{Result, SkillGraphError};

pub use policy::PolicyConfig;

pub use service::SkillGraphService;

/// Version of the skill graph core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the skill graph core
pub fn init() {
    tracing::info!("Skill Graph Core v{}", VERSION);
}
