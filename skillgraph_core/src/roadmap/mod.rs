//! Learning roadmap lifecycle and progress aggregation
//!
//! Roadmaps own modules, modules own resources, strictly. Resource progress
//! is the only writable quantity; module status, module completion, and
//! roadmap progress are derived from it on every write. Completing a module
//! feeds a bounded mastery boost back into the skill graph store.

pub mod progress;
pub mod storage;
pub mod types;

// Public exports
pub use progress::RoadmapProgressEngine;
pub use storage::{InMemoryRoadmapStorage, ResourceWrite, RoadmapStorage};
pub use types::{
    LearningRoadmap, MasteryUpdate, ModuleId, ModuleResource, ModuleSpec, ModuleStatus,
    NextResource, Progress, ProgressError, ProgressReceipt, ResourceId, ResourceSpec,
    ResourceType, RoadmapId, RoadmapModule, RoadmapSpec,
};
