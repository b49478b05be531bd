//! Storage abstraction for learning roadmaps
//!
//! The in-memory implementation keeps index maps from resource and module
//! ids to their owning roadmap so progress updates address resources
//! directly. All derived fields are recomputed inside the same write-lock
//! critical section as the resource write, so readers never observe a
//! module or roadmap out of sync with its resources.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::{
    LearningRoadmap, ModuleId, ModuleStatus, Progress, ResourceId, RoadmapId, RoadmapModule,
};
use crate::catalog::types::SkillId;
use crate::errors::{Result, SkillGraphError};
use crate::profile::types::UserId;

/// Storage-level outcome of a resource progress write
#[derive(Clone, Debug)]
pub struct ResourceWrite {
    pub roadmap_id: RoadmapId,
    pub module_id: ModuleId,
    pub user_id: UserId,
    pub progress: Progress,
    pub module_status: ModuleStatus,
    pub module_completion: f64,
    pub roadmap_progress: f64,
    /// True when this write transitioned the module to `Completed`
    pub module_newly_completed: bool,
    pub module_target_skills: Vec<SkillId>,
}

/// Storage trait for roadmaps (allows test mocks)
#[async_trait]
pub trait RoadmapStorage: Send + Sync {
    /// Store a fully built roadmap
    async fn create(&self, roadmap: LearningRoadmap) -> Result<RoadmapId>;

    /// Get a roadmap by id
    async fn roadmap(&self, id: RoadmapId) -> Result<Option<LearningRoadmap>>;

    /// List a user's roadmaps, optionally active only
    async fn roadmaps_for_user(
        &self,
        user: UserId,
        active_only: bool,
    ) -> Result<Vec<LearningRoadmap>>;

    /// Get a module by id
    async fn module(&self, id: ModuleId) -> Result<Option<RoadmapModule>>;

    /// Write a resource's progress and recompute the derived fields
    ///
    /// Fails with `UnknownResource` when the id is absent and with
    /// `RegressiveProgress` when the value is lower than the stored one;
    /// equal values are accepted. Prior state is unchanged on failure.
    async fn update_resource_progress(
        &self,
        resource_id: ResourceId,
        progress: Progress,
    ) -> Result<ResourceWrite>;

    /// Toggle a roadmap's active flag
    async fn set_active(&self, id: RoadmapId, active: bool) -> Result<()>;

    /// Delete a roadmap, cascading to its modules and resources
    async fn delete(&self, id: RoadmapId) -> Result<bool>;
}

struct RoadmapState {
    roadmaps: IndexMap<RoadmapId, LearningRoadmap>,
    resource_index: HashMap<ResourceId, (RoadmapId, ModuleId)>,
    module_index: HashMap<ModuleId, RoadmapId>,
}

/// In-memory roadmap storage
pub struct InMemoryRoadmapStorage {
    state: Arc<RwLock<RoadmapState>>,
}

impl InMemoryRoadmapStorage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RoadmapState {
                roadmaps: IndexMap::new(),
                resource_index: HashMap::new(),
                module_index: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryRoadmapStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoadmapStorage for InMemoryRoadmapStorage {
    async fn create(&self, roadmap: LearningRoadmap) -> Result<RoadmapId> {
        let mut state = self.state.write().await;
        let id = roadmap.id;
        for module in &roadmap.modules {
            state.module_index.insert(module.id, id);
            for resource in &module.resources {
                state.resource_index.insert(resource.id, (id, module.id));
            }
        }
        state.roadmaps.insert(id, roadmap);
        Ok(id)
    }

    async fn roadmap(&self, id: RoadmapId) -> Result<Option<LearningRoadmap>> {
        let state = self.state.read().await;
        Ok(state.roadmaps.get(&id).cloned())
    }

    async fn roadmaps_for_user(
        &self,
        user: UserId,
        active_only: bool,
    ) -> Result<Vec<LearningRoadmap>> {
        let state = self.state.read().await;
        Ok(state
            .roadmaps
            .values()
            .filter(|r| r.user_id == user && (!active_only || r.is_active))
            .cloned()
            .collect())
    }

    async fn module(&self, id: ModuleId) -> Result<Option<RoadmapModule>> {
        let state = self.state.read().await;
        let roadmap_id = match state.module_index.get(&id) {
            Some(rid) => *rid,
            None => return Ok(None),
        };
        Ok(state
            .roadmaps
            .get(&roadmap_id)
            .and_then(|r| r.modules.iter().find(|m| m.id == id))
            .cloned())
    }

    async fn update_resource_progress(
        &self,
        resource_id: ResourceId,
        progress: Progress,
    ) -> Result<ResourceWrite> {
        let mut state = self.state.write().await;

        let (roadmap_id, module_id) = state
            .resource_index
            .get(&resource_id)
            .copied()
            .ok_or(SkillGraphError::UnknownResource(resource_id))?;
        let roadmap = state
            .roadmaps
            .get_mut(&roadmap_id)
            .ok_or(SkillGraphError::UnknownResource(resource_id))?;
        let module = roadmap
            .modules
            .iter_mut()
            .find(|m| m.id == module_id)
            .ok_or(SkillGraphError::UnknownModule(module_id))?;
        let resource = module
            .resources
            .iter_mut()
            .find(|r| r.id == resource_id)
            .ok_or(SkillGraphError::UnknownResource(resource_id))?;

        // Monotonic: reject before any write so prior state is untouched
        if progress < resource.progress {
            return Err(SkillGraphError::RegressiveProgress {
                resource_id,
                current: resource.progress.get(),
                requested: progress.get(),
            });
        }

        let was_completed = module.status == ModuleStatus::Completed;
        resource.progress = progress;
        module.recompute();
        let module_status = module.status;
        let module_completion = module.completion_percentage;
        let module_target_skills = module.target_skills.clone();
        roadmap.recompute_progress();

        Ok(ResourceWrite {
            roadmap_id,
            module_id,
            user_id: roadmap.user_id,
            progress,
            module_status,
            module_completion,
            roadmap_progress: roadmap.progress_percentage,
            module_newly_completed: !was_completed && module_status == ModuleStatus::Completed,
            module_target_skills,
        })
    }

    async fn set_active(&self, id: RoadmapId, active: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let roadmap = state
            .roadmaps
            .get_mut(&id)
            .ok_or(SkillGraphError::UnknownRoadmap(id))?;
        roadmap.is_active = active;
        Ok(())
    }

    async fn delete(&self, id: RoadmapId) -> Result<bool> {
        let mut state = self.state.write().await;
        let roadmap = match state.roadmaps.shift_remove(&id) {
            Some(r) => r,
            None => return Ok(false),
        };
        // Cascade: purge module and resource indexes
        for module in &roadmap.modules {
            state.module_index.remove(&module.id);
            for resource in &module.resources {
                state.resource_index.remove(&resource.id);
            }
        }
        Ok(true)
    }
}
