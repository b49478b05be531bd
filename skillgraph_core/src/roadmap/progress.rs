//! Roadmap progress engine
//!
//! Owns the roadmap lifecycle: structures generated content into owned
//! entities, aggregates resource progress upward, and on module completion
//! emits mastery boosts into the skill graph store. The boost is the only
//! path from roadmap activity back into the skill graph, applied through
//! the store's explicit interface so it stays auditable and testable.

use chrono::Utc;
use std::sync::Arc;

use super::storage::RoadmapStorage;
use super::types::{
    LearningRoadmap, MasteryUpdate, ModuleId, ModuleResource, NextResource, Progress,
    ProgressReceipt, ResourceId, RoadmapId, RoadmapModule, RoadmapSpec,
};
use crate::errors::{Result, SkillGraphError};
use crate::policy::PolicyConfig;
use crate::profile::types::BoostKey;
use crate::profile::{SkillGraphStore, UserId};

/// Roadmap progress engine
pub struct RoadmapProgressEngine {
    storage: Arc<dyn RoadmapStorage>,
    store: Arc<SkillGraphStore>,
    policy: PolicyConfig,
}

impl RoadmapProgressEngine {
    /// Create a new engine with default policy
    pub fn new(storage: Arc<dyn RoadmapStorage>, store: Arc<SkillGraphStore>) -> Self {
        Self {
            storage,
            store,
            policy: PolicyConfig::default(),
        }
    }

    /// Set custom policy (builder pattern)
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Build and store a roadmap from generated content
    ///
    /// Assigns ids, zeroed progress, and `NotStarted` status; validates
    /// every module target skill against the catalog up front so later
    /// completion boosts cannot dangle.
    pub async fn create_roadmap(
        &self,
        user: UserId,
        spec: RoadmapSpec,
    ) -> Result<LearningRoadmap> {
        let catalog = self.store.catalog();
        for module in &spec.modules {
            for skill in &module.target_skills {
                if catalog.skill(*skill).await?.is_none() {
                    return Err(SkillGraphError::UnknownSkill(*skill));
                }
            }
        }

        let modules = spec
            .modules
            .into_iter()
            .map(|m| RoadmapModule {
                id: ModuleId::new(),
                title: m.title,
                target_skills: m.target_skills,
                resources: m
                    .resources
                    .into_iter()
                    .map(|r| ModuleResource {
                        id: ResourceId::new(),
                        title: r.title,
                        resource_type: r.resource_type,
                        url: r.url,
                        progress: Progress::default(),
                    })
                    .collect(),
                status: super::types::ModuleStatus::NotStarted,
                completion_percentage: 0.0,
            })
            .collect();

        let roadmap = LearningRoadmap {
            id: RoadmapId::new(),
            user_id: user,
            title: spec.title,
            is_active: true,
            modules,
            progress_percentage: 0.0,
            created_at: Utc::now(),
        };

        let id = self.storage.create(roadmap.clone()).await?;
        tracing::info!(%user, roadmap = %id, modules = roadmap.modules.len(), "roadmap created");
        Ok(roadmap)
    }

    /// List a user's roadmaps, optionally active only
    pub async fn roadmaps(&self, user: UserId, active_only: bool) -> Result<Vec<LearningRoadmap>> {
        self.storage.roadmaps_for_user(user, active_only).await
    }

    /// Get a roadmap by id
    pub async fn roadmap(&self, id: RoadmapId) -> Result<LearningRoadmap> {
        self.storage
            .roadmap(id)
            .await?
            .ok_or(SkillGraphError::UnknownRoadmap(id))
    }

    /// Get a module by id
    pub async fn module(&self, id: ModuleId) -> Result<RoadmapModule> {
        self.storage
            .module(id)
            .await?
            .ok_or(SkillGraphError::UnknownModule(id))
    }

    /// Record progress on a resource
    ///
    /// Validates range (`InvalidProgress`) and monotonicity
    /// (`RegressiveProgress`), recomputes the derived fields, and when the
    /// containing module transitions to completed, applies the mastery
    /// boost for each of its target skills. Boosts are at-most-once per
    /// module-skill pair: re-completions report `newly_applied = false`.
    pub async fn update_resource_progress(
        &self,
        resource_id: ResourceId,
        progress_value: u8,
    ) -> Result<ProgressReceipt> {
        let progress = Progress::new(progress_value)?;
        let write = self
            .storage
            .update_resource_progress(resource_id, progress)
            .await?;

        let mut mastery_updates = Vec::new();
        if write.module_newly_completed {
            tracing::info!(module = %write.module_id, "module completed");
            for skill in &write.module_target_skills {
                let key = BoostKey {
                    module_id: write.module_id,
                    skill_id: *skill,
                };
                let outcome = self
                    .store
                    .apply_completion_boost(
                        write.user_id,
                        *skill,
                        key,
                        self.policy.completion_boost,
                    )
                    .await?;
                mastery_updates.push(MasteryUpdate {
                    skill_id: *skill,
                    mastery: outcome.mastery(),
                    newly_applied: outcome.newly_applied(),
                });
            }
        }

        Ok(ProgressReceipt {
            roadmap_id: write.roadmap_id,
            module_id: write.module_id,
            resource_id,
            progress,
            module_status: write.module_status,
            module_completion: write.module_completion,
            roadmap_progress: write.roadmap_progress,
            mastery_updates,
        })
    }

    /// First unfinished resource in roadmap order
    ///
    /// Walks modules in sequence, skipping completed ones, and returns the
    /// first resource below full progress. `None` when the roadmap is
    /// fully consumed.
    pub async fn next_resource(&self, roadmap_id: RoadmapId) -> Result<Option<NextResource>> {
        let roadmap = self.roadmap(roadmap_id).await?;

        for module in &roadmap.modules {
            if module.status == super::types::ModuleStatus::Completed {
                continue;
            }
            for resource in &module.resources {
                if !resource.progress.is_complete() {
                    return Ok(Some(NextResource {
                        module_id: module.id,
                        module_title: module.title.clone(),
                        resource_id: resource.id,
                        title: resource.title.clone(),
                        resource_type: resource.resource_type,
                        url: resource.url.clone(),
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Toggle a roadmap's active flag
    pub async fn set_active(&self, id: RoadmapId, active: bool) -> Result<()> {
        self.storage.set_active(id, active).await
    }

    /// Delete a roadmap and everything it owns
    pub async fn delete_roadmap(&self, id: RoadmapId) -> Result<bool> {
        let deleted = self.storage.delete(id).await?;
        if deleted {
            tracing::info!(roadmap = %id, "roadmap deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::roadmap::storage::InMemoryRoadmapStorage;
    use crate::roadmap::types::{ModuleSpec, ModuleStatus, ResourceSpec, ResourceType};
    use crate::catalog::types::SkillId;

    async fn fixture() -> (Arc<InMemoryCatalog>, Arc<SkillGraphStore>, RoadmapProgressEngine) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let store = Arc::new(SkillGraphStore::in_memory(catalog.clone()));
        let engine = RoadmapProgressEngine::new(
            Arc::new(InMemoryRoadmapStorage::new()),
            store.clone(),
        );
        (catalog, store, engine)
    }

    fn spec_with_skill(skill: SkillId, resources: usize) -> RoadmapSpec {
        RoadmapSpec {
            title: "Learn the stack".to_string(),
            modules: vec![ModuleSpec {
                title: "Fundamentals".to_string(),
                target_skills: vec![skill],
                resources: (0..resources)
                    .map(|i| ResourceSpec {
                        title: format!("Lesson {}", i + 1),
                        resource_type: ResourceType::Video,
                        url: "https://example.com".to_string(),
                    })
                    .collect(),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_initial_state() {
        let (catalog, _, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();

        let roadmap = engine
            .create_roadmap(UserId::new(), spec_with_skill(skill.id, 2))
            .await
            .unwrap();

        assert!(roadmap.is_active);
        assert_eq!(roadmap.progress_percentage, 0.0);
        let module = &roadmap.modules[0];
        assert_eq!(module.status, ModuleStatus::NotStarted);
        assert!(module.resources.iter().all(|r| r.progress.get() == 0));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_target_skill() {
        let (_, _, engine) = fixture().await;
        let result = engine
            .create_roadmap(UserId::new(), spec_with_skill(SkillId::new(), 1))
            .await;
        assert!(matches!(result, Err(SkillGraphError::UnknownSkill(_))));
    }

    #[tokio::test]
    async fn test_completion_boosts_targeted_skills() {
        let (catalog, store, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let user = UserId::new();
        store.upsert_user_skill(user, skill.id, 40).await.unwrap();

        let roadmap = engine
            .create_roadmap(user, spec_with_skill(skill.id, 1))
            .await
            .unwrap();
        let resource = roadmap.modules[0].resources[0].id;

        let receipt = engine.update_resource_progress(resource, 100).await.unwrap();

        assert_eq!(receipt.module_status, ModuleStatus::Completed);
        assert_eq!(receipt.mastery_updates.len(), 1);
        assert!(receipt.mastery_updates[0].newly_applied);
        assert_eq!(receipt.mastery_updates[0].mastery.get(), 50);

        let held = store.user_skill(user, skill.id).await.unwrap().unwrap();
        assert_eq!(held.mastery.get(), 50);
    }

    #[tokio::test]
    async fn test_boost_not_reapplied_on_remark() {
        let (catalog, store, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let user = UserId::new();
        store.upsert_user_skill(user, skill.id, 40).await.unwrap();

        let roadmap = engine
            .create_roadmap(user, spec_with_skill(skill.id, 1))
            .await
            .unwrap();
        let resource = roadmap.modules[0].resources[0].id;

        engine.update_resource_progress(resource, 100).await.unwrap();
        let second = engine.update_resource_progress(resource, 100).await.unwrap();

        // Re-marking a completed module applies nothing
        assert!(second.mastery_updates.is_empty());
        let held = store.user_skill(user, skill.id).await.unwrap().unwrap();
        assert_eq!(held.mastery.get(), 50);
    }

    #[tokio::test]
    async fn test_boost_creates_unheld_skill() {
        let (catalog, store, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let user = UserId::new();

        let roadmap = engine
            .create_roadmap(user, spec_with_skill(skill.id, 1))
            .await
            .unwrap();
        let resource = roadmap.modules[0].resources[0].id;
        engine.update_resource_progress(resource, 100).await.unwrap();

        let held = store.user_skill(user, skill.id).await.unwrap().unwrap();
        assert_eq!(held.mastery.get(), 10);
    }

    #[tokio::test]
    async fn test_partial_progress_no_boost() {
        let (catalog, store, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let user = UserId::new();

        let roadmap = engine
            .create_roadmap(user, spec_with_skill(skill.id, 2))
            .await
            .unwrap();
        let resource = roadmap.modules[0].resources[0].id;

        let receipt = engine.update_resource_progress(resource, 100).await.unwrap();
        assert_eq!(receipt.module_status, ModuleStatus::InProgress);
        assert!(receipt.mastery_updates.is_empty());
        assert!(store.user_skill(user, skill.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_progress_rejected_before_write() {
        let (catalog, _, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let roadmap = engine
            .create_roadmap(UserId::new(), spec_with_skill(skill.id, 1))
            .await
            .unwrap();
        let resource = roadmap.modules[0].resources[0].id;

        let result = engine.update_resource_progress(resource, 120).await;
        assert!(matches!(result, Err(SkillGraphError::InvalidProgress(_))));

        let stored = engine.roadmap(roadmap.id).await.unwrap();
        assert_eq!(stored.modules[0].resources[0].progress.get(), 0);
    }

    #[tokio::test]
    async fn test_next_resource_walks_in_order() {
        let (catalog, _, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();

        let spec = RoadmapSpec {
            title: "Two modules".to_string(),
            modules: vec![
                ModuleSpec {
                    title: "First".to_string(),
                    target_skills: vec![skill.id],
                    resources: vec![ResourceSpec {
                        title: "Intro".to_string(),
                        resource_type: ResourceType::Video,
                        url: "https://example.com/1".to_string(),
                    }],
                },
                ModuleSpec {
                    title: "Second".to_string(),
                    target_skills: vec![skill.id],
                    resources: vec![ResourceSpec {
                        title: "Deep dive".to_string(),
                        resource_type: ResourceType::Article,
                        url: "https://example.com/2".to_string(),
                    }],
                },
            ],
        };

        let user = UserId::new();
        let roadmap = engine.create_roadmap(user, spec).await.unwrap();
        let first_resource = roadmap.modules[0].resources[0].id;

        let next = engine.next_resource(roadmap.id).await.unwrap().unwrap();
        assert_eq!(next.resource_id, first_resource);

        engine
            .update_resource_progress(first_resource, 100)
            .await
            .unwrap();
        let next = engine.next_resource(roadmap.id).await.unwrap().unwrap();
        assert_eq!(next.title, "Deep dive");

        engine
            .update_resource_progress(next.resource_id, 100)
            .await
            .unwrap();
        assert!(engine.next_resource(roadmap.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_module_lookup() {
        let (_, _, engine) = fixture().await;
        let result = engine.module(ModuleId::new()).await;
        assert!(matches!(result, Err(SkillGraphError::UnknownModule(_))));
    }

    #[tokio::test]
    async fn test_delete_roadmap() {
        let (catalog, _, engine) = fixture().await;
        let skill = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let roadmap = engine
            .create_roadmap(UserId::new(), spec_with_skill(skill.id, 1))
            .await
            .unwrap();

        assert!(engine.delete_roadmap(roadmap.id).await.unwrap());
        let result = engine.roadmap(roadmap.id).await;
        assert!(matches!(result, Err(SkillGraphError::UnknownRoadmap(_))));
    }
}
