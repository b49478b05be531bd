//! Combined service facade
//!
//! Wires the catalog, skill graph store, and the analytics engines behind
//! the operation set consumed by the presentation layer. Serialization of
//! the returned structures is an adapter concern outside this crate.

use std::sync::Arc;

use crate::alignment::{AlignmentEngine, AlignmentReport, RoleRecommendation};
use crate::catalog::types::{RoleId, SkillId};
use crate::catalog::CatalogRepository;
use crate::errors::Result;
use crate::gaps::{GapAnalyzer, GapReport, GapTarget};
use crate::policy::PolicyConfig;
use crate::profile::mastery::Mastery;
use crate::profile::{SkillGraphStore, UserId, UserSkill};
use crate::projection::{VisualizationData, VisualizationProjection};
use crate::roadmap::{
    InMemoryRoadmapStorage, LearningRoadmap, NextResource, ProgressReceipt, ResourceId,
    RoadmapId, RoadmapProgressEngine, RoadmapSpec, RoadmapStorage,
};

/// Facade over the skill graph core
pub struct SkillGraphService {
    store: Arc<SkillGraphStore>,
    gaps: GapAnalyzer,
    alignment: AlignmentEngine,
    roadmaps: RoadmapProgressEngine,
    projection: VisualizationProjection,
}

impl SkillGraphService {
    /// Build a service around a catalog with in-memory stores and default
    /// policy
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self::with_storage(
            Arc::new(SkillGraphStore::in_memory(catalog)),
            Arc::new(InMemoryRoadmapStorage::new()),
            PolicyConfig::default(),
        )
    }

    /// Build a service from explicit stores and policy
    pub fn with_storage(
        store: Arc<SkillGraphStore>,
        roadmap_storage: Arc<dyn RoadmapStorage>,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            gaps: GapAnalyzer::new(store.clone()).with_policy(policy.clone()),
            alignment: AlignmentEngine::new(store.clone()).with_policy(policy.clone()),
            roadmaps: RoadmapProgressEngine::new(roadmap_storage, store.clone())
                .with_policy(policy.clone()),
            projection: VisualizationProjection::new(store.clone()).with_policy(policy),
            store,
        }
    }

    /// The underlying store, for direct reads in tests and adapters
    pub fn store(&self) -> Arc<SkillGraphStore> {
        Arc::clone(&self.store)
    }

    /// Nodes/links payload for rendering
    pub async fn visualization_data(
        &self,
        user: UserId,
        user_skills_only: bool,
    ) -> Result<VisualizationData> {
        self.projection.project(user, user_skills_only).await
    }

    /// Gap analysis against a role, or the stored target role when `None`
    pub async fn gap_analysis(&self, user: UserId, role_id: Option<RoleId>) -> Result<GapReport> {
        match role_id {
            Some(role_id) => self.gaps.analyze(user, GapTarget::Role(role_id)).await,
            None => self.gaps.analyze_default(user).await,
        }
    }

    /// Gap analysis against an explicit skill set
    pub async fn gap_analysis_for_skills(
        &self,
        user: UserId,
        targets: Vec<(SkillId, Mastery)>,
    ) -> Result<GapReport> {
        self.gaps.analyze(user, GapTarget::Skills(targets)).await
    }

    /// Readiness against one role
    pub async fn alignment(&self, user: UserId, role_id: RoleId) -> Result<AlignmentReport> {
        self.alignment.alignment(user, role_id).await
    }

    /// All roles ranked by readiness, descending
    pub async fn recommendations(&self, user: UserId) -> Result<Vec<RoleRecommendation>> {
        self.alignment.recommendations(user).await
    }

    /// Record the user's chosen target role
    pub async fn set_target_role(&self, user: UserId, role_id: RoleId) -> Result<()> {
        self.alignment.set_target_role(user, role_id).await
    }

    /// Create or update a user's mastery of a skill
    pub async fn upsert_user_skill(
        &self,
        user: UserId,
        skill: SkillId,
        mastery_level: u8,
    ) -> Result<UserSkill> {
        self.store.upsert_user_skill(user, skill, mastery_level).await
    }

    /// Remove a user skill; returns whether it existed
    pub async fn remove_user_skill(&self, user: UserId, skill: SkillId) -> Result<bool> {
        self.store.remove_user_skill(user, skill).await
    }

    /// List a user's roadmaps, optionally active only
    pub async fn roadmaps(&self, user: UserId, active_only: bool) -> Result<Vec<LearningRoadmap>> {
        self.roadmaps.roadmaps(user, active_only).await
    }

    /// Structure generated content into a stored roadmap
    pub async fn create_roadmap(&self, user: UserId, spec: RoadmapSpec) -> Result<LearningRoadmap> {
        self.roadmaps.create_roadmap(user, spec).await
    }

    /// Record progress on a resource, applying completion boosts
    pub async fn update_resource_progress(
        &self,
        resource_id: ResourceId,
        progress: u8,
    ) -> Result<ProgressReceipt> {
        self.roadmaps
            .update_resource_progress(resource_id, progress)
            .await
    }

    /// First unfinished resource in a roadmap
    pub async fn next_resource(&self, roadmap_id: RoadmapId) -> Result<Option<NextResource>> {
        self.roadmaps.next_resource(roadmap_id).await
    }

    /// Toggle a roadmap's active flag
    pub async fn set_roadmap_active(&self, roadmap_id: RoadmapId, active: bool) -> Result<()> {
        self.roadmaps.set_active(roadmap_id, active).await
    }

    /// Delete a roadmap and everything it owns
    pub async fn delete_roadmap(&self, roadmap_id: RoadmapId) -> Result<bool> {
        self.roadmaps.delete_roadmap(roadmap_id).await
    }
}
