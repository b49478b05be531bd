//! Career alignment scoring
//!
//! Partitions a role's requirements into matching and missing sets against
//! a user's mastery and derives a weighted readiness percentage. The batch
//! recommendations variant runs the same computation over every role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::types::{CareerRole, RoleId, RoleLevel, SkillId};
use crate::errors::{Result, SkillGraphError};
use crate::policy::PolicyConfig;
use crate::profile::mastery::Mastery;
use crate::profile::{SkillGraphStore, UserId};

/// A role requirement with the user's standing against it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequirementStanding {
    pub skill_id: SkillId,
    pub name: String,
    pub mastery: Mastery,
    pub weight: f64,
}

/// Result of aligning a user against one role
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub user_id: UserId,
    pub role_id: RoleId,
    pub role_title: String,
    pub readiness_percentage: f64,
    pub matching: Vec<RequirementStanding>,
    pub missing: Vec<RequirementStanding>,
    pub generated_at: DateTime<Utc>,
}

/// One entry of the per-user role ranking
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleRecommendation {
    pub role_id: RoleId,
    pub title: String,
    pub level: RoleLevel,
    pub readiness_percentage: f64,
}

/// Career alignment engine
pub struct AlignmentEngine {
    store: Arc<SkillGraphStore>,
    policy: PolicyConfig,
}

impl AlignmentEngine {
    /// Create a new engine with default policy
    pub fn new(store: Arc<SkillGraphStore>) -> Self {
        Self {
            store,
            policy: PolicyConfig::default(),
        }
    }

    /// Set custom policy (builder pattern)
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Align a user against one role
    ///
    /// Fails with `UnknownRole` when the role is absent and with
    /// `EmptyRoleRequirements` when it has no requirements: readiness is
    /// undefined there, and a degenerate 0 or 100 would mislead callers.
    pub async fn alignment(&self, user: UserId, role_id: RoleId) -> Result<AlignmentReport> {
        let catalog = self.store.catalog();
        let role = catalog
            .role(role_id)
            .await?
            .ok_or(SkillGraphError::UnknownRole(role_id))?;
        if role.requirements.is_empty() {
            return Err(SkillGraphError::EmptyRoleRequirements(role_id));
        }

        let held = self.held_masteries(user).await?;
        let (matching, missing, readiness) = self.partition(&role, &held).await?;

        Ok(AlignmentReport {
            user_id: user,
            role_id,
            role_title: role.title,
            readiness_percentage: readiness,
            matching,
            missing,
            generated_at: Utc::now(),
        })
    }

    /// Rank every catalog role by readiness, descending
    ///
    /// Roles with no requirements are skipped rather than failing the
    /// batch. Ties break by title for a stable ordering.
    pub async fn recommendations(&self, user: UserId) -> Result<Vec<RoleRecommendation>> {
        let catalog = self.store.catalog();
        let held = self.held_masteries(user).await?;

        let mut ranked = Vec::new();
        for role in catalog.roles().await? {
            if role.requirements.is_empty() {
                tracing::debug!(role = %role.id, "skipping role with no requirements");
                continue;
            }
            let (_, _, readiness) = self.partition(&role, &held).await?;
            ranked.push(RoleRecommendation {
                role_id: role.id,
                title: role.title,
                level: role.level,
                readiness_percentage: readiness,
            });
        }

        ranked.sort_by(|a, b| {
            b.readiness_percentage
                .partial_cmp(&a.readiness_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(ranked)
    }

    /// Record the user's chosen target role
    pub async fn set_target_role(&self, user: UserId, role_id: RoleId) -> Result<()> {
        self.store.set_target_role(user, role_id).await
    }

    async fn held_masteries(&self, user: UserId) -> Result<HashMap<SkillId, Mastery>> {
        Ok(self
            .store
            .user_skills(user)
            .await?
            .into_iter()
            .map(|us| (us.skill_id, us.mastery))
            .collect())
    }

    async fn partition(
        &self,
        role: &CareerRole,
        held: &HashMap<SkillId, Mastery>,
    ) -> Result<(Vec<RequirementStanding>, Vec<RequirementStanding>, f64)> {
        let catalog = self.store.catalog();

        let mut matching = Vec::new();
        let mut missing = Vec::new();
        let mut matched_weight = 0.0;
        let mut total_weight = 0.0;

        for req in &role.requirements {
            let entry = catalog
                .skill(req.skill_id)
                .await?
                .ok_or(SkillGraphError::UnknownSkill(req.skill_id))?;
            let mastery = held.get(&req.skill_id).copied().unwrap_or_default();
            let weight = req.weight.get();
            total_weight += weight;

            let standing = RequirementStanding {
                skill_id: req.skill_id,
                name: entry.name,
                mastery,
                weight,
            };
            if mastery >= self.policy.matching_threshold {
                matched_weight += weight;
                matching.push(standing);
            } else {
                missing.push(standing);
            }
        }

        let readiness = 100.0 * matched_weight / total_weight;
        Ok((matching, missing, readiness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, RoleSkillRequirement, Weight};

    async fn fixture() -> (Arc<InMemoryCatalog>, Arc<SkillGraphStore>) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let store = Arc::new(SkillGraphStore::in_memory(catalog.clone()));
        (catalog, store)
    }

    #[tokio::test]
    async fn test_weighted_readiness() {
        let (catalog, store) = fixture().await;
        let a = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let b = catalog.insert_skill("Kafka", "Data").await.unwrap();
        let role = catalog
            .insert_role(
                "Backend Engineer",
                RoleLevel::Mid,
                vec![
                    RoleSkillRequirement::new(a.id, Weight::new(0.6).unwrap()),
                    RoleSkillRequirement::new(b.id, Weight::new(0.4).unwrap()),
                ],
            )
            .await
            .unwrap();

        let user = UserId::new();
        store.upsert_user_skill(user, a.id, 80).await.unwrap();
        store.upsert_user_skill(user, b.id, 10).await.unwrap();

        let engine = AlignmentEngine::new(store);
        let report = engine.alignment(user, role.id).await.unwrap();

        assert_eq!(report.matching.len(), 1);
        assert_eq!(report.matching[0].skill_id, a.id);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].skill_id, b.id);
        assert!((report.readiness_percentage - 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_threshold_boundary_matches() {
        let (catalog, store) = fixture().await;
        let a = catalog.insert_skill("Sql", "Data").await.unwrap();
        let role = catalog
            .insert_role(
                "Analyst",
                RoleLevel::Junior,
                vec![RoleSkillRequirement::new(a.id, Weight::full())],
            )
            .await
            .unwrap();

        let user = UserId::new();
        store.upsert_user_skill(user, a.id, 50).await.unwrap();

        let engine = AlignmentEngine::new(store);
        let report = engine.alignment(user, role.id).await.unwrap();

        // Exactly at the bar counts as matching
        assert_eq!(report.matching.len(), 1);
        assert_eq!(report.readiness_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_unheld_skill_is_missing() {
        let (catalog, store) = fixture().await;
        let a = catalog.insert_skill("Go", "Programming").await.unwrap();
        let role = catalog
            .insert_role(
                "Cloud Engineer",
                RoleLevel::Mid,
                vec![RoleSkillRequirement::new(a.id, Weight::full())],
            )
            .await
            .unwrap();

        let engine = AlignmentEngine::new(store);
        let report = engine.alignment(UserId::new(), role.id).await.unwrap();

        assert!(report.matching.is_empty());
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].mastery.get(), 0);
        assert_eq!(report.readiness_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_empty_role_surfaced_not_defaulted() {
        let (catalog, store) = fixture().await;
        let role = catalog
            .insert_role("Generalist", RoleLevel::Entry, vec![])
            .await
            .unwrap();

        let engine = AlignmentEngine::new(store);
        let result = engine.alignment(UserId::new(), role.id).await;
        assert!(matches!(
            result,
            Err(SkillGraphError::EmptyRoleRequirements(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let (_, store) = fixture().await;
        let engine = AlignmentEngine::new(store);
        let result = engine.alignment(UserId::new(), RoleId::new()).await;
        assert!(matches!(result, Err(SkillGraphError::UnknownRole(_))));
    }

    #[tokio::test]
    async fn test_recommendations_sorted_descending() {
        let (catalog, store) = fixture().await;
        let a = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let b = catalog.insert_skill("Figma", "Design").await.unwrap();

        let fits = catalog
            .insert_role(
                "Systems Engineer",
                RoleLevel::Mid,
                vec![RoleSkillRequirement::new(a.id, Weight::full())],
            )
            .await
            .unwrap();
        let stretch = catalog
            .insert_role(
                "Product Designer",
                RoleLevel::Mid,
                vec![RoleSkillRequirement::new(b.id, Weight::full())],
            )
            .await
            .unwrap();
        // Roles without requirements are skipped in the batch
        catalog
            .insert_role("Generalist", RoleLevel::Entry, vec![])
            .await
            .unwrap();

        let user = UserId::new();
        store.upsert_user_skill(user, a.id, 90).await.unwrap();

        let engine = AlignmentEngine::new(store);
        let ranked = engine.recommendations(user).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].role_id, fits.id);
        assert_eq!(ranked[0].readiness_percentage, 100.0);
        assert_eq!(ranked[1].role_id, stretch.id);
        assert_eq!(ranked[1].readiness_percentage, 0.0);
    }
}
