//! Gap analysis engine
//!
//! Computes, for a user and a target role or explicit skill set, the
//! per-skill deficiency against target mastery plus a weighted aggregate
//! score. A pure function of current state: no mutation, no side effects.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::scoring::{self, GapPriority};
use crate::catalog::types::{RoleId, SkillId};
use crate::errors::{Result, SkillGraphError};
use crate::policy::PolicyConfig;
use crate::profile::mastery::Mastery;
use crate::profile::{SkillGraphStore, UserId};

/// What to measure the user against
#[derive(Clone, Debug, PartialEq)]
pub enum GapTarget {
    /// A career role's requirements; targets default to the policy bar
    /// when a requirement carries none
    Role(RoleId),
    /// An explicit `(skill, target mastery)` set, weighted 1 per skill.
    /// Duplicate skill ids resolve last-pair-wins.
    Skills(Vec<(SkillId, Mastery)>),
}

/// One skill's deficiency against its target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill_id: SkillId,
    pub name: String,
    pub current: Mastery,
    pub target: Mastery,
    pub gap: u8,
    pub weight: f64,
    pub priority: GapPriority,
}

/// Result of a gap analysis run
///
/// `skills` lists only nonzero gaps, ordered by priority then gap
/// descending; `total_skills` counts every target skill including met
/// ones, and `gap_score` aggregates over all of them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GapReport {
    pub user_id: UserId,
    pub role_id: Option<RoleId>,
    pub total_skills: usize,
    pub skills: Vec<SkillGap>,
    pub gap_score: f64,
    pub estimated_hours: f64,
    pub generated_at: DateTime<Utc>,
}

struct ResolvedTarget {
    skill_id: SkillId,
    name: String,
    target: Mastery,
    weight: f64,
}

/// Gap analysis engine
pub struct GapAnalyzer {
    store: Arc<SkillGraphStore>,
    policy: PolicyConfig,
}

impl GapAnalyzer {
    /// Create a new analyzer with default policy
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

    /// Analyze a user against the given target
    pub async fn analyze(&self, user: UserId, target: GapTarget) -> Result<GapReport> {
        let (targets, role_id) = match target {
            GapTarget::Role(role_id) => (self.resolve_role(role_id).await?, Some(role_id)),
            GapTarget::Skills(pairs) => (self.resolve_skills(pairs).await?, None),
        };

        let held: HashMap<SkillId, Mastery> = self
            .store
            .user_skills(user)
            .await?
            .into_iter()
            .map(|us| (us.skill_id, us.mastery))
            .collect();

        let mut skills = Vec::new();
        let mut entries = Vec::with_capacity(targets.len());
        for resolved in &targets {
            let current = held
                .get(&resolved.skill_id)
                .copied()
                .unwrap_or_default();
            let gap = current.gap_to(resolved.target);
            entries.push((gap, resolved.weight));

            if gap > 0 {
                skills.push(SkillGap {
                    skill_id: resolved.skill_id,
                    name: resolved.name.clone(),
                    current,
                    target: resolved.target,
                    gap,
                    weight: resolved.weight,
                    priority: scoring::classify_priority(gap, &self.policy),
                });
            }
        }

        scoring::order_by_priority(&mut skills);
        let gap_score = scoring::weighted_gap_score(&entries);
        let estimated_hours = scoring::estimate_hours(&skills, &self.policy);

        Ok(GapReport {
            user_id: user,
            role_id,
            total_skills: targets.len(),
            skills,
            gap_score,
            estimated_hours,
            generated_at: Utc::now(),
        })
    }

    /// Analyze against the user's stored target role
    ///
    /// Fails with `TargetRoleNotSet` when the user has not chosen one.
    pub async fn analyze_default(&self, user: UserId) -> Result<GapReport> {
        let role_id = self
            .store
            .target_role(user)
            .await?
            .ok_or(SkillGraphError::TargetRoleNotSet(user))?;
        self.analyze(user, GapTarget::Role(role_id)).await
    }

    async fn resolve_role(&self, role_id: RoleId) -> Result<Vec<ResolvedTarget>> {
        let catalog = self.store.catalog();
        let role = catalog
            .role(role_id)
            .await?
            .ok_or(SkillGraphError::UnknownRole(role_id))?;

        let mut targets = Vec::with_capacity(role.requirements.len());
        for req in &role.requirements {
            let entry = catalog
                .skill(req.skill_id)
                .await?
                .ok_or(SkillGraphError::UnknownSkill(req.skill_id))?;
            targets.push(ResolvedTarget {
                skill_id: req.skill_id,
                name: entry.name,
                target: req.target.unwrap_or(self.policy.default_target_mastery),
                weight: req.weight.get(),
            });
        }
        Ok(targets)
    }

    async fn resolve_skills(&self, pairs: Vec<(SkillId, Mastery)>) -> Result<Vec<ResolvedTarget>> {
        let catalog = self.store.catalog();

        // Last pair wins for duplicate ids
        let mut deduped: IndexMap<SkillId, Mastery> = IndexMap::new();
        for (skill_id, target) in pairs {
            deduped.insert(skill_id, target);
        }

        let mut targets = Vec::with_capacity(deduped.len());
        for (skill_id, target) in deduped {
            let entry = catalog
                .skill(skill_id)
                .await?
                .ok_or(SkillGraphError::UnknownSkill(skill_id))?;
            targets.push(ResolvedTarget {
                skill_id,
                name: entry.name,
                target,
                weight: 1.0,
            });
        }
        Ok(targets)
    }
}
