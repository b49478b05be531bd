//! User skill profiles and the skill graph store
//!
//! This module owns the user-held side of the skill graph: mastery levels,
//! the at-most-once completion-boost accounting, and target-role
//! bookkeeping. The `SkillGraphStore` facade composes the injected catalog
//! with profile storage and enforces the cross-store invariants.

pub mod mastery;
pub mod storage;
pub mod types;

// Public exports
pub use mastery::{Mastery, MasteryError};
pub use storage::{InMemoryProfileStorage, ProfileStorage};
pub use types::{BoostKey, BoostOutcome, UserId, UserSkill};

use std::sync::Arc;

use crate::catalog::types::{RoleId, SkillId, SkillRelationship};
use crate::catalog::CatalogRepository;
use crate::errors::{Result, SkillGraphError};

/// Canonical store for user-held skills
///
/// Validates every mutation against the catalog before it reaches storage:
/// mastery range first, then catalog membership, so a failed call leaves
/// the profile untouched.
pub struct SkillGraphStore {
    catalog: Arc<dyn CatalogRepository>,
    profiles: Arc<dyn ProfileStorage>,
}

impl SkillGraphStore {
    pub fn new(catalog: Arc<dyn CatalogRepository>, profiles: Arc<dyn ProfileStorage>) -> Self {
        Self { catalog, profiles }
    }

    /// Store backed by in-memory profile storage
    pub fn in_memory(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self::new(catalog, Arc::new(InMemoryProfileStorage::new()))
    }

    /// The injected catalog, shared with the analytics engines
    pub fn catalog(&self) -> Arc<dyn CatalogRepository> {
        Arc::clone(&self.catalog)
    }

    /// Point-in-time snapshot of a user's skills
    pub async fn user_skills(&self, user: UserId) -> Result<Vec<UserSkill>> {
        self.profiles.user_skills(user).await
    }

    /// Get a single user skill
    pub async fn user_skill(&self, user: UserId, skill: SkillId) -> Result<Option<UserSkill>> {
        self.profiles.user_skill(user, skill).await
    }

    /// Create or update a user's mastery of a skill
    ///
    /// Fails with `InvalidMastery` when the level is outside [0, 100] and
    /// with `UnknownSkill` when the id is absent from the catalog; in both
    /// cases nothing is written.
    pub async fn upsert_user_skill(
        &self,
        user: UserId,
        skill: SkillId,
        mastery_level: u8,
    ) -> Result<UserSkill> {
        let mastery = Mastery::new(mastery_level)?;
        if self.catalog.skill(skill).await?.is_none() {
            return Err(SkillGraphError::UnknownSkill(skill));
        }
        self.profiles.upsert(user, skill, mastery).await
    }

    /// Remove a user skill; returns whether it existed
    pub async fn remove_user_skill(&self, user: UserId, skill: SkillId) -> Result<bool> {
        self.profiles.remove(user, skill).await
    }

    /// All relationships touching a skill, both directions
    pub async fn relationships(&self, skill: SkillId) -> Result<Vec<SkillRelationship>> {
        self.catalog.relationships(skill).await
    }

    /// Apply a roadmap completion boost, at most once per key
    ///
    /// The skill is expected to exist in the catalog (validated when the
    /// roadmap was created). Idempotence is guaranteed by the storage
    /// layer's compare-and-set on the boost key.
    pub async fn apply_completion_boost(
        &self,
        user: UserId,
        skill: SkillId,
        key: BoostKey,
        increment: u8,
    ) -> Result<BoostOutcome> {
        self.profiles.apply_boost(user, skill, key, increment).await
    }

    /// Record the user's chosen target role
    ///
    /// Fails with `UnknownRole` when the role does not exist. Pure
    /// bookkeeping: gates which role default gap analysis uses.
    pub async fn set_target_role(&self, user: UserId, role: RoleId) -> Result<()> {
        if self.catalog.role(role).await?.is_none() {
            return Err(SkillGraphError::UnknownRole(role));
        }
        self.profiles.set_target_role(user, role).await
    }

    /// The user's chosen target role, if any
    pub async fn target_role(&self, user: UserId) -> Result<Option<RoleId>> {
        self.profiles.target_role(user).await
    }
}
