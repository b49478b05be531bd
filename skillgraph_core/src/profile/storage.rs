//! Storage abstraction for user skill profiles
//!
//! Provides trait-based storage with an in-memory implementation. A single
//! write lock over the profile state serializes mutation per store, which
//! makes every upsert atomic per (user, skill) key and lets `apply_boost`
//! check and consume its idempotence flag in the same critical section as
//! the mastery increment.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::mastery::Mastery;
use super::types::{BoostKey, BoostOutcome, UserId, UserSkill};
use crate::catalog::types::{RoleId, SkillId};
use crate::errors::Result;

/// Storage trait for user skill profiles (allows test mocks)
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Point-in-time snapshot of a user's skills
    async fn user_skills(&self, user: UserId) -> Result<Vec<UserSkill>>;

    /// Get a single user skill
    async fn user_skill(&self, user: UserId, skill: SkillId) -> Result<Option<UserSkill>>;

    /// Create or overwrite a user skill, atomically per (user, skill)
    async fn upsert(&self, user: UserId, skill: SkillId, mastery: Mastery) -> Result<UserSkill>;

    /// Remove a user skill; returns whether it existed
    async fn remove(&self, user: UserId, skill: SkillId) -> Result<bool>;

    /// Apply a completion boost at most once per key
    ///
    /// The flag check, flag set, and mastery increment happen atomically
    /// (compare-and-set semantics): concurrent calls with the same key
    /// apply the increment exactly once. Creates the skill row at
    /// `mastery = increment` when the user does not yet hold the skill.
    async fn apply_boost(
        &self,
        user: UserId,
        skill: SkillId,
        key: BoostKey,
        increment: u8,
    ) -> Result<BoostOutcome>;

    /// Record the user's chosen target role
    async fn set_target_role(&self, user: UserId, role: RoleId) -> Result<()>;

    /// The user's chosen target role, if any
    async fn target_role(&self, user: UserId) -> Result<Option<RoleId>>;
}

struct ProfileState {
    skills: IndexMap<(UserId, SkillId), UserSkill>,
    applied_boosts: HashSet<(UserId, BoostKey)>,
    target_roles: HashMap<UserId, RoleId>,
}

/// In-memory profile storage
pub struct InMemoryProfileStorage {
    state: Arc<RwLock<ProfileState>>,
}

impl InMemoryProfileStorage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ProfileState {
                skills: IndexMap::new(),
                applied_boosts: HashSet::new(),
                target_roles: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryProfileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStorage for InMemoryProfileStorage {
    async fn user_skills(&self, user: UserId) -> Result<Vec<UserSkill>> {
        let state = self.state.read().await;
        Ok(state
            .skills
            .values()
            .filter(|us| us.user_id == user)
            .cloned()
            .collect())
    }

    async fn user_skill(&self, user: UserId, skill: SkillId) -> Result<Option<UserSkill>> {
        let state = self.state.read().await;
        Ok(state.skills.get(&(user, skill)).cloned())
    }

    async fn upsert(&self, user: UserId, skill: SkillId, mastery: Mastery) -> Result<UserSkill> {
        let mut state = self.state.write().await;
        let row = UserSkill::new(user, skill, mastery);
        state.skills.insert((user, skill), row.clone());
        tracing::debug!(%user, %skill, mastery = mastery.get(), "user skill upserted");
        Ok(row)
    }

    async fn remove(&self, user: UserId, skill: SkillId) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.skills.shift_remove(&(user, skill)).is_some())
    }

    async fn apply_boost(
        &self,
        user: UserId,
        skill: SkillId,
        key: BoostKey,
        increment: u8,
    ) -> Result<BoostOutcome> {
        let mut state = self.state.write().await;

        // Flag check and set are under the same write lock as the
        // increment; a second caller with the same key sees the flag.
        if !state.applied_boosts.insert((user, key)) {
            let mastery = state
                .skills
                .get(&(user, skill))
                .map(|us| us.mastery)
                .unwrap_or_default();
            return Ok(BoostOutcome::AlreadyApplied { mastery });
        }

        let current = state
            .skills
            .get(&(user, skill))
            .map(|us| us.mastery)
            .unwrap_or_default();
        let boosted = current.boosted(increment);
        state
            .skills
            .insert((user, skill), UserSkill::new(user, skill, boosted));
        tracing::info!(%user, %skill, mastery = boosted.get(), "completion boost applied");
        Ok(BoostOutcome::Applied { mastery: boosted })
    }

    async fn set_target_role(&self, user: UserId, role: RoleId) -> Result<()> {
        let mut state = self.state.write().await;
        state.target_roles.insert(user, role);
        Ok(())
    }

    async fn target_role(&self, user: UserId) -> Result<Option<RoleId>> {
        let state = self.state.read().await;
        Ok(state.target_roles.get(&user).copied())
    }
}
