//! Shared skill and role catalog
//!
//! Process-wide reference data: the skill ontology, typed relationships
//! between skills, and career roles with weighted requirements. Read-mostly
//! and externally administered; analytics components receive it as an
//! injected read-only repository so tests can substitute a fixed catalog.

pub mod graph;
pub mod types;

// Public exports
pub use graph::RelationGraph;
pub use types::{
    CareerRole, RelationshipKind, RoleId, RoleLevel, RoleSkillRequirement, SkillCatalogEntry,
    SkillId, SkillRelationship, Weight, WeightError,
};

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::{Result, SkillGraphError};

/// Read-only catalog repository (allows test substitutes)
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Get a skill by id
    async fn skill(&self, id: SkillId) -> Result<Option<SkillCatalogEntry>>;

    /// List all skills in insertion order
    async fn skills(&self) -> Result<Vec<SkillCatalogEntry>>;

    /// Get a role with its requirements
    async fn role(&self, id: RoleId) -> Result<Option<CareerRole>>;

    /// List all roles in insertion order
    async fn roles(&self) -> Result<Vec<CareerRole>>;

    /// All relationships touching a skill, both directions
    ///
    /// Fails with `UnknownSkill` when the id is absent from the catalog.
    async fn relationships(&self, skill_id: SkillId) -> Result<Vec<SkillRelationship>>;

    /// Every relationship in the catalog
    async fn all_relationships(&self) -> Result<Vec<SkillRelationship>>;
}

struct CatalogState {
    skills: IndexMap<SkillId, SkillCatalogEntry>,
    names: HashSet<(String, String)>,
    roles: IndexMap<RoleId, CareerRole>,
    relations: RelationGraph,
}

/// In-memory catalog
///
/// Seeding methods (`insert_*`) stand in for catalog administration, which
/// lives outside the core; they validate referential integrity so every
/// relationship endpoint and role requirement resolves to a real skill.
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState {
                skills: IndexMap::new(),
                names: HashSet::new(),
                roles: IndexMap::new(),
                relations: RelationGraph::new(),
            })),
        }
    }

    /// Add a skill to the catalog
    ///
    /// Names are unique within a category.
    pub async fn insert_skill(
        &self,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<SkillCatalogEntry> {
        let name = name.into();
        let category = category.into();

        let mut state = self.state.write().await;
        if !state.names.insert((category.clone(), name.clone())) {
            return Err(SkillGraphError::DuplicateSkillName { name, category });
        }

        let entry = SkillCatalogEntry {
            id: SkillId::new(),
            name,
            category,
        };
        state.skills.insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Add a role with its ordered requirements
    ///
    /// Every required skill must already exist in the catalog.
    pub async fn insert_role(
        &self,
        title: impl Into<String>,
        level: RoleLevel,
        requirements: Vec<RoleSkillRequirement>,
    ) -> Result<CareerRole> {
        let mut state = self.state.write().await;
        for req in &requirements {
            if !state.skills.contains_key(&req.skill_id) {
                return Err(SkillGraphError::UnknownSkill(req.skill_id));
            }
        }

        let role = CareerRole {
            id: RoleId::new(),
            title: title.into(),
            level,
            requirements,
        };
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    /// Add a directed relationship between two existing skills
    pub async fn insert_relationship(
        &self,
        source: SkillId,
        target: SkillId,
        kind: RelationshipKind,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.skills.contains_key(&source) {
            return Err(SkillGraphError::UnknownSkill(source));
        }
        if !state.skills.contains_key(&target) {
            return Err(SkillGraphError::UnknownSkill(target));
        }
        state.relations.add_relationship(SkillRelationship {
            source,
            target,
            kind,
        })
    }

    /// Transitive prerequisite closure for a skill
    pub async fn prerequisite_chain(&self, skill: SkillId) -> Result<indexmap::IndexSet<SkillId>> {
        let state = self.state.read().await;
        if !state.skills.contains_key(&skill) {
            return Err(SkillGraphError::UnknownSkill(skill));
        }
        Ok(state.relations.prerequisite_chain(skill))
    }

    /// Cycles present in the relationship graph (diagnostic)
    pub async fn detect_cycles(&self) -> Vec<Vec<SkillId>> {
        let state = self.state.read().await;
        state.relations.detect_cycles()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn skill(&self, id: SkillId) -> Result<Option<SkillCatalogEntry>> {
        let state = self.state.read().await;
        Ok(state.skills.get(&id).cloned())
    }

    async fn skills(&self) -> Result<Vec<SkillCatalogEntry>> {
        let state = self.state.read().await;
        Ok(state.skills.values().cloned().collect())
    }

    async fn role(&self, id: RoleId) -> Result<Option<CareerRole>> {
        let state = self.state.read().await;
        Ok(state.roles.get(&id).cloned())
    }

    async fn roles(&self) -> Result<Vec<CareerRole>> {
        let state = self.state.read().await;
        Ok(state.roles.values().cloned().collect())
    }

    async fn relationships(&self, skill_id: SkillId) -> Result<Vec<SkillRelationship>> {
        let state = self.state.read().await;
        if !state.skills.contains_key(&skill_id) {
            return Err(SkillGraphError::UnknownSkill(skill_id));
        }
        Ok(state.relations.relationships_for(skill_id))
    }

    async fn all_relationships(&self) -> Result<Vec<SkillRelationship>> {
        let state = self.state.read().await;
        Ok(state.relations.all_relationships())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get_skill() {
        let catalog = InMemoryCatalog::new();
        let entry = catalog.insert_skill("Rust", "Programming").await.unwrap();

        let found = catalog.skill(entry.id).await.unwrap();
        assert_eq!(found.unwrap().name, "Rust");
    }

    #[tokio::test]
    async fn test_duplicate_name_in_category_rejected() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_skill("Rust", "Programming").await.unwrap();

        let result = catalog.insert_skill("Rust", "Programming").await;
        assert!(matches!(
            result,
            Err(SkillGraphError::DuplicateSkillName { .. })
        ));
    }

    #[tokio::test]
    async fn test_same_name_different_category_allowed() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_skill("Modeling", "Data").await.unwrap();
        assert!(catalog.insert_skill("Modeling", "Design").await.is_ok());
    }

    #[tokio::test]
    async fn test_role_requires_existing_skills() {
        let catalog = InMemoryCatalog::new();
        let req = RoleSkillRequirement::new(SkillId::new(), Weight::full());

        let result = catalog.insert_role("Backend Engineer", RoleLevel::Mid, vec![req]).await;
        assert!(matches!(result, Err(SkillGraphError::UnknownSkill(_))));
    }

    #[tokio::test]
    async fn test_relationship_requires_existing_endpoints() {
        let catalog = InMemoryCatalog::new();
        let rust = catalog.insert_skill("Rust", "Programming").await.unwrap();

        let result = catalog
            .insert_relationship(rust.id, SkillId::new(), RelationshipKind::Related)
            .await;
        assert!(matches!(result, Err(SkillGraphError::UnknownSkill(_))));
    }

    #[tokio::test]
    async fn test_relationships_both_directions() {
        let catalog = InMemoryCatalog::new();
        let a = catalog.insert_skill("HTML", "Web").await.unwrap();
        let b = catalog.insert_skill("CSS", "Web").await.unwrap();
        let c = catalog.insert_skill("Sass", "Web").await.unwrap();

        catalog
            .insert_relationship(a.id, b.id, RelationshipKind::Related)
            .await
            .unwrap();
        catalog
            .insert_relationship(c.id, b.id, RelationshipKind::SubsetOf)
            .await
            .unwrap();

        let rels = catalog.relationships(b.id).await.unwrap();
        assert_eq!(rels.len(), 2);
    }

    #[tokio::test]
    async fn test_relationships_for_unknown_skill_fails() {
        let catalog = InMemoryCatalog::new();
        let result = catalog.relationships(SkillId::new()).await;
        assert!(matches!(result, Err(SkillGraphError::UnknownSkill(_))));
    }

    #[tokio::test]
    async fn test_skills_listed_in_insertion_order() {
        let catalog = InMemoryCatalog::new();
        let first = catalog.insert_skill("SQL", "Data").await.unwrap();
        let second = catalog.insert_skill("Python", "Programming").await.unwrap();

        let skills = catalog.skills().await.unwrap();
        assert_eq!(skills[0].id, first.id);
        assert_eq!(skills[1].id, second.id);
    }
}
