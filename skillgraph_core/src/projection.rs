//! Visualization projection
//!
//! Flattens the skill graph into a nodes/links payload for external
//! rendering. Layout, pan/zoom, and drawing are UI concerns; this is a
//! pure read transform with no state of its own.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::catalog::types::{RelationshipKind, SkillId};
use crate::errors::Result;
use crate::policy::PolicyConfig;
use crate::profile::mastery::Mastery;
use crate::profile::{SkillGraphStore, UserId};

/// One skill node of the visualization payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub skill_id: SkillId,
    pub name: String,
    pub category: String,
    /// 0 when the user does not hold the skill
    pub mastery_level: u8,
    pub is_user_skill: bool,
}

/// One relationship link of the visualization payload
///
/// Both endpoints are guaranteed to appear in the node set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: SkillId,
    pub target: SkillId,
    pub kind: RelationshipKind,
}

/// Per-category rollup of a user's held skills
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub skills: usize,
    pub average_mastery: f64,
    /// Held skills at or above the proficiency bar
    pub mastered: usize,
}

/// Summary block of the visualization payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub total_user_skills: usize,
    pub average_mastery: f64,
    pub categories: Vec<CategorySummary>,
}

/// Complete payload handed to the rendering layer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisualizationData {
    pub user_id: UserId,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub summary: ProfileSummary,
    pub generated_at: DateTime<Utc>,
}

/// Read-only projection over the skill graph store
pub struct VisualizationProjection {
    store: Arc<SkillGraphStore>,
    policy: PolicyConfig,
}

impl VisualizationProjection {
    /// Create a new projection with default policy
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

    /// Project the graph for a user
    ///
    /// With `user_skills_only` the node set is intersected with the user's
    /// held skills; links are then filtered to pairs whose endpoints both
    /// survive.
    pub async fn project(&self, user: UserId, user_skills_only: bool) -> Result<VisualizationData> {
        let catalog = self.store.catalog();
        let held: HashMap<SkillId, Mastery> = self
            .store
            .user_skills(user)
            .await?
            .into_iter()
            .map(|us| (us.skill_id, us.mastery))
            .collect();

        let mut nodes = Vec::new();
        for entry in catalog.skills().await? {
            let mastery = held.get(&entry.id).copied();
            if user_skills_only && mastery.is_none() {
                continue;
            }
            nodes.push(GraphNode {
                skill_id: entry.id,
                name: entry.name,
                category: entry.category,
                mastery_level: mastery.unwrap_or_default().get(),
                is_user_skill: mastery.is_some(),
            });
        }

        let node_ids: HashSet<SkillId> = nodes.iter().map(|n| n.skill_id).collect();
        let links = catalog
            .all_relationships()
            .await?
            .into_iter()
            .filter(|rel| node_ids.contains(&rel.source) && node_ids.contains(&rel.target))
            .map(|rel| GraphLink {
                source: rel.source,
                target: rel.target,
                kind: rel.kind,
            })
            .collect();

        let summary = self.summarize(&nodes);

        Ok(VisualizationData {
            user_id: user,
            nodes,
            links,
            summary,
            generated_at: Utc::now(),
        })
    }

    /// Roll the user's held skills up per category
    fn summarize(&self, nodes: &[GraphNode]) -> ProfileSummary {
        let bar = self.policy.default_target_mastery.get();

        let mut per_category: IndexMap<&str, (usize, u64, usize)> = IndexMap::new();
        let mut total = 0usize;
        let mut mastery_sum = 0u64;

        for node in nodes.iter().filter(|n| n.is_user_skill) {
            total += 1;
            mastery_sum += u64::from(node.mastery_level);

            let slot = per_category.entry(node.category.as_str()).or_default();
            slot.0 += 1;
            slot.1 += u64::from(node.mastery_level);
            if node.mastery_level >= bar {
                slot.2 += 1;
            }
        }

        let categories = per_category
            .into_iter()
            .map(|(category, (skills, sum, mastered))| CategorySummary {
                category: category.to_string(),
                skills,
                average_mastery: sum as f64 / skills as f64,
                mastered,
            })
            .collect();

        ProfileSummary {
            total_user_skills: total,
            average_mastery: if total > 0 {
                mastery_sum as f64 / total as f64
            } else {
                0.0
            },
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    async fn fixture() -> (Arc<InMemoryCatalog>, Arc<SkillGraphStore>) {
        let catalog = Arc::new(InMemoryCatalog::new());
        let store = Arc::new(SkillGraphStore::in_memory(catalog.clone()));
        (catalog, store)
    }

    #[tokio::test]
    async fn test_nodes_cover_catalog_with_zero_mastery() {
        let (catalog, store) = fixture().await;
        let held = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let unheld = catalog.insert_skill("Go", "Programming").await.unwrap();

        let user = UserId::new();
        store.upsert_user_skill(user, held.id, 80).await.unwrap();

        let projection = VisualizationProjection::new(store);
        let data = projection.project(user, false).await.unwrap();

        assert_eq!(data.nodes.len(), 2);
        let held_node = data.nodes.iter().find(|n| n.skill_id == held.id).unwrap();
        assert!(held_node.is_user_skill);
        assert_eq!(held_node.mastery_level, 80);
        let unheld_node = data.nodes.iter().find(|n| n.skill_id == unheld.id).unwrap();
        assert!(!unheld_node.is_user_skill);
        assert_eq!(unheld_node.mastery_level, 0);
    }

    #[tokio::test]
    async fn test_user_only_filter_drops_links_to_filtered_nodes() {
        let (catalog, store) = fixture().await;
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

        let user = UserId::new();
        store.upsert_user_skill(user, a.id, 60).await.unwrap();
        store.upsert_user_skill(user, b.id, 40).await.unwrap();

        let projection = VisualizationProjection::new(store);
        let data = projection.project(user, true).await.unwrap();

        assert_eq!(data.nodes.len(), 2);
        // The Sass link dies with its filtered endpoint
        assert_eq!(data.links.len(), 1);
        assert_eq!(data.links[0].source, a.id);
    }

    #[tokio::test]
    async fn test_links_never_reference_absent_nodes() {
        let (catalog, store) = fixture().await;
        let a = catalog.insert_skill("SQL", "Data").await.unwrap();
        let b = catalog.insert_skill("Spark", "Data").await.unwrap();
        catalog
            .insert_relationship(a.id, b.id, RelationshipKind::Prerequisite)
            .await
            .unwrap();

        let projection = VisualizationProjection::new(store);
        let data = projection.project(UserId::new(), false).await.unwrap();

        let ids: HashSet<SkillId> = data.nodes.iter().map(|n| n.skill_id).collect();
        for link in &data.links {
            assert!(ids.contains(&link.source));
            assert!(ids.contains(&link.target));
        }
    }

    #[tokio::test]
    async fn test_summary_rolls_up_categories() {
        let (catalog, store) = fixture().await;
        let rust = catalog.insert_skill("Rust", "Programming").await.unwrap();
        let go = catalog.insert_skill("Go", "Programming").await.unwrap();
        let sql = catalog.insert_skill("SQL", "Data").await.unwrap();

        let user = UserId::new();
        store.upsert_user_skill(user, rust.id, 90).await.unwrap();
        store.upsert_user_skill(user, go.id, 30).await.unwrap();
        store.upsert_user_skill(user, sql.id, 70).await.unwrap();

        let projection = VisualizationProjection::new(store);
        let data = projection.project(user, false).await.unwrap();

        assert_eq!(data.summary.total_user_skills, 3);
        assert!((data.summary.average_mastery - 190.0 / 3.0).abs() < 1e-9);

        let programming = data
            .summary
            .categories
            .iter()
            .find(|c| c.category == "Programming")
            .unwrap();
        assert_eq!(programming.skills, 2);
        assert_eq!(programming.mastered, 1);
        assert!((programming.average_mastery - 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_payload_serializes() {
        let (catalog, store) = fixture().await;
        catalog.insert_skill("Rust", "Programming").await.unwrap();

        let projection = VisualizationProjection::new(store);
        let data = projection.project(UserId::new(), false).await.unwrap();

        let json = serde_json::to_value(&data).unwrap();
        assert!(json["nodes"].is_array());
        assert!(json["links"].is_array());
        assert_eq!(json["summary"]["total_user_skills"], 0);
    }
}
