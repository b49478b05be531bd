//! Directed relationship graph over catalog skills

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use indexmap::IndexSet; // For deterministic ordering

use super::types::{RelationshipKind, SkillId, SkillRelationship};
use crate::errors::{Result, SkillGraphError};

/// Typed relationship graph between catalog skills
///
/// Edge direction follows the relationship: for `Prerequisite`,
/// source -> target means "source must be learned before target".
/// Cycles are legal; self-loops are not.
pub struct RelationGraph {
    graph: DiGraph<SkillId, RelationshipKind>,
    node_indices: HashMap<SkillId, NodeIndex>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Add a relationship edge
    ///
    /// Rejects self-loops. Re-adding an identical edge is a no-op.
    pub fn add_relationship(&mut self, rel: SkillRelationship) -> Result<()> {
        if rel.source == rel.target {
            return Err(SkillGraphError::SelfRelationship(rel.source));
        }

        let from_idx = self.get_or_create_node(rel.source);
        let to_idx = self.get_or_create_node(rel.target);

        let exists = self
            .graph
            .edges_connecting(from_idx, to_idx)
            .any(|e| *e.weight() == rel.kind);
        if exists {
            return Ok(()); // Already present, no-op
        }

        self.graph.add_edge(from_idx, to_idx, rel.kind);
        Ok(())
    }

    /// All relationships touching a skill, both directions
    pub fn relationships_for(&self, skill: SkillId) -> Vec<SkillRelationship> {
        let node_idx = match self.node_indices.get(&skill) {
            Some(idx) => *idx,
            None => return Vec::new(), // Skill has no edges
        };

        let mut result = Vec::new();
        for edge in self.graph.edges_directed(node_idx, Direction::Outgoing) {
            result.push(SkillRelationship {
                source: self.graph[edge.source()],
                target: self.graph[edge.target()],
                kind: *edge.weight(),
            });
        }
        for edge in self.graph.edges_directed(node_idx, Direction::Incoming) {
            result.push(SkillRelationship {
                source: self.graph[edge.source()],
                target: self.graph[edge.target()],
                kind: *edge.weight(),
            });
        }
        result
    }

    /// Every relationship in the graph
    pub fn all_relationships(&self) -> Vec<SkillRelationship> {
        self.graph
            .edge_references()
            .map(|edge| SkillRelationship {
                source: self.graph[edge.source()],
                target: self.graph[edge.target()],
                kind: *edge.weight(),
            })
            .collect()
    }

    /// Direct neighbors reached by outgoing edges
    pub fn neighbors_out(&self, skill: SkillId) -> IndexSet<SkillId> {
        self.neighbors(skill, Direction::Outgoing)
    }

    /// Direct neighbors reaching this skill by incoming edges
    pub fn neighbors_in(&self, skill: SkillId) -> IndexSet<SkillId> {
        self.neighbors(skill, Direction::Incoming)
    }

    fn neighbors(&self, skill: SkillId, direction: Direction) -> IndexSet<SkillId> {
        let mut result = IndexSet::new();
        let node_idx = match self.node_indices.get(&skill) {
            Some(idx) => *idx,
            None => return result,
        };
        for neighbor in self.graph.neighbors_directed(node_idx, direction) {
            result.insert(self.graph[neighbor]);
        }
        result
    }

    /// Transitive closure of prerequisites for a skill
    ///
    /// Follows `Prerequisite` edges backwards from the skill. Cycles are
    /// tolerated; the visited set bounds the walk.
    pub fn prerequisite_chain(&self, skill: SkillId) -> IndexSet<SkillId> {
        let mut chain = IndexSet::new();
        let start = match self.node_indices.get(&skill) {
            Some(idx) => *idx,
            None => return chain,
        };

        let mut visited = HashSet::new();
        visited.insert(start);
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            for edge in self.graph.edges_directed(node, Direction::Incoming) {
                if *edge.weight() != RelationshipKind::Prerequisite {
                    continue;
                }
                let source = edge.source();
                if visited.insert(source) {
                    chain.insert(self.graph[source]);
                    stack.push(source);
                }
            }
        }
        chain
    }

    /// Detect all cycles in the relationship graph
    ///
    /// Diagnostic only: cycles are legal in this graph, and consumers such
    /// as the visualization projection must tolerate them.
    pub fn detect_cycles(&self) -> Vec<Vec<SkillId>> {
        let sccs = tarjan_scc(&self.graph);

        sccs.into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(|idx| self.graph[idx]).collect())
            .collect()
    }

    fn get_or_create_node(&mut self, skill: SkillId) -> NodeIndex {
        match self.node_indices.get(&skill) {
            Some(idx) => *idx,
            None => {
                let idx = self.graph.add_node(skill);
                self.node_indices.insert(skill, idx);
                idx
            }
        }
    }
}

impl Default for RelationGraph {
    fn default() -> Self {
        Self::new()
    }
}
