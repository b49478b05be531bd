//! Catalog data model
//!
//! Defines the shared reference entities:
//! - SkillCatalogEntry: globally administered skill definitions
//! - SkillRelationship: typed directed edges between skills
//! - CareerRole: job profiles with weighted skill requirements

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::profile::mastery::Mastery;

/// Unique identifier for a catalog skill
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub Uuid);

impl SkillId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SkillId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a career role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub Uuid);

impl RoleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A skill in the global catalog
///
/// Reference data administered outside the core. Identity is immutable once
/// a UserSkill references it. Names are unique within a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillCatalogEntry {
    pub id: SkillId,
    pub name: String,
    pub category: String,
}

/// Kind of a directed skill relationship
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Source must be learned before target
    Prerequisite,
    /// Source and target are commonly learned or used together
    Related,
    /// Source is a narrower specialization of target
    SubsetOf,
}

/// Directed, typed edge between two catalog skills
///
/// The relationship set forms a directed graph. Self-loops are rejected at
/// insertion; cycles are legal and consumers must tolerate them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRelationship {
    pub source: SkillId,
    pub target: SkillId,
    pub kind: RelationshipKind,
}

/// Experience level of a career role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Principal,
}

/// Bounded requirement weight (0, 1]
///
/// Weights express independent importance, not a probability distribution:
/// they need not sum to 1 across a role. NaN and out-of-range values are
/// rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Weight(f64);

#[derive(Error, Debug)]
pub enum WeightError {
    #[error("weight cannot be NaN")]
    NaN,

    #[error("weight out of bounds: {value} (must be > {min} and <= {max})")]
    OutOfBounds { value: f64, min: f64, max: f64 },
}

impl Weight {
    const MIN_EXCLUSIVE: f64 = 0.0;
    const MAX: f64 = 1.0;

    /// Create a new weight with bounds validation
    ///
    /// # Errors
    /// - Returns `WeightError::NaN` if value is NaN
    /// - Returns `WeightError::OutOfBounds` if value <= 0.0 or > 1.0
    pub fn new(value: f64) -> Result<Self, WeightError> {
        if value.is_nan() {
            return Err(WeightError::NaN);
        }
        if value <= Self::MIN_EXCLUSIVE || value > Self::MAX {
            return Err(WeightError::OutOfBounds {
                value,
                min: Self::MIN_EXCLUSIVE,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying f64 value
    pub fn get(self) -> f64 {
        self.0
    }

    /// Full importance (1.0), the default for unweighted targets
    pub fn full() -> Self {
        Self(1.0)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::full()
    }
}

impl TryFrom<f64> for Weight {
    type Error = WeightError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A single skill requirement of a career role
///
/// `target` is the explicit proficiency bar for this requirement; when
/// absent, gap analysis falls back to the policy default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleSkillRequirement {
    pub skill_id: SkillId,
    pub weight: Weight,
    pub target: Option<Mastery>,
}

impl RoleSkillRequirement {
    pub fn new(skill_id: SkillId, weight: Weight) -> Self {
        Self {
            skill_id,
            weight,
            target: None,
        }
    }

    pub fn with_target(mut self, target: Mastery) -> Self {
        self.target = Some(target);
        self
    }
}

/// A career role with its ordered skill requirements
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CareerRole {
    pub id: RoleId,
    pub title: String,
    pub level: RoleLevel,
    pub requirements: Vec<RoleSkillRequirement>,
}
