//! Pillar domain entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PillarId(pub Uuid);

impl PillarId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PillarId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PillarId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PillarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level grouping of KPI items (e.g. "Sales", "Leadership")
///
/// `weight` is the pillar's maximum contribution to a total score. By
/// convention it equals the sum of its KPI weights, but nothing enforces that.
#[derive(Debug, Clone, Serialize)]
pub struct Pillar {
    pub id: PillarId,
    pub name: String,
    pub weight: f64,
}
