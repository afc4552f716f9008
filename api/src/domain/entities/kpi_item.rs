//! KPI item domain entities
//!
//! A KPI item is one weighted scoring rule inside a pillar.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metric::MetricKey;
use super::period::PeriodKey;
use super::person::PersonId;
use super::pillar::PillarId;

/// Unique identifier for a KPI item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KpiItemId(pub Uuid);

impl KpiItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KpiItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for KpiItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for KpiItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the raw value for a KPI comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputSource {
    Admin,
    Tl,
    System,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Admin => write!(f, "ADMIN"),
            InputSource::Tl => write!(f, "TL"),
            InputSource::System => write!(f, "SYSTEM"),
        }
    }
}

impl std::str::FromStr for InputSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(InputSource::Admin),
            "TL" => Ok(InputSource::Tl),
            "SYSTEM" => Ok(InputSource::System),
            _ => Err(format!("Unknown input source: {}", s)),
        }
    }
}

/// A scoring rule. `weight` is the most points the KPI can contribute.
#[derive(Debug, Clone, Serialize)]
pub struct KpiItem {
    pub id: KpiItemId,
    pub pillar_id: PillarId,
    pub name: String,
    pub weight: f64,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub frequency: Option<String>,
    pub input_source: InputSource,
    pub applies_to_tl: bool,
    pub applies_to_salesman: bool,
    /// Explicit metric binding; `None` for items created before the column existed
    pub metric_key: Option<MetricKey>,
    pub notes: Option<String>,
}

impl KpiItem {
    /// The metric this KPI is scored against.
    ///
    /// An explicit `metric_key` always wins. Without one the display name is
    /// looked up in the legacy name table.
    pub fn resolved_metric_key(&self) -> Option<MetricKey> {
        self.metric_key
            .or_else(|| MetricKey::from_kpi_name(&self.name))
    }
}

/// Per-person override of a KPI target for one period
#[derive(Debug, Clone)]
pub struct PersonKpiTarget {
    pub person_id: PersonId,
    pub kpi_item_id: KpiItemId,
    pub period: PeriodKey,
    pub target_value: f64,
}
