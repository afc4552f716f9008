//! Aggregated metric entities
//!
//! A `MetricKey` names one raw figure the aggregator knows how to compute for
//! a person in a period. KPI items point at a key; the scorer compares the
//! key's value against the KPI target.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Closed set of metrics the aggregator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    QuantityActivity,
    SalesFlp,
    Attendance,
    CoachingSessions,
    BriefingSessions,
    TeamSize,
    QuizScore,
    TrainingParticipation,
    AppleLogins,
    ApplePoints,
    MyheroPoints,
    TotalProspects,
    ProspectRatio,
}

impl MetricKey {
    pub const ALL: [MetricKey; 13] = [
        MetricKey::QuantityActivity,
        MetricKey::SalesFlp,
        MetricKey::Attendance,
        MetricKey::CoachingSessions,
        MetricKey::BriefingSessions,
        MetricKey::TeamSize,
        MetricKey::QuizScore,
        MetricKey::TrainingParticipation,
        MetricKey::AppleLogins,
        MetricKey::ApplePoints,
        MetricKey::MyheroPoints,
        MetricKey::TotalProspects,
        MetricKey::ProspectRatio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::QuantityActivity => "quantity_activity",
            MetricKey::SalesFlp => "sales_flp",
            MetricKey::Attendance => "attendance",
            MetricKey::CoachingSessions => "coaching_sessions",
            MetricKey::BriefingSessions => "briefing_sessions",
            MetricKey::TeamSize => "team_size",
            MetricKey::QuizScore => "quiz_score",
            MetricKey::TrainingParticipation => "training_participation",
            MetricKey::AppleLogins => "apple_logins",
            MetricKey::ApplePoints => "apple_points",
            MetricKey::MyheroPoints => "myhero_points",
            MetricKey::TotalProspects => "total_prospects",
            MetricKey::ProspectRatio => "prospect_ratio",
        }
    }

    /// Legacy lookup from a KPI display name.
    ///
    /// Only used for KPI items that predate the `metric_key` column. Renaming
    /// such a KPI breaks the match, so new items should carry an explicit key.
    pub fn from_kpi_name(name: &str) -> Option<Self> {
        match name {
            "Quantity Activity" => Some(MetricKey::QuantityActivity),
            "Sales FLP" => Some(MetricKey::SalesFlp),
            "Disiplin & Kehadiran Tim" => Some(MetricKey::Attendance),
            "Sesi Coaching" => Some(MetricKey::CoachingSessions),
            "Sesi Briefing" => Some(MetricKey::BriefingSessions),
            "Jumlah Tim" => Some(MetricKey::TeamSize),
            "Kuis" => Some(MetricKey::QuizScore),
            "Partisipasi Training" => Some(MetricKey::TrainingParticipation),
            "Login Apple" => Some(MetricKey::AppleLogins),
            "Point Apple" => Some(MetricKey::ApplePoints),
            "Point my Hero" => Some(MetricKey::MyheroPoints),
            "Jumlah Prospek" => Some(MetricKey::TotalProspects),
            "Ratio Prospek" => Some(MetricKey::ProspectRatio),
            // a name that already is a key resolves to itself
            other => other.parse().ok(),
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown metric key: {}", s))
    }
}

/// Who supplies the raw figure behind a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricOrigin {
    /// Admin-uploaded dataset
    Admin,
    /// Entered by the team leader
    Tl,
}

impl std::fmt::Display for MetricOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricOrigin::Admin => write!(f, "ADMIN"),
            MetricOrigin::Tl => write!(f, "TL"),
        }
    }
}

/// Kind of TL-led session counted by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Coaching,
    Briefing,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKind::Coaching => write!(f, "coaching"),
            SessionKind::Briefing => write!(f, "briefing"),
        }
    }
}

/// One aggregated figure with its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub value: f64,
    pub unit: &'static str,
    pub source: MetricOrigin,
    pub description: &'static str,
}

/// Everything the aggregator produced for one person in one period
pub type MetricMap = HashMap<MetricKey, MetricValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_round_trips() {
        for key in MetricKey::ALL {
            assert_eq!(key.to_string().parse::<MetricKey>().unwrap(), key);
        }
    }

    #[test]
    fn serde_matches_display() {
        let json = serde_json::to_string(&MetricKey::MyheroPoints).unwrap();
        assert_eq!(json, "\"myhero_points\"");
    }

    #[test]
    fn legacy_names_resolve() {
        assert_eq!(
            MetricKey::from_kpi_name("Sales FLP"),
            Some(MetricKey::SalesFlp)
        );
        assert_eq!(
            MetricKey::from_kpi_name("Disiplin & Kehadiran Tim"),
            Some(MetricKey::Attendance)
        );
        assert_eq!(
            MetricKey::from_kpi_name("Point my Hero"),
            Some(MetricKey::MyheroPoints)
        );
    }

    #[test]
    fn unknown_name_falls_back_to_key_lookup() {
        assert_eq!(
            MetricKey::from_kpi_name("quiz_score"),
            Some(MetricKey::QuizScore)
        );
        assert_eq!(MetricKey::from_kpi_name("Sales flp"), None);
    }
}
