//! KPI scorer
//!
//! Turns one aggregated figure into points for one KPI item.

/// Points awarded for a KPI plus the uncapped achievement percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiScore {
    pub score: f64,
    /// `None` for presence-scored KPIs
    pub achievement_ratio: Option<f64>,
}

/// Score an actual value against a KPI's weight and target.
///
/// With no positive target the KPI is presence-scored: full weight when the
/// actual is positive, zero otherwise. With a target the weight is scaled by
/// `actual / target`, capped at 1.0 and floored at 0.0, so the result always
/// lies in `[0, weight]`.
pub fn score_kpi(weight: f64, target: Option<f64>, actual: f64) -> KpiScore {
    match target {
        Some(target) if target > 0.0 => {
            let ratio = actual / target;
            let capped = if ratio.is_nan() {
                0.0
            } else {
                ratio.clamp(0.0, 1.0)
            };
            KpiScore {
                score: weight * capped,
                achievement_ratio: Some(ratio * 100.0),
            }
        }
        _ => KpiScore {
            score: if actual > 0.0 { weight } else { 0.0 },
            achievement_ratio: None,
        },
    }
}
