//! Metric aggregator
//!
//! Collects every raw figure the scorer may need for one person in one
//! period. Any failing sub-query aborts the whole aggregation so a partial
//! metric set is never scored.

use std::sync::Arc;

use crate::domain::entities::{
    MetricKey, MetricMap, MetricOrigin, MetricValue, PeriodKey, PersonId, SessionKind,
};
use crate::domain::ports::MetricRepository;
use crate::error::DomainError;

pub struct MetricAggregator<M>
where
    M: MetricRepository,
{
    metrics: Arc<M>,
}

impl<M> MetricAggregator<M>
where
    M: MetricRepository,
{
    pub fn new(metrics: Arc<M>) -> Self {
        Self { metrics }
    }

    /// Aggregate all metric keys for a person and period
    pub async fn aggregate(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<MetricMap, DomainError> {
        let (start, end) = period.month_bounds();
        let repo = &self.metrics;
        let mut out = MetricMap::with_capacity(MetricKey::ALL.len());

        // Sales performance
        let activities = repo
            .count_daily_activities(person_id, start, end)
            .await
            .map_err(|e| failed(MetricKey::QuantityActivity, e))?;
        insert(&mut out, MetricKey::QuantityActivity, activities as f64);

        let flp = repo
            .sum_sales_flp(person_id, period)
            .await
            .map_err(|e| failed(MetricKey::SalesFlp, e))?;
        insert(&mut out, MetricKey::SalesFlp, flp);

        // Leadership
        let attendance = repo
            .attendance_percentage(person_id, start, end)
            .await
            .map_err(|e| failed(MetricKey::Attendance, e))?;
        insert(&mut out, MetricKey::Attendance, attendance);

        let coaching = repo
            .count_sessions(person_id, SessionKind::Coaching, start, end)
            .await
            .map_err(|e| failed(MetricKey::CoachingSessions, e))?;
        insert(&mut out, MetricKey::CoachingSessions, coaching as f64);

        let briefing = repo
            .count_sessions(person_id, SessionKind::Briefing, start, end)
            .await
            .map_err(|e| failed(MetricKey::BriefingSessions, e))?;
        insert(&mut out, MetricKey::BriefingSessions, briefing as f64);

        // Counts every active salesman until persons carry a supervisor link
        let team_size = repo
            .count_active_salesmen()
            .await
            .map_err(|e| failed(MetricKey::TeamSize, e))?;
        insert(&mut out, MetricKey::TeamSize, team_size as f64);

        // Development
        let quiz = repo
            .avg_quiz_score(person_id, period)
            .await
            .map_err(|e| failed(MetricKey::QuizScore, e))?;
        insert(&mut out, MetricKey::QuizScore, quiz);

        let trainings = repo
            .count_training_participations(person_id, start, end)
            .await
            .map_err(|e| failed(MetricKey::TrainingParticipation, e))?;
        insert(&mut out, MetricKey::TrainingParticipation, trainings as f64);

        // Digitalization
        let logins = repo
            .sum_apple_logins(person_id, period)
            .await
            .map_err(|e| failed(MetricKey::AppleLogins, e))?;
        insert(&mut out, MetricKey::AppleLogins, logins);

        let apple_points = repo
            .sum_apple_points(person_id, period)
            .await
            .map_err(|e| failed(MetricKey::ApplePoints, e))?;
        insert(&mut out, MetricKey::ApplePoints, apple_points);

        let myhero_points = repo
            .sum_myhero_points(person_id, period)
            .await
            .map_err(|e| failed(MetricKey::MyheroPoints, e))?;
        insert(&mut out, MetricKey::MyheroPoints, myhero_points);

        let prospects = repo
            .sum_prospects(person_id, period)
            .await
            .map_err(|e| failed(MetricKey::TotalProspects, e))?;
        insert(&mut out, MetricKey::TotalProspects, prospects);

        // Reserved; nothing derives it yet
        insert(&mut out, MetricKey::ProspectRatio, 0.0);

        tracing::debug!(
            person_id = %person_id,
            period = %period,
            metrics = out.len(),
            "Metrics aggregated"
        );

        Ok(out)
    }
}

fn failed(metric: MetricKey, err: DomainError) -> DomainError {
    DomainError::Aggregation {
        metric,
        message: err.to_string(),
    }
}

fn insert(out: &mut MetricMap, key: MetricKey, value: f64) {
    let (unit, source, description) = describe(key);
    out.insert(
        key,
        MetricValue {
            value,
            unit,
            source,
            description,
        },
    );
}

fn describe(key: MetricKey) -> (&'static str, MetricOrigin, &'static str) {
    match key {
        MetricKey::QuantityActivity => (
            "count",
            MetricOrigin::Tl,
            "Number of promotional activities (canvassing + pameran)",
        ),
        MetricKey::SalesFlp => ("amount", MetricOrigin::Admin, "Sales FLP amount"),
        MetricKey::Attendance => ("percentage", MetricOrigin::Tl, "Team attendance rate"),
        MetricKey::CoachingSessions => ("count", MetricOrigin::Tl, "Number of coaching sessions"),
        MetricKey::BriefingSessions => ("count", MetricOrigin::Tl, "Number of briefing sessions"),
        MetricKey::TeamSize => ("count", MetricOrigin::Tl, "Number of team members"),
        MetricKey::QuizScore => ("score", MetricOrigin::Admin, "Quiz result score"),
        MetricKey::TrainingParticipation => (
            "count",
            MetricOrigin::Tl,
            "Number of training sessions attended",
        ),
        MetricKey::AppleLogins => ("count", MetricOrigin::Admin, "Number of Apple app logins"),
        MetricKey::ApplePoints => ("points", MetricOrigin::Admin, "Apple app points earned"),
        MetricKey::MyheroPoints => ("points", MetricOrigin::Admin, "My Hero app points earned"),
        MetricKey::TotalProspects => ("count", MetricOrigin::Admin, "Total number of prospects"),
        MetricKey::ProspectRatio => ("ratio", MetricOrigin::Admin, "Prospect achievement ratio"),
    }
}
