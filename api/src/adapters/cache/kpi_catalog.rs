//! Caching decorator for KpiCatalog
//!
//! KPI items and pillars change rarely but are read on every calculation
//! and every breakdown. The decorator keeps one snapshot of both for a
//! fixed TTL. Per-person targets always go to the wrapped catalog.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{KpiItem, PeriodKey, PersonId, PersonKpiTarget, Pillar};
use crate::domain::ports::KpiCatalog;
use crate::error::DomainError;

struct Snapshot {
    kpis: Vec<KpiItem>,
    pillars: Vec<Pillar>,
    loaded_at: Instant,
}

pub struct CachedKpiCatalog<K: KpiCatalog> {
    inner: Arc<K>,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl<K: KpiCatalog> CachedKpiCatalog<K> {
    /// A zero `ttl` disables caching
    pub fn new(inner: Arc<K>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// Drop the snapshot; the next read reloads from the wrapped catalog
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
        tracing::info!("KPI catalog cache invalidated");
    }

    async fn load(&self) -> Result<Arc<Snapshot>, DomainError> {
        let kpis = self.inner.find_all_kpi_items().await?;
        let pillars = self.inner.find_all_pillars().await?;
        tracing::debug!(
            kpi_items = kpis.len(),
            pillars = pillars.len(),
            "Loaded KPI catalog"
        );
        Ok(Arc::new(Snapshot {
            kpis,
            pillars,
            loaded_at: Instant::now(),
        }))
    }

    async fn snapshot(&self) -> Result<Arc<Snapshot>, DomainError> {
        if self.ttl.is_zero() {
            return self.load().await;
        }

        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if snapshot.loaded_at.elapsed() < self.ttl {
                return Ok(snapshot.clone());
            }
        }

        let mut slot = self.snapshot.write().await;
        // another reader may have refreshed while we waited
        if let Some(snapshot) = slot.as_ref() {
            if snapshot.loaded_at.elapsed() < self.ttl {
                return Ok(snapshot.clone());
            }
        }

        let fresh = self.load().await?;
        *slot = Some(fresh.clone());
        Ok(fresh)
    }
}

#[async_trait]
impl<K: KpiCatalog> KpiCatalog for CachedKpiCatalog<K> {
    async fn find_tl_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError> {
        let snapshot = self.snapshot().await?;
        let mut items: Vec<KpiItem> = snapshot
            .kpis
            .iter()
            .filter(|k| k.applies_to_tl)
            .cloned()
            .collect();
        items.sort_by(|a, b| (a.pillar_id.0, &a.name).cmp(&(b.pillar_id.0, &b.name)));
        Ok(items)
    }

    async fn find_all_kpi_items(&self) -> Result<Vec<KpiItem>, DomainError> {
        Ok(self.snapshot().await?.kpis.clone())
    }

    async fn find_all_pillars(&self) -> Result<Vec<Pillar>, DomainError> {
        Ok(self.snapshot().await?.pillars.clone())
    }

    async fn find_person_targets(
        &self,
        person_id: &PersonId,
        period: &PeriodKey,
    ) -> Result<Vec<PersonKpiTarget>, DomainError> {
        self.inner.find_person_targets(person_id, period).await
    }
}
