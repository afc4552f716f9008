use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// How many people a batch evaluates at once
    pub evaluation_concurrency: usize,
    /// Lifetime of the KPI/pillar snapshot; zero disables the cache
    pub kpi_cache_ttl: Duration,
    /// Score against per-person targets when one exists for the period
    pub apply_person_targets: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let concurrency: usize = parse_or(&lookup, "EVALUATION_CONCURRENCY", 4)?;

        Ok(Self {
            database_url,
            port: parse_or(&lookup, "PORT", 8080)?,
            evaluation_concurrency: concurrency.max(1),
            kpi_cache_ttl: Duration::from_secs(parse_or(&lookup, "KPI_CACHE_TTL_SECS", 60)?),
            apply_person_targets: parse_or(&lookup, "APPLY_PERSON_TARGETS", false)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        _ => Ok(default),
    }
}
