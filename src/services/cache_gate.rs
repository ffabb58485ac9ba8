// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Decide whether the last extraction can stand in for a live fetch.

use crate::error::CacheLoadError;
use crate::models::RawActivity;
use crate::store::RawCache;
use std::time::{Duration, SystemTime};

/// Why the cache was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// Caller asked for a fresh extraction.
    Forced,
    /// No cache file.
    Absent,
    /// Cache is at least as old as the threshold.
    Expired { age: Duration },
    /// Fresh, but holds no activities.
    Empty,
}

/// Outcome of consulting the cache.
#[derive(Debug)]
pub enum CacheLookup {
    /// Fresh cache, parsed.
    Hit(Vec<RawActivity>),
    Miss(MissReason),
    /// Fresh enough, but unreadable; callers fall back to extraction.
    Corrupt(CacheLoadError),
}

/// Reuse iff not forced and the cache exists with `age < threshold`.
pub fn should_reuse_cache(force: bool, cache_age: Option<Duration>, threshold: Duration) -> bool {
    if force {
        return false;
    }
    matches!(cache_age, Some(age) if age < threshold)
}

pub struct CacheGate {
    cache: RawCache,
    threshold: Duration,
}

impl CacheGate {
    pub fn new(cache: RawCache, threshold: Duration) -> Self {
        Self { cache, threshold }
    }

    /// Threshold given in whole hours.
    pub fn with_hours(cache: RawCache, hours: u64) -> Self {
        Self::new(cache, Duration::from_secs(hours * 3600))
    }

    pub fn cache(&self) -> &RawCache {
        &self.cache
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn lookup(&self, force: bool) -> CacheLookup {
        self.lookup_at(force, SystemTime::now())
    }

    /// Consult the cache as of `now`.
    pub fn lookup_at(&self, force: bool, now: SystemTime) -> CacheLookup {
        if force {
            tracing::info!("Force refresh requested, bypassing cache");
            return CacheLookup::Miss(MissReason::Forced);
        }

        let Some(age) = self.cache.age_at(now) else {
            tracing::info!(path = %self.cache.path().display(), "No cached data found");
            return CacheLookup::Miss(MissReason::Absent);
        };

        let age_hours = age.as_secs_f64() / 3600.0;
        if !should_reuse_cache(force, Some(age), self.threshold) {
            tracing::info!(
                age_hours = %format!("{:.1}", age_hours),
                threshold_hours = self.threshold.as_secs() / 3600,
                "Cache expired"
            );
            return CacheLookup::Miss(MissReason::Expired { age });
        }

        tracing::info!(age_hours = %format!("{:.1}", age_hours), "Using cached data");
        match self.cache.load() {
            Ok(activities) if activities.is_empty() => {
                tracing::info!("Cached data is empty, will re-extract");
                CacheLookup::Miss(MissReason::Empty)
            }
            Ok(activities) => CacheLookup::Hit(activities),
            Err(e) => {
                tracing::warn!(error = %e, "Cached data unreadable, will re-extract");
                CacheLookup::Corrupt(e)
            }
        }
    }
}
