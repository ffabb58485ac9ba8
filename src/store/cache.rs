//! Raw activity cache: the last successful extraction as a JSON array.

use crate::error::{CacheLoadError, StoreError};
use crate::models::RawActivity;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub struct RawCache {
    path: PathBuf,
}

impl RawCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Last modification time, if the cache exists.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    /// Age of the cache relative to `now`; `None` if there is no cache.
    ///
    /// An mtime in the future counts as age zero.
    pub fn age_at(&self, now: SystemTime) -> Option<Duration> {
        let modified = self.modified()?;
        Some(now.duration_since(modified).unwrap_or(Duration::ZERO))
    }

    /// Parse the cached activity list.
    pub fn load(&self) -> Result<Vec<RawActivity>, CacheLoadError> {
        let content = fs::read(&self.path).map_err(|e| CacheLoadError::Io(e.to_string()))?;
        let activities: Vec<RawActivity> =
            serde_json::from_slice(&content).map_err(|e| CacheLoadError::Parse(e.to_string()))?;

        tracing::info!(
            count = activities.len(),
            path = %self.path.display(),
            "Loaded activities from cache"
        );
        Ok(activities)
    }

    /// Replace the cache with a freshly extracted activity list.
    pub fn save(&self, activities: &[RawActivity]) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(activities)
            .map_err(|e| StoreError::Serialize(format!("raw activities: {}", e)))?;
        super::write_atomic(&self.path, &content)?;

        tracing::info!(
            count = activities.len(),
            size_kb = %format!("{:.2}", content.len() as f64 / 1024.0),
            path = %self.path.display(),
            "Activities saved to cache"
        );
        Ok(())
    }
}
