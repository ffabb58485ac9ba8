//! Token store: the single persisted OAuth credential.

use crate::error::StoreError;
use crate::models::Credential;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed store for the one credential of this installation.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored credential. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<Credential>, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No token file");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let credential = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %self.path.display(), "Loaded stored credential");
        Ok(Some(credential))
    }

    /// Replace the stored credential.
    pub fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(credential)
            .map_err(|e| StoreError::Serialize(format!("credential: {}", e)))?;

        super::write_private(&self.path, &content)?;

        tracing::info!(path = %self.path.display(), "Credential saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
