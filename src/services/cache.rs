// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-disk activity cache: one JSON snapshot of the full collection.
//!
//! The cache is a whole-file replacement snapshot with no TTL; it only
//! goes stale until a caller explicitly forces a refresh. A corrupt
//! file is treated as a cache miss, never a crash.

use std::path::PathBuf;

use crate::error::AppError;
use crate::models::Activity;
use crate::services::strava::StravaClient;

/// Read-through cache over the activity snapshot file.
#[derive(Clone)]
pub struct ActivityCache {
    path: PathBuf,
}

impl ActivityCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Whether a snapshot file exists (liveness info for `/api/status`).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and parse the on-disk snapshot.
    pub fn read(&self) -> Result<Vec<Activity>, AppError> {
        let contents = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::CacheMissing)
            }
            Err(e) => return Err(AppError::Internal(anyhow::anyhow!("Read cache file: {}", e))),
        };

        serde_json::from_slice(&contents).map_err(|e| AppError::CorruptCache(e.to_string()))
    }

    /// Replace the snapshot with a freshly fetched collection.
    ///
    /// Writes indented JSON to a temp file and renames it into place so
    /// a crash mid-write cannot leave a torn snapshot.
    pub fn write(&self, activities: &[Activity]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Create data dir: {}", e)))?;
        }

        let json = serde_json::to_vec_pretty(activities)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Encode cache file: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Write cache file: {}", e)))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Replace cache file: {}", e)))?;

        Ok(())
    }

    /// Return the cached collection, fetching from Strava first when the
    /// cache is absent, corrupt, or a refresh was forced.
    ///
    /// A failed fetch leaves the prior snapshot (if any) untouched.
    pub async fn read_or_refresh(
        &self,
        client: &StravaClient,
        access_token: &str,
        force_refresh: bool,
    ) -> Result<Vec<Activity>, AppError> {
        if !force_refresh {
            match self.read() {
                Ok(activities) => {
                    tracing::debug!(count = activities.len(), "Serving activities from cache");
                    return Ok(activities);
                }
                Err(AppError::CacheMissing) => {
                    tracing::info!("No activity cache yet, fetching from Strava");
                }
                Err(AppError::CorruptCache(msg)) => {
                    tracing::warn!(error = %msg, "Corrupt activity cache, refetching");
                }
                Err(e) => return Err(e),
            }
        } else {
            tracing::info!("Forced refresh, fetching all activities from Strava");
        }

        let activities = client.fetch_all(access_token).await?;
        self.write(&activities)?;
        tracing::info!(count = activities.len(), "Activity cache replaced");
        Ok(activities)
    }
}
