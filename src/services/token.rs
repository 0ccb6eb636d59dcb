// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle: persistence, expiry checks, automatic refresh.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::TokenRecord;
use crate::services::strava::{StravaClient, TokenResponse};

/// Margin before token expiration when we proactively refresh.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// On-disk persistence for the token triple (one pretty JSON file).
#[derive(Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the persisted record.
    ///
    /// A missing file means "never authenticated"; an unparseable file
    /// is logged and treated the same way rather than crashing startup.
    pub fn load(&self) -> TokenRecord {
        let contents = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(_) => return TokenRecord::default(),
        };

        match serde_json::from_slice(&contents) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Token file unreadable, treating as unauthenticated"
                );
                TokenRecord::default()
            }
        }
    }

    /// Persist the record, replacing the file atomically (temp + rename)
    /// so a crash mid-write cannot leave a torn document.
    pub fn save(&self, record: &TokenRecord) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Create data dir: {}", e)))?;
        }

        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Encode token file: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Write token file: {}", e)))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Replace token file: {}", e)))?;

        Ok(())
    }
}

/// Manages the single user's token triple behind one mutex.
///
/// The in-memory mirror is loaded once at construction and committed
/// back to disk synchronously on every change. The refresh network
/// call runs with the lock released, so concurrent callers may trigger
/// redundant refreshes; both results are validly-issued tokens and the
/// last commit wins.
#[derive(Clone)]
pub struct TokenManager {
    client: StravaClient,
    store: TokenStore,
    current: Arc<Mutex<TokenRecord>>,
}

impl TokenManager {
    /// Load the persisted record (if any) and build the manager.
    pub fn new(client: StravaClient, store: TokenStore) -> Self {
        let record = store.load();
        if record.is_authenticated() {
            tracing::info!(expires_at = record.expires_at, "Loaded stored Strava token");
        }
        Self {
            client,
            store,
            current: Arc::new(Mutex::new(record)),
        }
    }

    /// Return a currently-valid access token, refreshing first if the
    /// stored one expires within the safety margin.
    pub async fn ensure_valid_token(&self) -> Result<String, AppError> {
        let record = self.current.lock().await.clone();

        if !record.is_authenticated() {
            return Err(AppError::Unauthenticated);
        }

        let now = chrono::Utc::now().timestamp();
        if !record.expires_within(now, TOKEN_REFRESH_MARGIN_SECS) {
            return Ok(record.access_token);
        }

        tracing::info!(expires_at = record.expires_at, "Access token expiring, refreshing");

        // Network call with the lock released; last writer wins on commit.
        let response = self
            .client
            .refresh_token(&record.refresh_token)
            .await
            .map_err(|e| AppError::RefreshFailed(e.to_string()))?;

        let new_record = merge_response(response, &record);
        let access_token = new_record.access_token.clone();
        self.commit(new_record).await?;

        tracing::info!("Token refreshed and persisted");
        Ok(access_token)
    }

    /// Exchange an authorization code for the initial token triple,
    /// replacing any prior record wholesale.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AppError> {
        let response = self.client.exchange_code(code).await?;

        let prior = self.current.lock().await.clone();
        let record = merge_response(response, &prior);
        self.commit(record.clone()).await?;

        tracing::info!(expires_at = record.expires_at, "OAuth code exchanged, tokens stored");
        Ok(record)
    }

    /// Lock-guarded copy of the current record for the status endpoint.
    pub async fn snapshot(&self) -> TokenRecord {
        self.current.lock().await.clone()
    }

    /// Commit a record to the in-memory mirror and to disk, in that
    /// order, under the lock.
    async fn commit(&self, record: TokenRecord) -> Result<(), AppError> {
        let mut guard = self.current.lock().await;
        *guard = record;
        self.store.save(&guard)
    }
}

/// Build the new record from an upstream grant response.
///
/// If upstream withheld a refresh token, the prior one is retained;
/// it is never overwritten with an empty string.
fn merge_response(response: TokenResponse, prior: &TokenRecord) -> TokenRecord {
    TokenRecord {
        access_token: response.access_token,
        refresh_token: if response.refresh_token.is_empty() {
            prior.refresh_token.clone()
        } else {
            response.refresh_token
        },
        expires_at: response.expires_at,
    }
}
