// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for OAuth grants and bulk activity retrieval.
//!
//! Handles:
//! - Authorization-code exchange and refresh-token grants
//! - Paginated retrieval of the full activity history
//! - Timeout and non-2xx detection per page

use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::Activity;

/// Page size for the activity listing endpoint (Strava max is 200).
pub const PER_PAGE: u32 = 200;

/// Per-request timeout for all upstream calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token grant response from the Strava OAuth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Strava may withhold this on refresh; empty means "keep the old one".
    #[serde(default)]
    pub refresh_token: String,
    /// Absolute expiry as a unix timestamp
    pub expires_at: i64,
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            token_url: "https://www.strava.com/oauth/token".to_string(),
            client_id,
            client_secret,
        }
    }

    /// Point the client at a different upstream (test servers).
    pub fn with_base_urls(mut self, base_url: String, token_url: String) -> Self {
        self.base_url = base_url;
        self.token_url = token_url;
        self
    }

    /// Exchange an authorization code for the initial token triple.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        self.token_grant(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        self.token_grant(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    /// List one page of the athlete's activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("per_page", per_page.to_string()), ("page", page.to_string())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(request_error)?;

        Self::check_response_json(response).await
    }

    /// Fetch the complete activity history, oldest pages last.
    ///
    /// Pages are requested sequentially; a page shorter than `PER_PAGE`
    /// signals the end of the collection. Any page failure aborts the
    /// whole operation with nothing written anywhere.
    pub async fn fetch_all(&self, access_token: &str) -> Result<Vec<Activity>, AppError> {
        let mut all_activities = Vec::new();
        let mut page = 1u32;

        loop {
            let batch = self.list_activities(access_token, page, PER_PAGE).await?;
            let batch_len = batch.len();
            all_activities.extend(batch);

            tracing::debug!(page, count = batch_len, "Fetched activity page");

            if batch_len < PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        tracing::info!(total = all_activities.len(), pages = page, "Fetched all activities");
        Ok(all_activities)
    }

    /// POST a form-encoded grant to the token endpoint.
    async fn token_grant(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(request_error)?;

        Self::check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
            }
            return Err(AppError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::DecodeFailed(e.to_string()))
    }
}

/// Map a transport-level reqwest error into the fetch taxonomy.
fn request_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::FetchFailed(format!("Request timed out: {}", e))
    } else {
        AppError::FetchFailed(e.to_string())
    }
}
