// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard API routes: activity listing and aggregate statistics.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::stats::{monthly_distance_stats, monthly_pace_stats, pace_zone_stats};
use crate::models::{Activity, MonthlyPaceStats, MonthlySportStats, PaceZoneStats};
use crate::time_utils::{format_utc_rfc3339, week_bounds};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/activities", get(get_activities))
        .route("/api/stats", get(get_stats))
        .route("/api/pace-stats", get(get_pace_stats))
        .route("/api/weekly-pace-stats", get(get_weekly_pace_stats))
}

// ─── Status ──────────────────────────────────────────────────

/// Cache/token liveness snapshot.
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub authenticated: bool,
    /// RFC3339 expiry of the stored access token, when one exists
    pub token_expires_at: Option<String>,
    pub cache_present: bool,
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let token = state.tokens.snapshot().await;

    let token_expires_at = token
        .is_authenticated()
        .then(|| chrono::DateTime::from_timestamp(token.expires_at, 0))
        .flatten()
        .map(format_utc_rfc3339);

    Json(StatusResponse {
        status: "ok".to_string(),
        authenticated: token.is_authenticated(),
        token_expires_at,
        cache_present: state.cache.exists(),
    })
}

// ─── Activities ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Force a full re-fetch from Strava, replacing the cache
    #[serde(default)]
    refresh: bool,
}

/// Return the full cached activity collection, fetching it from Strava
/// when the cache is absent/corrupt or a refresh is forced.
///
/// Token-gated: a valid (possibly just-refreshed) access token is
/// required even when the response comes straight from the cache.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Vec<Activity>>> {
    let access_token = state.tokens.ensure_valid_token().await?;

    let activities = state
        .cache
        .read_or_refresh(&state.strava, &access_token, params.refresh)
        .await?;

    Ok(Json(activities))
}

// ─── Monthly Aggregates ──────────────────────────────────────

/// Monthly distance per category over the cached collection.
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MonthlySportStats>>> {
    let activities = state.cache.read()?;
    let stats = monthly_distance_stats(&activities);

    if stats.is_empty() && !activities.is_empty() {
        tracing::info!("No activities with parseable dates to aggregate");
    }

    Ok(Json(stats))
}

/// Monthly average pace per category over the cached collection.
async fn get_pace_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyPaceStats>>> {
    let activities = state.cache.read()?;
    Ok(Json(monthly_pace_stats(&activities)))
}

// ─── Date-Range Pace Zones ───────────────────────────────────

#[derive(Deserialize)]
struct WeeklyPaceQuery {
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

fn parse_day(raw: &str, param: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!("Invalid '{}' parameter: must be YYYY-MM-DD", param))
    })
}

/// Pace-zone distance breakdown per day over an inclusive date range.
///
/// Defaults to the Monday..Sunday week containing today (UTC) when no
/// range is given.
async fn get_weekly_pace_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeeklyPaceQuery>,
) -> Result<Json<PaceZoneStats>> {
    let (default_start, default_end) = week_bounds(chrono::Utc::now().date_naive());

    let start = match params.start_date.as_deref() {
        Some(raw) => parse_day(raw, "startDate")?,
        None => default_start,
    };
    let end = match params.end_date.as_deref() {
        Some(raw) => parse_day(raw, "endDate")?,
        None => default_end,
    };

    if start > end {
        return Err(AppError::BadRequest(
            "'startDate' must not be after 'endDate'".to_string(),
        ));
    }

    let activities = state.cache.read()?;
    Ok(Json(pace_zone_stats(&activities, start, end)))
}
