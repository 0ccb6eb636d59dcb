// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Dashboard: a single-user fitness activity dashboard backend.
//!
//! This crate pulls a user's Strava activity history into a local JSON
//! cache and serves monthly/weekly aggregate statistics to the web UI.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{ActivityCache, StravaClient, TokenManager};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
    pub tokens: TokenManager,
    pub cache: ActivityCache,
}
