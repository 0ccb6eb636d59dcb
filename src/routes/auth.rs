// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::AppState;

/// Scope requested from Strava: profile read plus full activity read.
const OAUTH_SCOPE: &str = "read,activity:read_all";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/strava", get(auth_start))
        .route("/strava-callback", get(auth_callback))
}

/// Start OAuth flow - redirect to Strava authorization.
async fn auth_start(State(state): State<Arc<AppState>>) -> Redirect {
    let auth_url = format!(
        "https://www.strava.com/oauth/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}",
        state.config.strava_client_id,
        urlencoding::encode(&state.config.redirect_uri),
        OAUTH_SCOPE,
    );

    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting OAuth flow, redirecting to Strava"
    );

    Redirect::temporary(&auth_url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange the authorization code for tokens, then
/// bounce the browser back to the frontend.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth denied by user or Strava");
        let redirect = format!("{}/?auth_status=denied", state.config.frontend_url);
        return Ok(Redirect::temporary(&redirect));
    }

    let code = params.code.ok_or_else(|| {
        AppError::BadRequest("Authorization code not found in callback".to_string())
    })?;

    tracing::info!("Exchanging authorization code for tokens");
    state.tokens.exchange_code(&code).await?;

    let redirect = format!("{}/?auth_status=success", state.config.frontend_url);
    Ok(Redirect::temporary(&redirect))
}
