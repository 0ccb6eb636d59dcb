// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted OAuth credential triple.

use serde::{Deserialize, Serialize};

/// The OAuth token triple as persisted on disk.
///
/// `expires_at` is the upstream-issued absolute expiry (unix seconds).
/// An empty `access_token` means the user has never authenticated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl TokenRecord {
    /// Whether a token has ever been obtained.
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Whether the access token expires within `margin_secs` of `now`.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at - margin_secs <= now
    }
}
