// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cache;
pub mod strava;
pub mod token;

pub use cache::ActivityCache;
pub use strava::{StravaClient, TokenResponse};
pub use token::{TokenManager, TokenStore};
