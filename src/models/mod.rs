// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod stats;
pub mod token;

pub use activity::{classify, Activity, Category, PaceZone};
pub use stats::{MonthlyPaceStats, MonthlySportStats, PaceZoneStats};
pub use token::TokenRecord;
