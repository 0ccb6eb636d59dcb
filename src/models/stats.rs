// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregate statistics derived from the cached activity collection.
//!
//! All passes here are pure functions over an in-memory snapshot; they
//! never trigger a network fetch. Distances are meters and durations
//! seconds internally; pace is seconds-per-meter. Kilometers appear
//! only in the wire types for the weekly zone breakdown.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::activity::{classify, Activity, Category, PaceZone};
use crate::time_utils::{day_of, month_key};

// ─── Monthly Distance ────────────────────────────────────────

/// Distance per category for one month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlySportStats {
    /// Format: YYYY-MM
    pub month_year: String,
    /// Meters
    pub run_walk_hike: f64,
    pub bike: f64,
    pub other: f64,
}

/// Group activities by month and sum distance per category.
///
/// Activities whose `start_date` fails to parse are silently skipped.
/// Months with no activities are absent, and the output order is
/// unspecified; sorting is a presentation concern.
pub fn monthly_distance_stats(activities: &[Activity]) -> Vec<MonthlySportStats> {
    let mut stats_map: HashMap<String, MonthlySportStats> = HashMap::new();

    for activity in activities {
        let Some(month) = month_key(&activity.start_date) else {
            continue;
        };

        let stat = stats_map
            .entry(month.clone())
            .or_insert_with(|| MonthlySportStats {
                month_year: month,
                ..Default::default()
            });

        match classify(&activity.activity_type) {
            Category::RunWalkHike => stat.run_walk_hike += activity.distance,
            Category::Bike => stat.bike += activity.distance,
            Category::Other => stat.other += activity.distance,
        }
    }

    stats_map.into_values().collect()
}

// ─── Monthly Pace ────────────────────────────────────────────

/// Accumulated time/distance and derived average pace for one month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyPaceStats {
    /// Format: YYYY-MM
    pub month_year: String,

    /// Accumulated moving time (seconds) and distance (meters) per category
    pub run_walk_hike_time: f64,
    pub run_walk_hike_distance: f64,
    pub bike_time: f64,
    pub bike_distance: f64,
    pub other_time: f64,
    pub other_distance: f64,

    /// Average pace per category (seconds per meter).
    /// Zero means "no data", never a valid pace; callers must not divide by it.
    pub run_walk_hike_pace: f64,
    pub bike_pace: f64,
    pub other_pace: f64,
}

/// Group activities by month and derive average pace per category.
///
/// Pace is `Σmoving_time / Σdistance`, computed only when the
/// accumulated distance is positive.
pub fn monthly_pace_stats(activities: &[Activity]) -> Vec<MonthlyPaceStats> {
    let mut pace_map: HashMap<String, MonthlyPaceStats> = HashMap::new();

    for activity in activities {
        let Some(month) = month_key(&activity.start_date) else {
            continue;
        };

        let stat = pace_map
            .entry(month.clone())
            .or_insert_with(|| MonthlyPaceStats {
                month_year: month,
                ..Default::default()
            });

        match classify(&activity.activity_type) {
            Category::RunWalkHike => {
                stat.run_walk_hike_distance += activity.distance;
                stat.run_walk_hike_time += activity.moving_time;
            }
            Category::Bike => {
                stat.bike_distance += activity.distance;
                stat.bike_time += activity.moving_time;
            }
            Category::Other => {
                stat.other_distance += activity.distance;
                stat.other_time += activity.moving_time;
            }
        }
    }

    pace_map
        .into_values()
        .map(|mut stat| {
            if stat.run_walk_hike_distance > 0.0 {
                stat.run_walk_hike_pace = stat.run_walk_hike_time / stat.run_walk_hike_distance;
            }
            if stat.bike_distance > 0.0 {
                stat.bike_pace = stat.bike_time / stat.bike_distance;
            }
            if stat.other_distance > 0.0 {
                stat.other_pace = stat.other_time / stat.other_distance;
            }
            stat
        })
        .collect()
}

// ─── Date-Range Pace Zones ───────────────────────────────────

/// Distance (km) per pace zone for one calendar day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyZoneDistance {
    /// Format: YYYY-MM-DD
    pub date: String,
    pub red_km: f64,
    pub orange_km: f64,
    pub yellow_km: f64,
    pub green_km: f64,
}

/// Totals across the whole requested range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeSummary {
    pub total_distance_km: f64,
    pub total_moving_time_secs: f64,
    /// Seconds per meter; zero means "no data"
    pub average_pace: f64,
}

/// Date-range pace zone breakdown with summary totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaceZoneStats {
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<DailyZoneDistance>,
    pub summary: RangeSummary,
}

/// Break down running distance per pace zone for each day in the
/// inclusive `[start, end]` range.
///
/// Every day in the range appears, zero-filled when nothing matches.
/// Only `Run` activities with positive distance and moving time
/// contribute, and their day comes from the athlete's local start
/// date to match the local training day.
pub fn pace_zone_stats(activities: &[Activity], start: NaiveDate, end: NaiveDate) -> PaceZoneStats {
    debug_assert!(start <= end);

    let num_days = (end - start).num_days() as usize + 1;
    let mut days: Vec<DailyZoneDistance> = (0..num_days)
        .map(|offset| DailyZoneDistance {
            date: (start + Days::new(offset as u64)).to_string(),
            ..Default::default()
        })
        .collect();

    let mut total_distance = 0.0; // meters
    let mut total_moving_time = 0.0; // seconds

    for activity in activities {
        if activity.activity_type != "Run"
            || activity.distance <= 0.0
            || activity.moving_time <= 0.0
        {
            continue;
        }

        let Some(day) = day_of(&activity.start_date_local) else {
            continue;
        };
        if day < start || day > end {
            continue;
        }

        let speed = activity.distance / activity.moving_time;
        let km = activity.distance / 1000.0;
        let entry = &mut days[(day - start).num_days() as usize];

        match PaceZone::from_speed(speed) {
            PaceZone::Red => entry.red_km += km,
            PaceZone::Orange => entry.orange_km += km,
            PaceZone::Yellow => entry.yellow_km += km,
            PaceZone::Green => entry.green_km += km,
        }

        total_distance += activity.distance;
        total_moving_time += activity.moving_time;
    }

    let average_pace = if total_distance > 0.0 {
        total_moving_time / total_distance
    } else {
        0.0
    };

    PaceZoneStats {
        start_date: start.to_string(),
        end_date: end.to_string(),
        days,
        summary: RangeSummary {
            total_distance_km: total_distance / 1000.0,
            total_moving_time_secs: total_moving_time,
            average_pace,
        },
    }
}
