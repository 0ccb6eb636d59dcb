// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity model and derived classifications.

use serde::{Deserialize, Serialize};

/// A single activity as cached from the Strava listing endpoint.
///
/// Decoded directly into this typed shape; upstream fields we do not
/// use are dropped at decode time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Activity type (Run, Ride, Walk, Hike, Swim, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: f64,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: f64,
    /// Start date/time in UTC (ISO 8601)
    pub start_date: String,
    /// Start date/time in the athlete's local timezone (ISO 8601)
    #[serde(default)]
    pub start_date_local: String,
    /// Average heart rate, when the device recorded one
    #[serde(default)]
    pub average_heartrate: Option<f64>,
}

/// Derived activity grouping used by the monthly aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    RunWalkHike,
    Bike,
    Other,
}

/// Classify an activity type string into its aggregate category.
///
/// Total: every input maps to exactly one category; unknown types
/// fall into `Other`.
pub fn classify(activity_type: &str) -> Category {
    match activity_type {
        "Run" | "Walk" | "Hike" => Category::RunWalkHike,
        "Ride" | "VirtualRide" => Category::Bike,
        _ => Category::Other,
    }
}

/// Effort band derived from the average speed of a run.
///
/// Ordered fastest to slowest; thresholds are in meters per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceZone {
    Red,
    Orange,
    Yellow,
    Green,
}

impl PaceZone {
    /// Band for an average speed in m/s.
    pub fn from_speed(speed: f64) -> Self {
        if speed >= 4.8 {
            PaceZone::Red
        } else if speed >= 3.8 {
            PaceZone::Orange
        } else if speed >= 3.0 {
            PaceZone::Yellow
        } else {
            PaceZone::Green
        }
    }
}
