// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw cycling activity as extracted from Strava and stored in the cache.

use serde::{Deserialize, Serialize};

/// Activity kinds kept by the extractor; everything else is dropped.
pub const CYCLING_ACTIVITY_TYPES: [&str; 3] = ["Ride", "VirtualRide", "EBikeRide"];

/// Check whether a Strava activity type is a cycling kind we keep.
pub fn is_cycling_type(activity_type: &str) -> bool {
    CYCLING_ACTIVITY_TYPES.contains(&activity_type)
}

/// One cycling activity, before unit conversion.
///
/// Numeric fields are floats so caches written with `3600.0`-style
/// values still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawActivity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    #[serde(default)]
    pub name: String,
    /// Strava activity type (Ride, VirtualRide, EBikeRide)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Local start time (ISO 8601, as reported by Strava)
    #[serde(default)]
    pub start_date_local: Option<String>,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: f64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub commute: bool,
    /// Indoor trainer ride
    #[serde(default)]
    pub trainer: bool,
    /// Encoded route (Google polyline, precision 5), if the activity has GPS
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

impl RawActivity {
    pub fn has_gps_data(&self) -> bool {
        self.summary_polyline.is_some()
    }
}
