// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rows of the two exported tables.
//!
//! Field order is the CSV column order; serde names are the column headers
//! the dashboard reads.

use serde::Serialize;

/// Summary table column headers, in order.
pub const SUMMARY_COLUMNS: [&str; 16] = [
    "Activity_ID",
    "Activity_Name",
    "Activity_Type",
    "Activity_Class",
    "Start_Date_Local",
    "Distance_KM",
    "Elevation_M",
    "Moving_Time_Minutes",
    "Average_Speed_KMH",
    "Pace_Min_Per_KM",
    "Has_GPS_Data",
    "Year",
    "Month",
    "Day",
    "Day_of_Week",
    "Date",
];

/// Path table column headers, in order.
pub const PATH_COLUMNS: [&str; 7] = [
    "Activity_ID",
    "Activity_Name",
    "Activity_Type",
    "Point_Index",
    "Latitude",
    "Longitude",
    "Start_Date",
];

/// Commute vs. leisure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityClass {
    Commute,
    Leisure,
}

impl ActivityClass {
    pub fn from_commute_flag(commute: bool) -> Self {
        if commute {
            ActivityClass::Commute
        } else {
            ActivityClass::Leisure
        }
    }
}

/// One row per activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    #[serde(rename = "Activity_ID")]
    pub activity_id: u64,
    #[serde(rename = "Activity_Name")]
    pub activity_name: String,
    /// Display label (e.g. "Road Bike")
    #[serde(rename = "Activity_Type")]
    pub activity_type: String,
    #[serde(rename = "Activity_Class")]
    pub activity_class: ActivityClass,
    /// `YYYY-MM-DD HH:MM:SS`, or the raw string if it could not be parsed
    #[serde(rename = "Start_Date_Local")]
    pub start_date_local: String,
    #[serde(rename = "Distance_KM")]
    pub distance_km: f64,
    #[serde(rename = "Elevation_M")]
    pub elevation_m: f64,
    #[serde(rename = "Moving_Time_Minutes")]
    pub moving_time_minutes: f64,
    #[serde(rename = "Average_Speed_KMH")]
    pub average_speed_kmh: f64,
    /// None when distance is zero ("no pace", not "zero pace")
    #[serde(rename = "Pace_Min_Per_KM")]
    pub pace_min_per_km: Option<f64>,
    #[serde(rename = "Has_GPS_Data")]
    pub has_gps_data: bool,
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Month")]
    pub month: Option<u32>,
    #[serde(rename = "Day")]
    pub day: Option<u32>,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: Option<&'static str>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

/// One row per decoded GPS coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPoint {
    #[serde(rename = "Activity_ID")]
    pub activity_id: u64,
    #[serde(rename = "Activity_Name")]
    pub activity_name: String,
    #[serde(rename = "Activity_Type")]
    pub activity_type: String,
    #[serde(rename = "Point_Index")]
    pub point_index: usize,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Activity date (`YYYY-MM-DD`), empty if the start time was unparseable
    #[serde(rename = "Start_Date")]
    pub start_date: String,
}
