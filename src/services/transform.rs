// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw activities to the summary and path tables.
//!
//! Everything here is pure: the same batch always yields the same rows.
//! Per-field problems (zero distance, unparseable date, bad polyline)
//! degrade that field only; only a structurally broken batch is an error.

use crate::error::TransformError;
use crate::models::{ActivityClass, PathPoint, RawActivity, SummaryRecord};
use crate::services::route::decode_route;
use crate::time_utils::{format_local_timestamp, parse_local_timestamp, CalendarParts};
use std::collections::HashSet;

const METERS_TO_KM: f64 = 0.001;

/// Display labels for Strava activity types.
const ACTIVITY_TYPE_LABELS: [(&str, &str); 5] = [
    ("Ride", "Road Bike"),
    ("VirtualRide", "Virtual Ride"),
    ("EBikeRide", "E-Bike"),
    ("MountainBikeRide", "Mountain Bike"),
    ("GravelRide", "Gravel Bike"),
];

/// Round to `places` decimal digits by the exact binary value, ties to even.
///
/// Scaling first and rounding the product is not enough: `2.675 * 100`
/// lands on `267.5` although 2.675 is stored just below the tie.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // An exact decimal tie is odd / 2^(places + 1); scaling it is exact
    let doubled = value * 2f64.powi(places as i32 + 1);
    if doubled.fract() == 0.0 && doubled % 2.0 != 0.0 {
        let factor = 10f64.powi(places as i32);
        let floor = (value * factor).floor();
        let even = if floor % 2.0 == 0.0 { floor } else { floor + 1.0 };
        return even / factor;
    }

    // Fixed-precision formatting rounds the exact value
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Average speed in km/h; 0.0 when distance or moving time is zero.
pub fn average_speed_kmh(distance_m: f64, moving_time_s: f64) -> f64 {
    if distance_m <= 0.0 || moving_time_s <= 0.0 {
        return 0.0;
    }
    round_to((distance_m * METERS_TO_KM) / (moving_time_s / 3600.0), 2)
}

/// Pace in minutes per km; `None` when no distance was covered.
pub fn pace_min_per_km(distance_m: f64, moving_time_s: f64) -> Option<f64> {
    if distance_m <= 0.0 {
        return None;
    }
    Some(round_to((moving_time_s / 60.0) / (distance_m * METERS_TO_KM), 2))
}

/// Human-readable label for a Strava activity type; unknown types pass through.
///
/// Older caches may hold the enum repr (`root='Ride'`) instead of the bare name.
pub fn activity_type_label(activity_type: &str) -> String {
    let trimmed = activity_type.trim();
    let kind = trimmed.split('\'').nth(1).unwrap_or(trimmed);

    ACTIVITY_TYPE_LABELS
        .iter()
        .find(|(raw, _)| *raw == kind)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| kind.to_string())
}

/// Build the summary row for one activity.
pub fn summarize(activity: &RawActivity) -> SummaryRecord {
    let raw_start = activity.start_date_local.as_deref().unwrap_or_default();
    let start = parse_local_timestamp(raw_start);
    let calendar = start.as_ref().map(CalendarParts::from_datetime);

    if start.is_none() && !raw_start.is_empty() {
        tracing::debug!(activity_id = activity.id, start = raw_start, "Unparseable start date");
    }

    SummaryRecord {
        activity_id: activity.id,
        activity_name: activity.name.clone(),
        activity_type: activity_type_label(&activity.activity_type),
        activity_class: ActivityClass::from_commute_flag(activity.commute),
        start_date_local: start
            .as_ref()
            .map(format_local_timestamp)
            .unwrap_or_else(|| raw_start.to_string()),
        distance_km: round_to(activity.distance * METERS_TO_KM, 2),
        elevation_m: round_to(activity.total_elevation_gain, 1),
        moving_time_minutes: round_to(activity.moving_time / 60.0, 1),
        average_speed_kmh: average_speed_kmh(activity.distance, activity.moving_time),
        pace_min_per_km: pace_min_per_km(activity.distance, activity.moving_time),
        has_gps_data: activity.has_gps_data(),
        year: calendar.as_ref().map(|c| c.year),
        month: calendar.as_ref().map(|c| c.month),
        day: calendar.as_ref().map(|c| c.day),
        day_of_week: calendar.as_ref().map(|c| c.day_of_week),
        date: calendar.map(|c| c.date),
    }
}

/// Decode the route of one activity into path rows.
///
/// Missing or undecodable polylines yield no rows.
pub fn path_points(activity: &RawActivity, summary: &SummaryRecord) -> Vec<PathPoint> {
    let Some(encoded) = activity.summary_polyline.as_deref() else {
        return Vec::new();
    };

    let coordinates = match decode_route(encoded) {
        Ok(coordinates) => coordinates,
        Err(e) => {
            tracing::warn!(activity_id = activity.id, error = %e, "Skipping route");
            return Vec::new();
        }
    };

    coordinates
        .into_iter()
        .enumerate()
        .map(|(point_index, (latitude, longitude))| PathPoint {
            activity_id: summary.activity_id,
            activity_name: summary.activity_name.clone(),
            activity_type: summary.activity_type.clone(),
            point_index,
            latitude: round_to(latitude, 6),
            longitude: round_to(longitude, 6),
            start_date: summary.date.clone().unwrap_or_default(),
        })
        .collect()
}

/// Transform a batch of raw activities into summary and path rows.
///
/// Summary rows keep input order; path rows are grouped by activity in the
/// same order with increasing `point_index`.
pub fn transform(
    activities: &[RawActivity],
) -> Result<(Vec<SummaryRecord>, Vec<PathPoint>), TransformError> {
    let mut seen = HashSet::with_capacity(activities.len());
    if let Some(dup) = activities.iter().find(|a| !seen.insert(a.id)) {
        return Err(TransformError::DuplicateActivity(dup.id));
    }

    let mut summaries = Vec::with_capacity(activities.len());
    let mut paths = Vec::new();

    for activity in activities {
        let summary = summarize(activity);
        paths.extend(path_points(activity, &summary));
        summaries.push(summary);
    }

    tracing::info!(
        activities = summaries.len(),
        gps_points = paths.len(),
        "Transformation complete"
    );
    Ok((summaries, paths))
}

/// Transform the raw cache bytes (a JSON array of activities).
pub fn transform_json(
    raw: &[u8],
) -> Result<(Vec<SummaryRecord>, Vec<PathPoint>), TransformError> {
    let activities: Vec<RawActivity> =
        serde_json::from_slice(raw).map_err(|e| TransformError::MalformedBatch(e.to_string()))?;
    transform(&activities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride(id: u64, distance: f64, moving_time: f64) -> RawActivity {
        RawActivity {
            id,
            name: format!("Ride {}", id),
            activity_type: "Ride".to_string(),
            start_date_local: Some("2025-07-17T14:30:00Z".to_string()),
            distance,
            moving_time,
            total_elevation_gain: 123.46,
            commute: false,
            trainer: false,
            summary_polyline: None,
        }
    }

    #[test]
    fn test_metrics_for_typical_ride() {
        let summary = summarize(&ride(1, 15000.0, 3600.0));

        assert_eq!(summary.distance_km, 15.0);
        assert_eq!(summary.moving_time_minutes, 60.0);
        assert_eq!(summary.average_speed_kmh, 15.0);
        assert_eq!(summary.pace_min_per_km, Some(4.0));
        assert_eq!(summary.activity_class, ActivityClass::Leisure);
        assert_eq!(summary.elevation_m, 123.5);
    }

    #[test]
    fn test_round_to_decimal_semantics() {
        // Stored just below or above the tie
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(-2.675, 2), -2.67);
        assert_eq!(round_to(1.005, 2), 1.0);
        assert_eq!(round_to(42.195, 2), 42.2);
        assert_eq!(round_to(812.44, 1), 812.4);
        // Exact ties go to even
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(38.5, 6), 38.5);
    }

    #[test]
    fn test_zero_distance_and_time() {
        assert_eq!(average_speed_kmh(0.0, 0.0), 0.0);
        assert_eq!(pace_min_per_km(0.0, 0.0), None);

        assert_eq!(average_speed_kmh(0.0, 1200.0), 0.0);
        assert_eq!(pace_min_per_km(0.0, 1200.0), None);

        // Distance without time: no speed, but pace is defined
        assert_eq!(average_speed_kmh(5000.0, 0.0), 0.0);
        assert_eq!(pace_min_per_km(5000.0, 0.0), Some(0.0));
    }

    #[test]
    fn test_speed_formula() {
        // 42.195 km in 1h 30m
        assert_eq!(average_speed_kmh(42195.0, 5400.0), 28.13);
        assert_eq!(pace_min_per_km(42195.0, 5400.0), Some(2.13));
    }

    #[test]
    fn test_calendar_fields() {
        let summary = summarize(&ride(1, 1000.0, 600.0));
        assert_eq!(summary.start_date_local, "2025-07-17 14:30:00");
        assert_eq!(summary.year, Some(2025));
        assert_eq!(summary.month, Some(7));
        assert_eq!(summary.day, Some(17));
        assert_eq!(summary.day_of_week, Some("Thursday"));
        assert_eq!(summary.date.as_deref(), Some("2025-07-17"));
    }

    #[test]
    fn test_unparseable_date_omits_calendar() {
        let mut activity = ride(1, 1000.0, 600.0);
        activity.start_date_local = Some("last tuesday".to_string());

        let summary = summarize(&activity);
        assert_eq!(summary.start_date_local, "last tuesday");
        assert_eq!(summary.year, None);
        assert_eq!(summary.day_of_week, None);
        assert_eq!(summary.date, None);

        activity.start_date_local = None;
        let summary = summarize(&activity);
        assert_eq!(summary.start_date_local, "");
        assert_eq!(summary.month, None);
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(activity_type_label("Ride"), "Road Bike");
        assert_eq!(activity_type_label("VirtualRide"), "Virtual Ride");
        assert_eq!(activity_type_label("EBikeRide"), "E-Bike");
        assert_eq!(activity_type_label("MountainBikeRide"), "Mountain Bike");
        assert_eq!(activity_type_label("GravelRide"), "Gravel Bike");
        assert_eq!(activity_type_label("Handcycle"), "Handcycle");
        assert_eq!(activity_type_label("root='VirtualRide'"), "Virtual Ride");
    }

    #[test]
    fn test_commute_class() {
        let mut activity = ride(1, 8000.0, 1800.0);
        activity.commute = true;
        assert_eq!(summarize(&activity).activity_class, ActivityClass::Commute);
    }

    #[test]
    fn test_trainer_ride_has_no_path() {
        let mut activity = ride(7, 20000.0, 3600.0);
        activity.activity_type = "VirtualRide".to_string();
        activity.trainer = true;

        let (summaries, paths) = transform(&[activity]).unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(!summaries[0].has_gps_data);
        assert!(paths.is_empty());
    }

    #[test]
    fn test_path_rows_only_for_activity_with_route() {
        let mut with_route = ride(1, 15000.0, 3600.0);
        with_route.summary_polyline = Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string());
        let without_route = ride(2, 5000.0, 900.0);

        let (summaries, paths) = transform(&[with_route, without_route]).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.activity_id == 1));
        assert_eq!(
            paths.iter().map(|p| p.point_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(paths[0].latitude, 38.5);
        assert_eq!(paths[0].longitude, -120.2);
        assert_eq!(paths[0].activity_type, "Road Bike");
        assert_eq!(paths[0].start_date, "2025-07-17");
    }

    #[test]
    fn test_bad_polyline_yields_no_points() {
        let mut broken = ride(1, 15000.0, 3600.0);
        broken.summary_polyline = Some("_p~iF ~ps|U".to_string());

        let (summaries, paths) = transform(&[broken]).unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].has_gps_data);
        assert!(paths.is_empty());
    }

    #[test]
    fn test_duplicate_id_is_structural_error() {
        let result = transform(&[ride(5, 1.0, 1.0), ride(6, 1.0, 1.0), ride(5, 2.0, 2.0)]);
        assert!(matches!(result, Err(TransformError::DuplicateActivity(5))));
    }

    #[test]
    fn test_transform_json_rejects_non_array() {
        let result = transform_json(br#"{"id": 1, "type": "Ride"}"#);
        assert!(matches!(result, Err(TransformError::MalformedBatch(_))));

        let (summaries, paths) = transform_json(b"[]").unwrap();
        assert!(summaries.is_empty());
        assert!(paths.is_empty());
    }
}
