// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Encoded-polyline routes (Strava format, precision 5).

use geo::Coord;

/// Strava summary polylines use 5 decimal digits.
pub const STRAVA_POLYLINE_PRECISION: u32 = 5;

/// Errors from route encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Failed to decode polyline: {0}")]
    Decode(String),

    #[error("Failed to encode polyline: {0}")]
    Encode(String),
}

/// Decode a summary polyline into `(latitude, longitude)` pairs, in order.
pub fn decode_route(encoded: &str) -> Result<Vec<(f64, f64)>, RouteError> {
    let line = polyline::decode_polyline(encoded, STRAVA_POLYLINE_PRECISION)
        .map_err(|e| RouteError::Decode(e.to_string()))?;

    // geo stores x = longitude, y = latitude
    Ok(line.0.into_iter().map(|c| (c.y, c.x)).collect())
}

/// Encode `(latitude, longitude)` pairs as a summary polyline.
pub fn encode_route(points: &[(f64, f64)]) -> Result<String, RouteError> {
    let coords = points.iter().map(|&(lat, lon)| Coord { x: lon, y: lat });
    polyline::encode_coordinates(coords, STRAVA_POLYLINE_PRECISION)
        .map_err(|e| RouteError::Encode(e.to_string()))
}
