// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava ETL: pull cycling activities from Strava into flat CSV tables.
//!
//! The pipeline keeps one OAuth credential fresh, extracts activities for a
//! time window (or reuses a recent raw cache), and writes a per-activity
//! summary table plus a per-GPS-point path table for the dashboard.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;

pub use config::Config;
pub use error::{PipelineError, Result};
