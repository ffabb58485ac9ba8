// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the pipeline.

pub mod activity;
pub mod credential;
pub mod output;

pub use activity::{is_cycling_type, RawActivity, CYCLING_ACTIVITY_TYPES};
pub use credential::{Credential, TOKEN_REFRESH_MARGIN_SECS};
pub use output::{ActivityClass, PathPoint, SummaryRecord, PATH_COLUMNS, SUMMARY_COLUMNS};
