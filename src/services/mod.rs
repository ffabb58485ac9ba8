// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - pipeline stages and the Strava client.

pub mod auth;
pub mod cache_gate;
pub mod export;
pub mod extractor;
pub mod pipeline;
pub mod route;
pub mod strava;
pub mod transform;

pub use auth::{extract_code, AuthReason, Authenticator, CodePrompt, NonInteractive, StdinPrompt};
pub use cache_gate::{should_reuse_cache, CacheGate, CacheLookup, MissReason};
pub use export::{artifact_freshness, write_tables};
pub use extractor::{Extractor, TimeWindow};
pub use pipeline::{DataSource, Pipeline, PipelineOutput, PipelineState, RunOptions};
pub use route::{decode_route, encode_route, RouteError};
pub use strava::{StravaActivitySummary, StravaClient, TokenResponse};
pub use transform::{transform, transform_json};
