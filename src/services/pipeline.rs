// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pipeline orchestration.
//!
//! `Init -> {CacheHit | Extracting} -> Transforming -> Done`, with `Failed`
//! reachable from every state. A corrupt cache moves `CacheHit` on to
//! `Extracting`. There are no retries here.

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::RawActivity;
use crate::services::auth::{Authenticator, CodePrompt, NonInteractive, StdinPrompt};
use crate::services::cache_gate::{CacheGate, CacheLookup};
use crate::services::export::write_tables;
use crate::services::extractor::{Extractor, TimeWindow};
use crate::services::transform::transform;
use crate::store::RawCache;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    CacheHit,
    Extracting,
    Transforming,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Init => "init",
            PipelineState::CacheHit => "cache_hit",
            PipelineState::Extracting => "extracting",
            PipelineState::Transforming => "transforming",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Where this run's activities came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Api,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Cache => f.write_str("cache"),
            DataSource::Api => f.write_str("api"),
        }
    }
}

/// Per-run options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Ignore the cache and extract.
    pub force: bool,
    /// Overrides the configured window length.
    pub months_back: Option<u32>,
    /// `YYYY-MM-DD`; wins over `months_back`.
    pub start_date: Option<String>,
    /// Stop after the raw cache is in place.
    pub extract_only: bool,
}

/// Artifacts of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw_file: PathBuf,
    /// `None` in extract-only mode.
    pub summary_file: Option<PathBuf>,
    /// `None` in extract-only mode or when no activity had GPS data.
    pub paths_file: Option<PathBuf>,
    pub activity_count: usize,
    pub source: DataSource,
    /// States visited, in order.
    pub states: Vec<PipelineState>,
}

pub struct Pipeline {
    config: Config,
    prompt: Arc<dyn CodePrompt>,
}

impl Pipeline {
    pub fn new(config: Config, prompt: Arc<dyn CodePrompt>) -> Self {
        Self { config, prompt }
    }

    /// Prompt on the terminal unless the config forbids interaction.
    pub fn from_config(config: Config) -> Self {
        let prompt: Arc<dyn CodePrompt> = if config.non_interactive {
            Arc::new(NonInteractive)
        } else {
            Arc::new(StdinPrompt)
        };
        Self::new(config, prompt)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the pipeline once.
    pub async fn run(&self, options: &RunOptions) -> Result<PipelineOutput> {
        tracing::info!(
            force = options.force,
            extract_only = options.extract_only,
            "Strava ETL pipeline started"
        );

        let mut states = Vec::new();
        match self.run_states(options, &mut states).await {
            Ok(mut output) => {
                output.states = states;
                tracing::info!(
                    activities = output.activity_count,
                    source = %output.source,
                    "Strava ETL pipeline completed"
                );
                Ok(output)
            }
            Err(e) => {
                enter(&mut states, PipelineState::Failed);
                tracing::error!(error = %e, "Pipeline failed");
                Err(e)
            }
        }
    }

    async fn run_states(
        &self,
        options: &RunOptions,
        states: &mut Vec<PipelineState>,
    ) -> Result<PipelineOutput> {
        enter(states, PipelineState::Init);

        // Validated up front so a bad date fails before any network call
        let window = TimeWindow::resolve(
            options.months_back.unwrap_or(self.config.months_back),
            options.start_date.as_deref(),
        )?;

        let cache = RawCache::new(self.config.raw_cache_path());
        let gate = CacheGate::with_hours(cache.clone(), self.config.cache_hours);

        let (activities, source) = match gate.lookup(options.force) {
            CacheLookup::Hit(activities) => {
                enter(states, PipelineState::CacheHit);
                (activities, DataSource::Cache)
            }
            CacheLookup::Corrupt(e) => {
                enter(states, PipelineState::CacheHit);
                tracing::warn!(error = %e, "Cache load failed, extracting from API");
                (self.extract(cache, &window, states).await?, DataSource::Api)
            }
            CacheLookup::Miss(reason) => {
                tracing::debug!(?reason, "Cache miss");
                (self.extract(cache, &window, states).await?, DataSource::Api)
            }
        };

        if activities.is_empty() {
            return Err(PipelineError::NoActivities);
        }

        let raw_file = self.config.raw_cache_path();
        let activity_count = activities.len();

        if options.extract_only {
            tracing::info!("Extract-only mode: skipping transformation");
            enter(states, PipelineState::Done);
            return Ok(PipelineOutput {
                raw_file,
                summary_file: None,
                paths_file: None,
                activity_count,
                source,
                states: Vec::new(),
            });
        }

        enter(states, PipelineState::Transforming);
        let (summaries, points) = transform(&activities)?;

        let summary_file = self.config.summary_path();
        let paths_file = self.config.paths_path();
        let paths_written = write_tables(&summary_file, &paths_file, &summaries, &points)?;

        enter(states, PipelineState::Done);
        Ok(PipelineOutput {
            raw_file,
            summary_file: Some(summary_file),
            paths_file: paths_written.then_some(paths_file),
            activity_count,
            source,
            states: Vec::new(),
        })
    }

    async fn extract(
        &self,
        cache: RawCache,
        window: &TimeWindow,
        states: &mut Vec<PipelineState>,
    ) -> Result<Vec<RawActivity>> {
        enter(states, PipelineState::Extracting);

        // Built lazily: a cache hit needs no client credentials
        let auth = Authenticator::from_config(&self.config, Arc::clone(&self.prompt))?;
        let extractor = Extractor::new(cache, self.config.activities_per_page);
        Ok(extractor.fetch_activities(&auth, window).await?)
    }
}

fn enter(states: &mut Vec<PipelineState>, state: PipelineState) {
    tracing::info!(%state, "Pipeline state");
    states.push(state);
}
