// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity extraction: window resolution, pagination, cycling filter.

use crate::error::ExtractionError;
use crate::models::{is_cycling_type, RawActivity};
use crate::services::auth::Authenticator;
use crate::services::strava::{StravaActivitySummary, StravaClient};
use crate::store::RawCache;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use futures_util::{pin_mut, stream, Stream, TryStreamExt};
use std::collections::HashSet;

/// Log extraction progress every this many retained activities.
const PROGRESS_EVERY: usize = 50;

/// Months are approximated as 30 days.
const DAYS_PER_MONTH: i64 = 30;

/// Which activities to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Relative window ending now.
    MonthsBack(u32),
    /// Everything since midnight UTC of this date.
    Since(NaiveDate),
}

impl TimeWindow {
    /// Build a window; an absolute start date wins over `months_back`.
    pub fn resolve(months_back: u32, start_date: Option<&str>) -> Result<Self, ExtractionError> {
        match start_date.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(TimeWindow::Since)
                .map_err(|_| ExtractionError::InvalidStartDate(raw.to_string())),
            None => Ok(TimeWindow::MonthsBack(months_back)),
        }
    }

    /// The `after` instant passed to Strava.
    pub fn after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            TimeWindow::MonthsBack(months) => {
                now - Duration::days(i64::from(months) * DAYS_PER_MONTH)
            }
            TimeWindow::Since(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

impl From<StravaActivitySummary> for RawActivity {
    fn from(summary: StravaActivitySummary) -> Self {
        let summary_polyline = summary.summary_polyline().map(str::to_string);
        RawActivity {
            id: summary.id,
            name: summary.name,
            activity_type: summary.activity_type,
            start_date_local: summary.start_date_local,
            distance: summary.distance,
            moving_time: summary.moving_time,
            total_elevation_gain: summary.total_elevation_gain,
            commute: summary.commute,
            trainer: summary.trainer,
            summary_polyline,
        }
    }
}

/// Pages of activities starting at page 1; ends at the first empty page.
pub fn activity_pages<'a>(
    client: &'a StravaClient,
    access_token: &'a str,
    after: i64,
    per_page: u32,
) -> impl Stream<Item = Result<Vec<StravaActivitySummary>, ExtractionError>> + 'a {
    stream::try_unfold(1u32, move |page| async move {
        tracing::debug!(page, per_page, "Fetching activity page");
        client
            .list_activities(access_token, after, page, per_page)
            .await
            .map(|activities| {
                if activities.is_empty() {
                    None
                } else {
                    Some((activities, page + 1))
                }
            })
            .map_err(ExtractionError::from)
    })
}

pub struct Extractor {
    cache: RawCache,
    per_page: u32,
}

impl Extractor {
    pub fn new(cache: RawCache, per_page: u32) -> Self {
        Self { cache, per_page }
    }

    pub fn cache(&self) -> &RawCache {
        &self.cache
    }

    /// Fetch every cycling activity in `window` and replace the raw cache.
    ///
    /// Any failure aborts the run; the cache is only written on success.
    pub async fn fetch_activities(
        &self,
        auth: &Authenticator,
        window: &TimeWindow,
    ) -> Result<Vec<RawActivity>, ExtractionError> {
        let after = window.after(Utc::now());
        tracing::info!(
            ?window,
            after = %format_utc_rfc3339(after),
            "Starting activity extraction"
        );

        let access_token = auth.get_valid_token().await?;

        let pages = activity_pages(
            auth.client(),
            &access_token,
            after.timestamp(),
            self.per_page,
        );
        pin_mut!(pages);

        let mut activities = Vec::new();
        let mut seen = HashSet::new();
        let mut total = 0usize;

        while let Some(page) = pages.try_next().await? {
            total += page.len();
            for summary in page {
                if !is_cycling_type(&summary.activity_type) {
                    continue;
                }
                if !seen.insert(summary.id) {
                    tracing::debug!(activity_id = summary.id, "Dropping duplicate activity");
                    continue;
                }

                activities.push(RawActivity::from(summary));
                if activities.len() % PROGRESS_EVERY == 0 {
                    tracing::info!(count = activities.len(), "Processed cycling activities");
                }
            }
        }

        tracing::info!(cycling = activities.len(), total, "Extraction complete");

        self.cache.save(&activities)?;
        Ok(activities)
    }
}
