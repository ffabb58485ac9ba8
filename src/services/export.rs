// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV export of the summary and path tables.

use crate::error::{ExportError, StoreError};
use crate::models::{PathPoint, SummaryRecord, PATH_COLUMNS, SUMMARY_COLUMNS};
use crate::store::write_atomic;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Serialize rows under an explicit header, so an empty table still has one.
fn render_csv<T: Serialize>(columns: &[&str], rows: &[T]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

pub fn render_summary_csv(rows: &[SummaryRecord]) -> Result<Vec<u8>, ExportError> {
    render_csv(&SUMMARY_COLUMNS, rows)
}

pub fn render_paths_csv(points: &[PathPoint]) -> Result<Vec<u8>, ExportError> {
    render_csv(&PATH_COLUMNS, points)
}

/// Replace the summary and path tables as one set. Returns whether a
/// paths file was written.
///
/// Both tables are rendered before either file is touched, and the old
/// paths file is removed before the new summary lands, so the directory
/// never pairs a new summary with an older run's paths. With no points
/// the paths file is simply left absent.
pub fn write_tables(
    summary_path: &Path,
    paths_path: &Path,
    rows: &[SummaryRecord],
    points: &[PathPoint],
) -> Result<bool, ExportError> {
    let summary = render_summary_csv(rows)?;
    let paths = if points.is_empty() {
        None
    } else {
        Some(render_paths_csv(points)?)
    };

    remove_stale(paths_path)?;

    write_atomic(summary_path, &summary)?;
    tracing::info!(
        rows = rows.len(),
        size_kb = %format!("{:.2}", summary.len() as f64 / 1024.0),
        path = %summary_path.display(),
        "Summary CSV saved"
    );

    let Some(paths) = paths else {
        tracing::warn!("No GPS points to save");
        return Ok(false);
    };

    write_atomic(paths_path, &paths)?;
    tracing::info!(
        rows = points.len(),
        size_kb = %format!("{:.2}", paths.len() as f64 / 1024.0),
        path = %paths_path.display(),
        "Paths CSV saved"
    );
    Ok(true)
}

fn remove_stale(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed previous paths CSV");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

/// When an artifact was last written, for consumers deciding if it is stale.
pub fn artifact_freshness(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}
