// src/pipeline/run.rs

//! Monitor run: fetch → extract → parse → diff → notify → persist.
//!
//! Only a failed fetch or a missing table boundary aborts the run, and both
//! happen before anything is written. Every later failure is logged and
//! recorded in the [`RunSummary`]; the snapshot is always saved.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Config, Posting};
use crate::services::{DocumentSource, Notification, Notifier, RowParser, extract_table};
use crate::storage::{SaveSummary, SnapshotStore};

use super::diff::{carry_first_seen, new_postings};

/// Run switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Parse and diff only; neither notify nor save.
    pub dry_run: bool,
}

/// How the alert step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Nothing new, no alert needed
    NothingNew,
    /// Alert delivered for this many postings
    Sent(usize),
    /// Delivery settings are missing
    NotConfigured,
    /// Delivery was attempted and failed
    Failed(String),
    /// Dry run
    Skipped,
}

/// How the snapshot step ended.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    Saved(SaveSummary),
    Failed(String),
    Skipped,
}

/// Result of one monitor run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    /// Rows between the table markers
    pub row_count: usize,
    /// Postings extracted from those rows
    pub total: usize,
    /// Postings in the previous snapshot
    pub previous: usize,
    /// Postings not in the previous snapshot
    pub new_postings: Vec<Posting>,
    pub notification: NotifyOutcome,
    pub snapshot: SaveOutcome,
}

impl RunSummary {
    /// Whether any step degraded to a warning.
    pub fn has_warnings(&self) -> bool {
        matches!(
            self.notification,
            NotifyOutcome::NotConfigured | NotifyOutcome::Failed(_)
        ) || self.save_failed()
    }

    pub fn save_failed(&self) -> bool {
        matches!(self.snapshot, SaveOutcome::Failed(_))
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notification = match &self.notification {
            NotifyOutcome::NothingNew => "not needed".to_string(),
            NotifyOutcome::Sent(n) => format!("sent ({n})"),
            NotifyOutcome::NotConfigured => "not configured".to_string(),
            NotifyOutcome::Failed(e) => format!("failed: {e}"),
            NotifyOutcome::Skipped => "skipped".to_string(),
        };
        let snapshot = match &self.snapshot {
            SaveOutcome::Saved(s) => format!("saved {} to {}", s.count, s.location),
            SaveOutcome::Failed(e) => format!("failed: {e}"),
            SaveOutcome::Skipped => "skipped".to_string(),
        };
        write!(
            f,
            "{} total, {} new, {} previous; notification {}; snapshot {}",
            self.total,
            self.new_postings.len(),
            self.previous,
            notification,
            snapshot
        )
    }
}

/// Run the monitor once.
///
/// `notifier` is `None` when delivery settings are incomplete.
pub async fn run_monitor(
    config: &Config,
    source: &dyn DocumentSource,
    store: &dyn SnapshotStore,
    notifier: Option<&dyn Notifier>,
    options: RunOptions,
) -> Result<RunSummary> {
    let started_at = Utc::now();
    log::info!("Fetching {}", source.location());

    let document = source.fetch().await?;
    let rows = extract_table(&document, (&config.table).into())?;

    let mut current = RowParser::new(&config.table, started_at).parse_rows(rows.iter().copied());
    log::info!(
        "Found {} posting(s) in {} table row(s)",
        current.len(),
        rows.len()
    );

    let previous = store.load().await.unwrap_or_else(|e| {
        log::warn!("Could not load previous snapshot, treating as empty: {e}");
        Vec::new()
    });

    let fresh = new_postings(&current, &previous);
    carry_first_seen(&mut current, &previous);

    if fresh.is_empty() {
        log::info!("No new postings");
    } else {
        log::info!("Found {} new posting(s)", fresh.len());
        for posting in &fresh {
            log::info!("- {}", posting.headline());
        }
    }

    let notification = if options.dry_run {
        NotifyOutcome::Skipped
    } else {
        dispatch(config, notifier, &fresh, started_at).await
    };

    let snapshot = if options.dry_run {
        SaveOutcome::Skipped
    } else {
        match store.save(&current).await {
            Ok(summary) => SaveOutcome::Saved(summary),
            Err(e) => {
                log::error!("Failed to save snapshot: {e}");
                SaveOutcome::Failed(e.to_string())
            }
        }
    };

    Ok(RunSummary {
        started_at,
        row_count: rows.len(),
        total: current.len(),
        previous: previous.len(),
        new_postings: fresh,
        notification,
        snapshot,
    })
}

async fn dispatch(
    config: &Config,
    notifier: Option<&dyn Notifier>,
    fresh: &[Posting],
    now: DateTime<Utc>,
) -> NotifyOutcome {
    if fresh.is_empty() {
        return NotifyOutcome::NothingNew;
    }
    let Some(notifier) = notifier else {
        log::warn!(
            "Notification not configured (missing: {})",
            config.notify.missing_fields().join(", ")
        );
        return NotifyOutcome::NotConfigured;
    };

    let notification = Notification::render(
        &config.notify,
        config.source.repository_url.as_deref(),
        fresh,
        now,
    );
    match notifier.notify(&notification).await {
        Ok(()) => NotifyOutcome::Sent(fresh.len()),
        Err(e) => {
            log::warn!("Failed to notify {}: {e}", notifier.target());
            NotifyOutcome::Failed(e.to_string())
        }
    }
}
