//! # Auto-Completion Job
//!
//! Transitions expired confirmed bookings to completed. The run is driven by
//! a conditional per-row update instead of any locking scheme: overlapping
//! invocations are safe because a row only completes while it is still
//! confirmed and untouched, and a second run over the same rows simply
//! reports zero newly processed bookings.

use axum::{Json, extract::State};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use bookwise_core::completion::{CompletionClock, CompletionSummary};
use bookwise_core::errors::{EngineError, EngineResult};
use bookwise_core::time::{self, TimeOfDay};

use crate::{ApiState, middleware::error_handling::AppError};

/// Settings for the auto-completion job, sourced from the environment.
#[derive(Debug, Clone, Copy)]
pub struct CompletionSettings {
    /// How far back candidates are considered, in days.
    pub window_days: i64,
    /// Maximum candidate rows per run.
    pub batch_size: i64,
    /// Grace period before a booking's end counts as past, in seconds.
    pub safety_buffer_secs: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        CompletionSettings {
            window_days: 30,
            batch_size: 200,
            safety_buffer_secs: 30,
        }
    }
}

/// Runs one auto-completion pass.
///
/// A failed candidate query is fatal for the run (the next scheduled
/// invocation retries); a failure on an individual booking is recorded in
/// the summary and the run continues. The audit write after each completion
/// is best-effort.
pub async fn run_auto_completion(
    pool: &PgPool,
    settings: &CompletionSettings,
    now: DateTime<Tz>,
) -> EngineResult<CompletionSummary> {
    let clock = CompletionClock::new(now, settings.safety_buffer_secs);
    let window_start = clock.today - Duration::days(settings.window_days);

    let candidates = bookwise_db::repositories::booking::auto_completion_candidates(
        pool,
        window_start,
        clock.today,
        settings.batch_size,
    )
    .await
    .map_err(EngineError::Database)?;

    tracing::debug!("Auto-completion: {} candidate(s)", candidates.len());

    let now_utc = now.with_timezone(&Utc);
    let mut summary = CompletionSummary::default();

    for candidate in candidates {
        let id = candidate.id;

        let end = match u16::try_from(candidate.end_minute)
            .ok()
            .and_then(|minutes| TimeOfDay::from_minutes(minutes).ok())
        {
            Some(end) => end,
            None => {
                tracing::warn!(
                    "Booking {} has an out-of-range end minute: {}",
                    id,
                    candidate.end_minute
                );
                summary.record_failed(id);
                continue;
            }
        };

        if !clock.is_completable(candidate.date, end) {
            continue;
        }

        match bookwise_db::repositories::booking::complete_if_still_confirmed(pool, id, now_utc)
            .await
        {
            Ok(true) => {
                summary.record_processed(id);
                // Best-effort audit trail; a failure here never reverts the
                // completion
                if let Err(err) = bookwise_db::repositories::audit::record_event(
                    pool,
                    id,
                    "auto_complete",
                    "auto",
                    Some(json!({ "completed_at": now_utc })),
                )
                .await
                {
                    tracing::warn!("Failed to record audit event for booking {}: {}", id, err);
                }
            }
            Ok(false) => {
                // A concurrent run or a client action got there first
                tracing::debug!("Booking {} already handled, skipping", id);
            }
            Err(err) => {
                tracing::warn!("Failed to auto-complete booking {}: {}", id, err);
                summary.record_failed(id);
            }
        }
    }

    tracing::info!(
        "Auto-completion run finished: processed={}, failed={}",
        summary.processed_count,
        summary.failed_count
    );
    Ok(summary)
}

/// Triggers one auto-completion pass.
///
/// # Endpoint
///
/// ```text
/// POST /api/jobs/auto-complete
/// ```
#[axum::debug_handler]
pub async fn trigger_auto_completion(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<CompletionSummary>, AppError> {
    let summary =
        run_auto_completion(&state.db_pool, &state.completion, time::riga_now()).await?;
    Ok(Json(summary))
}
