//! Eligibility rules and reporting for the automatic completion job.

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{self, TimeOfDay};

/// Reference clock for one completion run, computed once from the Riga wall
/// clock. The safety buffer keeps just-finished bookings out of reach while
/// a client action may still be in flight.
#[derive(Debug, Clone, Copy)]
pub struct CompletionClock {
    pub today: NaiveDate,
    /// Same-day bookings ending at or before this minute are completable.
    /// `None` right after midnight, while the buffer still reaches into the
    /// previous day.
    pub cutoff: Option<TimeOfDay>,
}

impl CompletionClock {
    pub fn new(now: DateTime<Tz>, safety_buffer_secs: u32) -> Self {
        let today = now.date_naive();
        let adjusted = now - Duration::seconds(i64::from(safety_buffer_secs));
        let cutoff =
            (adjusted.date_naive() == today).then(|| time::civil_minute(&adjusted));
        CompletionClock { today, cutoff }
    }

    /// A confirmed booking is completable once its end lies further in the
    /// past than the safety buffer: any booking on an earlier date, or a
    /// same-day booking ending at or before the cutoff minute.
    pub fn is_completable(&self, date: NaiveDate, end: TimeOfDay) -> bool {
        date < self.today
            || (date == self.today && self.cutoff.is_some_and(|cutoff| end <= cutoff))
    }
}

/// Outcome of one completion run. Failures are tracked per booking; one bad
/// row never aborts the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub processed_count: usize,
    pub failed_count: usize,
    pub processed_ids: Vec<Uuid>,
    pub failed_ids: Vec<Uuid>,
}

impl CompletionSummary {
    pub fn record_processed(&mut self, id: Uuid) {
        self.processed_count += 1;
        self.processed_ids.push(id);
    }

    pub fn record_failed(&mut self, id: Uuid) {
        self.failed_count += 1;
        self.failed_ids.push(id);
    }
}
