//! Interval overlap detection between bookings.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::models::booking::Booking;
use crate::time::TimeOfDay;

/// A half-open `[start, end)` wall-clock interval within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    /// Validating constructor for boundary input; `end` must lie after
    /// `start`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> EngineResult<Self> {
        if end <= start {
            return Err(EngineError::Validation(format!(
                "time range end {end} must be after start {start}"
            )));
        }
        Ok(Interval { start, end })
    }

    /// Two half-open intervals overlap iff each one starts before the other
    /// ends. Touching intervals do not overlap, so back-to-back bookings are
    /// allowed.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// True when the candidate interval collides with any booking that still
/// occupies its slot. Cancelled bookings never conflict.
pub fn conflicts_with_any(candidate: &Interval, existing: &[Booking]) -> bool {
    existing
        .iter()
        .filter(|booking| booking.status.blocks_slot())
        .any(|booking| candidate.overlaps(&booking.interval()))
}
