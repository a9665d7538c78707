//! # Slot computation
//!
//! Pure availability logic: given a staff member's weekly windows, an
//! optional date exception, the day's bookings and the current Riga time,
//! compute the ordered bookable slots for a service. All database reads
//! happen in the repository layer before these functions run, which keeps
//! the computation deterministic and unit-testable.
//!
//! The pipeline per staff member and date:
//!
//! 1. Resolve the effective working ranges: a closed-day exception yields
//!    none; an open exception with explicit ranges replaces the weekly
//!    schedule; otherwise the active weekly windows eligible for the service
//!    apply.
//! 2. Generate candidate starts of exactly the service duration, stepping by
//!    that duration from each range start while the slot still fits,
//!    deduplicated across ranges and sorted ascending.
//! 3. Mark a slot booked when it overlaps an occupying booking, or when its
//!    start has already passed on a same-day request.

use std::collections::HashSet;

use uuid::Uuid;

use crate::conflict::{self, Interval};
use crate::models::availability::Slot;
use crate::models::booking::Booking;
use crate::models::schedule::{DayException, WeeklyWindow};
use crate::time::TimeOfDay;

/// Everything needed to compute one staff member's slots for one date.
#[derive(Debug, Clone, Default)]
pub struct StaffDayContext {
    /// Weekly rows already filtered to the date's weekday.
    pub windows: Vec<WeeklyWindow>,
    pub exception: Option<DayException>,
    pub bookings: Vec<Booking>,
}

/// Picks the exception governing a staff member's date. A staff-scoped
/// exception beats a professional-wide one; at most one applies.
pub fn select_exception(staff_id: Uuid, exceptions: &[DayException]) -> Option<&DayException> {
    exceptions
        .iter()
        .find(|exception| exception.staff_id == Some(staff_id))
        .or_else(|| exceptions.iter().find(|exception| exception.staff_id.is_none()))
}

/// Resolves the working ranges for a date, honoring exception-over-weekly
/// precedence.
pub fn effective_ranges(
    service_id: Uuid,
    windows: &[WeeklyWindow],
    exception: Option<&DayException>,
) -> Vec<Interval> {
    if let Some(exception) = exception {
        if exception.is_closed {
            return Vec::new();
        }
        if let Some(ranges) = &exception.time_ranges {
            return ranges.clone();
        }
        // An open exception without explicit ranges leaves the weekly
        // schedule in force.
    }

    windows
        .iter()
        .filter(|window| window.active && window.service_ids.contains(&service_id))
        .map(|window| Interval {
            start: window.start,
            end: window.end,
        })
        .collect()
}

/// Generates candidate slot starts from the working ranges. Starts are
/// aligned to the range start and stepped by the service duration while the
/// slot end still fits inside the range; duplicates across ranges keep the
/// first occurrence.
pub fn generate_slot_starts(ranges: &[Interval], duration_minutes: u16) -> Vec<TimeOfDay> {
    if duration_minutes == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut starts = Vec::new();
    for range in ranges {
        let mut cursor = range.start;
        while let Some(slot_end) = cursor.add_minutes(duration_minutes) {
            if slot_end > range.end {
                break;
            }
            if seen.insert(cursor) {
                starts.push(cursor);
            }
            cursor = slot_end;
        }
    }

    starts.sort();
    starts
}

fn slot_is_booked(
    start: TimeOfDay,
    duration_minutes: u16,
    bookings: &[Booking],
    past_cutoff: Option<TimeOfDay>,
) -> Option<bool> {
    let end = start.add_minutes(duration_minutes)?;
    let candidate = Interval { start, end };
    // A slot starting at the current minute is no longer bookable.
    let passed = past_cutoff.is_some_and(|cutoff| start <= cutoff);
    Some(passed || conflict::conflicts_with_any(&candidate, bookings))
}

/// Marks each candidate start as booked or free. `past_cutoff` carries the
/// current Riga minute for same-day requests and `None` for future dates.
pub fn mark_slots(
    starts: &[TimeOfDay],
    duration_minutes: u16,
    bookings: &[Booking],
    past_cutoff: Option<TimeOfDay>,
) -> Vec<Slot> {
    starts
        .iter()
        .filter_map(|&start| {
            let is_booked = slot_is_booked(start, duration_minutes, bookings, past_cutoff)?;
            Some(Slot { start, is_booked })
        })
        .collect()
}

/// Full slot pipeline for one staff member and date. The result is ordered
/// ascending by start time; an empty result means the staff member should be
/// omitted from the day view.
pub fn staff_day_slots(
    service_id: Uuid,
    duration_minutes: u16,
    ctx: &StaffDayContext,
    past_cutoff: Option<TimeOfDay>,
) -> Vec<Slot> {
    let ranges = effective_ranges(service_id, &ctx.windows, ctx.exception.as_ref());
    let starts = generate_slot_starts(&ranges, duration_minutes);
    mark_slots(&starts, duration_minutes, &ctx.bookings, past_cutoff)
}

/// Month-view helper: whether the staff member has at least one free slot on
/// the date. Stops at the first free slot instead of materializing them all.
pub fn day_has_free_slot(
    service_id: Uuid,
    duration_minutes: u16,
    ctx: &StaffDayContext,
    past_cutoff: Option<TimeOfDay>,
) -> bool {
    let ranges = effective_ranges(service_id, &ctx.windows, ctx.exception.as_ref());
    let starts = generate_slot_starts(&ranges, duration_minutes);
    starts.iter().any(|&start| {
        matches!(
            slot_is_booked(start, duration_minutes, &ctx.bookings, past_cutoff),
            Some(false)
        )
    })
}
