use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conflict::Interval;
use crate::time::TimeOfDay;

/// One weekly recurring working window for a staff member, already projected
/// to a single weekday. `day_of_week` uses 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyWindow {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub day_of_week: u8,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub active: bool,
    /// Services that may be booked inside this window.
    pub service_ids: Vec<Uuid>,
}

/// A date-specific override of the weekly schedule. A closed day yields no
/// availability at all; an open exception with explicit ranges replaces the
/// weekly windows for that date. `staff_id = None` scopes the exception to
/// the whole professional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayException {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub is_closed: bool,
    pub time_ranges: Option<Vec<Interval>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWeeklyScheduleRequest {
    pub staff_id: Uuid,
    pub day_of_week: u8,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRangePayload {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExceptionRequest {
    pub professional_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub is_closed: bool,
    pub time_ranges: Option<Vec<TimeRangePayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyExceptionResponse {
    pub exception_id: Uuid,
    pub bookings_cancelled: usize,
}
