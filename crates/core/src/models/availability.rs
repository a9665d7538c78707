use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::TimeOfDay;

/// One candidate bookable interval, exactly the service duration long.
/// `time` serializes as zero-padded "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "time")]
    pub start: TimeOfDay,
    pub is_booked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffDaySlots {
    pub staff_id: Uuid,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailabilityResponse {
    pub service_id: Uuid,
    pub date: NaiveDate,
    /// Staff members with no bookable windows that day are omitted entirely.
    pub staff: Vec<StaffDaySlots>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthAvailabilityResponse {
    pub service_id: Uuid,
    /// The requested month as "YYYY-MM".
    pub month: String,
    /// Dates with at least one free slot for at least one staff member,
    /// ascending.
    pub available_days: Vec<NaiveDate>,
}
