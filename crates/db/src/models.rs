use bookwise_core::errors::{EngineError, EngineResult};
use bookwise_core::models::booking::{Booking, BookingStatus};
use bookwise_core::models::schedule::{DayException, WeeklyWindow};
use bookwise_core::models::staff::{PlanLimits, Service, StaffMember};
use bookwise_core::conflict::Interval;
use bookwise_core::time::TimeOfDay;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfessional {
    pub id: Uuid,
    pub name: String,
    /// Plan limits; values at or below zero mean unlimited.
    pub staff_limit: i32,
    pub max_advance_days: i32,
    pub created_at: DateTime<Utc>,
}

impl DbProfessional {
    pub fn plan_limits(&self) -> PlanLimits {
        PlanLimits {
            staff_limit: self.staff_limit,
            max_advance_days: self.max_advance_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaffMember {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaffService {
    pub staff_id: Uuid,
    pub service_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWeeklySchedule {
    pub id: Uuid,
    pub staff_id: Uuid,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub active: bool,
    pub service_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Exception time range as persisted in JSONB, minutes since midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTimeRange {
    pub start_minute: i32,
    pub end_minute: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleException {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub is_closed: bool,
    pub time_ranges: Option<Json<Vec<StoredTimeRange>>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start_minute: i32,
    pub end_minute: i32,
    pub status: String,
    pub auto_completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
    pub auto_cancelled_by_exception: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAuditEvent {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub action: String,
    pub actor: String,
    pub detail: Option<Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

fn minute_of_day(minutes: i32) -> EngineResult<TimeOfDay> {
    let minutes = u16::try_from(minutes)
        .map_err(|_| EngineError::Validation(format!("stored minute out of range: {minutes}")))?;
    TimeOfDay::from_minutes(minutes)
}

impl DbService {
    pub fn into_domain(self) -> EngineResult<Service> {
        let duration_minutes = u16::try_from(self.duration_minutes).map_err(|_| {
            EngineError::Validation(format!(
                "stored service duration out of range: {}",
                self.duration_minutes
            ))
        })?;
        Ok(Service {
            id: self.id,
            professional_id: self.professional_id,
            name: self.name,
            duration_minutes,
            active: self.active,
        })
    }
}

impl DbStaffMember {
    pub fn into_domain(self) -> StaffMember {
        StaffMember {
            id: self.id,
            professional_id: self.professional_id,
            name: self.name,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

impl DbWeeklySchedule {
    pub fn into_domain(self) -> EngineResult<WeeklyWindow> {
        Ok(WeeklyWindow {
            id: self.id,
            staff_id: self.staff_id,
            day_of_week: self.day_of_week as u8,
            start: minute_of_day(self.start_minute)?,
            end: minute_of_day(self.end_minute)?,
            active: self.active,
            service_ids: self.service_ids,
        })
    }
}

impl DbScheduleException {
    pub fn into_domain(self) -> EngineResult<DayException> {
        let time_ranges = match self.time_ranges {
            Some(Json(ranges)) => Some(
                ranges
                    .into_iter()
                    .map(|range| {
                        Interval::new(
                            minute_of_day(range.start_minute)?,
                            minute_of_day(range.end_minute)?,
                        )
                    })
                    .collect::<EngineResult<Vec<_>>>()?,
            ),
            None => None,
        };
        Ok(DayException {
            id: self.id,
            professional_id: self.professional_id,
            staff_id: self.staff_id,
            date: self.date,
            is_closed: self.is_closed,
            time_ranges,
        })
    }
}

impl DbBooking {
    pub fn into_domain(self) -> EngineResult<Booking> {
        Ok(Booking {
            id: self.id,
            professional_id: self.professional_id,
            staff_id: self.staff_id,
            service_id: self.service_id,
            client_id: self.client_id,
            date: self.date,
            start: minute_of_day(self.start_minute)?,
            end: minute_of_day(self.end_minute)?,
            status: self.status.parse::<BookingStatus>()?,
            auto_completed_at: self.auto_completed_at,
            completed_by: self.completed_by,
            auto_cancelled_by_exception: self.auto_cancelled_by_exception,
            cancelled_at: self.cancelled_at,
            cancellation_reason: self.cancellation_reason,
            created_at: self.created_at,
        })
    }
}
