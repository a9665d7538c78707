use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conflict::Interval;
use crate::errors::EngineError;
use crate::time::TimeOfDay;

/// Booking lifecycle: a client creates a `Pending` booking, the provider
/// confirms or cancels it, and a confirmed booking ends up `Completed`
/// (manually or by the completion job) or cancelled. `CancelledSystem` is
/// reserved for cascade cancellation triggered by a closed-day exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
    CancelledSystem,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
            BookingStatus::CancelledSystem => "cancelled_system",
        }
    }

    /// Whether a booking in this status still occupies its time slot.
    /// Cancelled bookings free the interval for rebooking.
    pub fn blocks_slot(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Completed
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "canceled" => Ok(BookingStatus::Canceled),
            "cancelled_system" => Ok(BookingStatus::CancelledSystem),
            other => Err(EngineError::Validation(format!(
                "unknown booking status: {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    /// Exclusive end of the booked interval.
    pub end: TimeOfDay,
    pub status: BookingStatus,
    pub auto_completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
    pub auto_cancelled_by_exception: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub status: BookingStatus,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        BookingResponse {
            id: booking.id,
            staff_id: booking.staff_id,
            service_id: booking.service_id,
            date: booking.date,
            start: booking.start,
            end: booking.end,
            status: booking.status,
        }
    }
}
