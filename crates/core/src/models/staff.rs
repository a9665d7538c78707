use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub duration_minutes: u16,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub active: bool,
    /// Creation order drives plan-based visibility: when a plan caps how many
    /// staff members are bookable, the oldest ones win.
    pub created_at: DateTime<Utc>,
}

/// Limits derived from the professional's subscription plan. Any value at or
/// below zero is the "unlimited" sentinel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanLimits {
    pub staff_limit: i32,
    pub max_advance_days: i32,
}

impl PlanLimits {
    pub fn unlimited() -> Self {
        PlanLimits {
            staff_limit: 0,
            max_advance_days: 0,
        }
    }

    /// How many staff members (by creation order) are visible to clients.
    pub fn staff_visibility(&self) -> Option<usize> {
        (self.staff_limit > 0).then_some(self.staff_limit as usize)
    }

    /// How far ahead of today a booking may be placed, in days.
    pub fn advance_horizon_days(&self) -> Option<i64> {
        (self.max_advance_days > 0).then_some(i64::from(self.max_advance_days))
    }
}
