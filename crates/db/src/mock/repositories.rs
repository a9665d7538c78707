use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbBooking, DbProfessional, DbScheduleException, DbService, DbStaffMember, DbWeeklySchedule,
};
use crate::repositories::exception::NewException;

// Mock repositories for testing
mock! {
    pub ServiceRepo {
        pub async fn get_service_by_id(&self, id: Uuid) -> eyre::Result<Option<DbService>>;

        pub async fn get_professional_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbProfessional>>;
    }
}

mock! {
    pub StaffRepo {
        pub async fn eligible_staff_for_service(
            &self,
            service_id: Uuid,
            professional_id: Uuid,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<DbStaffMember>>;

        pub async fn get_staff_member_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbStaffMember>>;
    }
}

mock! {
    pub ScheduleRepo {
        pub async fn active_weekly_schedules(
            &self,
            staff_ids: Vec<Uuid>,
            day_of_week: Option<i32>,
        ) -> eyre::Result<Vec<DbWeeklySchedule>>;
    }
}

mock! {
    pub ExceptionRepo {
        pub async fn apply_exception(
            &self,
            new: NewException,
        ) -> eyre::Result<(DbScheduleException, Vec<DbBooking>)>;

        pub async fn exceptions_in_range(
            &self,
            professional_id: Uuid,
            from: NaiveDate,
            to: NaiveDate,
        ) -> eyre::Result<Vec<DbScheduleException>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn occupying_bookings_in_range(
            &self,
            staff_ids: Vec<Uuid>,
            from: NaiveDate,
            to: NaiveDate,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn auto_completion_candidates(
            &self,
            window_start: NaiveDate,
            today: NaiveDate,
            batch_size: i64,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn complete_if_still_confirmed(
            &self,
            id: Uuid,
            now: DateTime<Utc>,
        ) -> eyre::Result<bool>;
    }
}
