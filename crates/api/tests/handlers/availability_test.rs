use bookwise_core::availability::{self, StaffDayContext};
use bookwise_core::errors::EngineResult;
use bookwise_core::models::availability::StaffDaySlots;
use chrono::NaiveDate;
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{
    TestContext, db_booking, db_professional, db_service, db_staff_member, db_weekly_schedule,
};
use bookwise_api::handlers::availability::parse_month;

// Replays the day-availability orchestration against the mock repositories:
// resolve scope, load the date's rows, run the slot pipeline per staff
// member and drop the ones without slots.
async fn day_slots_wrapper(
    ctx: &TestContext,
    service_id: Uuid,
    date: NaiveDate,
) -> EngineResult<Vec<StaffDaySlots>> {
    let service = ctx
        .service_repo
        .get_service_by_id(service_id)
        .await?
        .expect("service exists")
        .into_domain()?;
    let professional = ctx
        .service_repo
        .get_professional_by_id(service.professional_id)
        .await?
        .expect("professional exists");
    let limits = professional.plan_limits();

    let staff = ctx
        .staff_repo
        .eligible_staff_for_service(
            service.id,
            service.professional_id,
            limits.staff_visibility().map(|n| n as i64),
        )
        .await?;
    let staff_ids: Vec<Uuid> = staff.iter().map(|member| member.id).collect();

    let weekday = i32::from(bookwise_core::time::weekday_index(date));
    let windows = ctx
        .schedule_repo
        .active_weekly_schedules(staff_ids.clone(), Some(weekday))
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<EngineResult<Vec<_>>>()?;
    let exceptions = ctx
        .exception_repo
        .exceptions_in_range(service.professional_id, date, date)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<EngineResult<Vec<_>>>()?;
    let bookings = ctx
        .booking_repo
        .occupying_bookings_in_range(staff_ids.clone(), date, date)
        .await?
        .into_iter()
        .map(|row| row.into_domain())
        .collect::<EngineResult<Vec<_>>>()?;

    let mut result = Vec::new();
    for &staff_id in &staff_ids {
        let day_ctx = StaffDayContext {
            windows: windows
                .iter()
                .filter(|window| window.staff_id == staff_id)
                .cloned()
                .collect(),
            exception: availability::select_exception(staff_id, &exceptions).cloned(),
            bookings: bookings
                .iter()
                .filter(|booking| booking.staff_id == staff_id)
                .cloned()
                .collect(),
        };
        let slots =
            availability::staff_day_slots(service.id, service.duration_minutes, &day_ctx, None);
        if !slots.is_empty() {
            result.push(StaffDaySlots { staff_id, slots });
        }
    }
    Ok(result)
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

#[tokio::test]
async fn test_staff_without_slots_are_dropped_from_day_view() {
    let mut ctx = TestContext::new();

    let professional = db_professional(0, 0);
    let service = db_service(professional.id, 30);
    let scheduled = db_staff_member(professional.id);
    let unscheduled = db_staff_member(professional.id);

    let service_id = service.id;
    let scheduled_id = scheduled.id;

    let schedule = db_weekly_schedule(scheduled.id, service.id, 1, 540, 720);

    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    {
        let professional = professional.clone();
        ctx.service_repo
            .expect_get_professional_by_id()
            .returning(move |_| Ok(Some(professional.clone())));
    }
    ctx.staff_repo
        .expect_eligible_staff_for_service()
        .returning(move |_, _, _| Ok(vec![scheduled.clone(), unscheduled.clone()]));
    ctx.schedule_repo
        .expect_active_weekly_schedules()
        .returning(move |_, _| Ok(vec![schedule.clone()]));
    ctx.exception_repo
        .expect_exceptions_in_range()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.booking_repo
        .expect_occupying_bookings_in_range()
        .returning(|_, _, _| Ok(Vec::new()));

    let result = day_slots_wrapper(&ctx, service_id, monday()).await.unwrap();

    // Only the staff member with a weekly window survives
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].staff_id, scheduled_id);
    assert_eq!(result[0].slots.len(), 6); // 09:00..12:00 in 30-minute steps
}

#[tokio::test]
async fn test_plan_staff_limit_reaches_the_repository_query() {
    let mut ctx = TestContext::new();

    // A plan capped at one visible staff member
    let professional = db_professional(1, 0);
    let service = db_service(professional.id, 30);
    let service_id = service.id;
    let professional_id = professional.id;

    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.service_repo
        .expect_get_professional_by_id()
        .returning(move |_| Ok(Some(professional.clone())));
    ctx.staff_repo
        .expect_eligible_staff_for_service()
        .with(
            predicate::eq(service_id),
            predicate::eq(professional_id),
            predicate::eq(Some(1i64)),
        )
        .times(1)
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.schedule_repo
        .expect_active_weekly_schedules()
        .returning(|_, _| Ok(Vec::new()));
    ctx.exception_repo
        .expect_exceptions_in_range()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.booking_repo
        .expect_occupying_bookings_in_range()
        .returning(|_, _, _| Ok(Vec::new()));

    let result = day_slots_wrapper(&ctx, service_id, monday()).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_occupying_bookings_mark_slots_booked() {
    let mut ctx = TestContext::new();

    let professional = db_professional(0, 0);
    let service = db_service(professional.id, 30);
    let staff = db_staff_member(professional.id);

    let service_id = service.id;
    let staff_id = staff.id;

    let schedule = db_weekly_schedule(staff.id, service.id, 1, 540, 630); // 09:00-10:30
    let booked = db_booking(staff.id, monday(), 540, 570, "confirmed"); // 09:00-09:30

    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.service_repo
        .expect_get_professional_by_id()
        .returning(move |_| Ok(Some(professional.clone())));
    ctx.staff_repo
        .expect_eligible_staff_for_service()
        .returning(move |_, _, _| Ok(vec![staff.clone()]));
    ctx.schedule_repo
        .expect_active_weekly_schedules()
        .returning(move |_, _| Ok(vec![schedule.clone()]));
    ctx.exception_repo
        .expect_exceptions_in_range()
        .returning(|_, _, _| Ok(Vec::new()));
    ctx.booking_repo
        .expect_occupying_bookings_in_range()
        .returning(move |_, _, _| Ok(vec![booked.clone()]));

    let result = day_slots_wrapper(&ctx, service_id, monday()).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].staff_id, staff_id);
    let flags: Vec<bool> = result[0].slots.iter().map(|slot| slot.is_booked).collect();
    assert_eq!(flags, vec![true, false, false]); // 09:00 booked, 09:30 and 10:00 free
}

#[rstest]
#[case("2026-03")]
#[case("2025-12")]
fn test_parse_month_accepts_valid_input(#[case] month: &str) {
    let first = parse_month(month).unwrap();
    assert_eq!(first.format("%Y-%m").to_string(), month);
}

#[rstest]
#[case("2026-13")]
#[case("2026-00")]
#[case("2026-3")]
#[case("26-03")]
#[case("2026/03")]
#[case("")]
#[case("not-a-month")]
fn test_parse_month_rejects_invalid_input(#[case] month: &str) {
    assert!(parse_month(month).is_err());
}
