use bookwise_core::completion::{CompletionClock, CompletionSummary};
use bookwise_core::time::TimeOfDay;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Riga;
use uuid::Uuid;

use crate::test_utils::{TestContext, db_booking};

// Replays the auto-completion loop against the mock booking repository:
// fetch candidates, filter by the completion clock, then apply the
// conditional per-row update, isolating failures.
async fn run_completion_wrapper(
    ctx: &TestContext,
    clock: CompletionClock,
) -> eyre::Result<CompletionSummary> {
    let window_start = clock.today - Duration::days(30);
    let candidates = ctx
        .booking_repo
        .auto_completion_candidates(window_start, clock.today, 200)
        .await?;

    let now_utc = Utc::now();
    let mut summary = CompletionSummary::default();

    for candidate in candidates {
        let end = TimeOfDay::from_minutes(candidate.end_minute as u16).expect("valid end minute");
        if !clock.is_completable(candidate.date, end) {
            continue;
        }
        match ctx
            .booking_repo
            .complete_if_still_confirmed(candidate.id, now_utc)
            .await
        {
            Ok(true) => summary.record_processed(candidate.id),
            Ok(false) => {} // already handled by a concurrent run
            Err(_) => summary.record_failed(candidate.id),
        }
    }
    Ok(summary)
}

fn clock_at(hour: u32, minute: u32, second: u32) -> CompletionClock {
    let now = Riga
        .with_ymd_and_hms(2026, 3, 2, hour, minute, second)
        .unwrap();
    CompletionClock::new(now, 30)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

#[tokio::test]
async fn test_expired_confirmed_booking_is_completed() {
    let mut ctx = TestContext::new();

    // Ended 09:55, five minutes before the 10:00 clock, beyond the buffer
    let booking = db_booking(Uuid::new_v4(), today(), 540, 595, "confirmed");
    let booking_id = booking.id;

    ctx.booking_repo
        .expect_auto_completion_candidates()
        .returning(move |_, _, _| Ok(vec![booking.clone()]));
    ctx.booking_repo
        .expect_complete_if_still_confirmed()
        .times(1)
        .returning(|_, _| Ok(true));

    let summary = run_completion_wrapper(&ctx, clock_at(10, 0, 10)).await.unwrap();

    assert_eq!(summary.processed_count, 1);
    assert_eq!(summary.failed_count, 0);
    assert_eq!(summary.processed_ids, vec![booking_id]);
}

#[tokio::test]
async fn test_second_run_reports_zero_newly_processed() {
    let mut ctx = TestContext::new();

    let booking = db_booking(Uuid::new_v4(), today(), 540, 595, "confirmed");

    ctx.booking_repo
        .expect_auto_completion_candidates()
        .returning(move |_, _, _| Ok(vec![booking.clone()]));
    // The conditional update affects zero rows: another run already won
    ctx.booking_repo
        .expect_complete_if_still_confirmed()
        .returning(|_, _| Ok(false));

    let summary = run_completion_wrapper(&ctx, clock_at(10, 0, 10)).await.unwrap();

    assert_eq!(summary.processed_count, 0);
    assert_eq!(summary.failed_count, 0);
}

#[tokio::test]
async fn test_booking_inside_safety_buffer_is_skipped() {
    let mut ctx = TestContext::new();

    // Ends at 10:00, the current minute: still inside the buffer
    let booking = db_booking(Uuid::new_v4(), today(), 570, 600, "confirmed");

    ctx.booking_repo
        .expect_auto_completion_candidates()
        .returning(move |_, _, _| Ok(vec![booking.clone()]));
    ctx.booking_repo
        .expect_complete_if_still_confirmed()
        .times(0)
        .returning(|_, _| Ok(true));

    let summary = run_completion_wrapper(&ctx, clock_at(10, 0, 10)).await.unwrap();

    assert_eq!(summary.processed_count, 0);
    assert_eq!(summary.failed_count, 0);
}

#[tokio::test]
async fn test_failures_are_isolated_per_booking() {
    let mut ctx = TestContext::new();

    let failing = db_booking(Uuid::new_v4(), today(), 540, 570, "confirmed");
    let succeeding = db_booking(Uuid::new_v4(), today(), 600, 630, "confirmed");
    let failing_id = failing.id;
    let succeeding_id = succeeding.id;

    ctx.booking_repo
        .expect_auto_completion_candidates()
        .returning(move |_, _, _| Ok(vec![failing.clone(), succeeding.clone()]));
    ctx.booking_repo
        .expect_complete_if_still_confirmed()
        .returning(move |id, _| {
            if id == failing_id {
                Err(eyre::eyre!("row lock timeout"))
            } else {
                Ok(true)
            }
        });

    // 11:00 clock: both bookings ended in the past
    let summary = run_completion_wrapper(&ctx, clock_at(11, 0, 10)).await.unwrap();

    assert_eq!(summary.processed_count, 1);
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.processed_ids, vec![succeeding_id]);
    assert_eq!(summary.failed_ids, vec![failing_id]);
}

#[tokio::test]
async fn test_yesterdays_booking_completes_regardless_of_time() {
    let mut ctx = TestContext::new();

    let yesterday = today() - Duration::days(1);
    // Late-evening booking on the previous date
    let booking = db_booking(Uuid::new_v4(), yesterday, 1380, 1410, "confirmed");

    ctx.booking_repo
        .expect_auto_completion_candidates()
        .returning(move |_, _, _| Ok(vec![booking.clone()]));
    ctx.booking_repo
        .expect_complete_if_still_confirmed()
        .times(1)
        .returning(|_, _| Ok(true));

    // Just after midnight, when the same-day cutoff is not even defined yet
    let summary = run_completion_wrapper(&ctx, clock_at(0, 0, 10)).await.unwrap();

    assert_eq!(summary.processed_count, 1);
}
