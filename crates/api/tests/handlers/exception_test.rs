use std::sync::Mutex;

use async_trait::async_trait;
use bookwise_core::models::booking::{Booking, BookingStatus};
use bookwise_core::time::TimeOfDay;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use uuid::Uuid;

use crate::test_utils::{TestContext, db_booking};
use bookwise_api::handlers::exception::notify_cancelled;
use bookwise_api::notify::CancellationNotifier;
use bookwise_db::repositories::exception::NewException;

// Records every notification attempt and fails for one designated booking.
struct RecordingNotifier {
    fail_for: Option<Uuid>,
    calls: Mutex<Vec<Uuid>>,
}

impl RecordingNotifier {
    fn new(fail_for: Option<Uuid>) -> Self {
        RecordingNotifier {
            fail_for,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Uuid> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CancellationNotifier for RecordingNotifier {
    async fn booking_cancelled(&self, booking: &Booking) -> Result<()> {
        self.calls.lock().unwrap().push(booking.id);
        if self.fail_for == Some(booking.id) {
            return Err(eyre::eyre!("mailer unavailable"));
        }
        Ok(())
    }
}

fn cancelled_booking(start: &str, end: &str) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        professional_id: Uuid::new_v4(),
        staff_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        start: start.parse::<TimeOfDay>().unwrap(),
        end: end.parse::<TimeOfDay>().unwrap(),
        status: BookingStatus::CancelledSystem,
        auto_completed_at: None,
        completed_by: None,
        auto_cancelled_by_exception: true,
        cancelled_at: Some(Utc::now()),
        cancellation_reason: Some("closed day".to_string()),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_every_cancelled_booking_is_notified() {
    let notifier = RecordingNotifier::new(None);
    let cancelled = vec![
        cancelled_booking("09:00", "09:30"),
        cancelled_booking("10:00", "10:30"),
        cancelled_booking("11:00", "11:30"),
    ];

    let delivered = notify_cancelled(&notifier, &cancelled).await;

    assert_eq!(delivered, 3);
    assert_eq!(notifier.calls().len(), 3);
}

#[tokio::test]
async fn test_notification_failure_does_not_stop_the_fan_out() {
    let cancelled = vec![
        cancelled_booking("09:00", "09:30"),
        cancelled_booking("10:00", "10:30"),
        cancelled_booking("11:00", "11:30"),
    ];
    let notifier = RecordingNotifier::new(Some(cancelled[1].id));

    let delivered = notify_cancelled(&notifier, &cancelled).await;

    // The failing booking is still attempted, and the rest are delivered
    assert_eq!(delivered, 2);
    assert_eq!(notifier.calls().len(), 3);
}

#[tokio::test]
async fn test_closed_day_cascade_reports_cancelled_count() {
    let mut ctx = TestContext::new();

    let professional_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

    let cancelled_rows = vec![
        db_booking(Uuid::new_v4(), date, 540, 570, "cancelled_system"),
        db_booking(Uuid::new_v4(), date, 600, 630, "cancelled_system"),
        db_booking(Uuid::new_v4(), date, 660, 690, "cancelled_system"),
    ];

    {
        let cancelled_rows = cancelled_rows.clone();
        ctx.exception_repo
            .expect_apply_exception()
            .times(1)
            .returning(move |new: NewException| {
                assert!(new.is_closed);
                let exception = bookwise_db::models::DbScheduleException {
                    id: Uuid::new_v4(),
                    professional_id: new.professional_id,
                    staff_id: new.staff_id,
                    date: new.date,
                    is_closed: new.is_closed,
                    time_ranges: None,
                    created_at: Utc::now(),
                };
                Ok((exception, cancelled_rows.clone()))
            });
    }

    let new = NewException {
        professional_id,
        staff_id: None,
        date,
        is_closed: true,
        time_ranges: None,
    };
    let (exception, cancelled) = ctx.exception_repo.apply_exception(new).await.unwrap();

    assert!(exception.is_closed);
    assert_eq!(cancelled.len(), 3);

    // Fan out notifications for the cancelled rows, tolerating one failure
    let domain: Vec<Booking> = cancelled
        .into_iter()
        .map(|row| row.into_domain().unwrap())
        .collect();
    let notifier = RecordingNotifier::new(Some(domain[0].id));
    let delivered = notify_cancelled(&notifier, &domain).await;

    assert_eq!(delivered, 2);
    assert_eq!(notifier.calls().len(), 3);
}
