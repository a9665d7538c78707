//! Best-effort client notifications, delivered through the external email
//! collaborator. The engine never depends on delivery: callers log failures
//! and move on.

use async_trait::async_trait;
use eyre::Result;
use serde_json::json;

use bookwise_core::models::booking::Booking;

#[async_trait]
pub trait CancellationNotifier: Send + Sync {
    async fn booking_cancelled(&self, booking: &Booking) -> Result<()>;
}

/// Posts cancellation notices to the external mailer service, which resolves
/// the client's address and renders the email.
pub struct MailerClient {
    client: reqwest::Client,
    base_url: String,
}

impl MailerClient {
    pub fn new(base_url: String) -> Self {
        MailerClient {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl CancellationNotifier for MailerClient {
    async fn booking_cancelled(&self, booking: &Booking) -> Result<()> {
        let url = format!(
            "{}/notifications/booking-cancelled",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "booking_id": booking.id,
                "client_id": booking.client_id,
                "date": booking.date,
                "start": booking.start,
                "reason": booking.cancellation_reason,
            }))
            .send()
            .await?;
        response.error_for_status()?;

        Ok(())
    }
}

/// Used when no mailer is configured; cancellations proceed without email.
pub struct NoopNotifier;

#[async_trait]
impl CancellationNotifier for NoopNotifier {
    async fn booking_cancelled(&self, booking: &Booking) -> Result<()> {
        tracing::debug!(
            "No mailer configured; skipping notification for booking {}",
            booking.id
        );
        Ok(())
    }
}
