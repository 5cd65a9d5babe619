//! Best-effort driver notifications.
//!
//! Failures here are reported through [`NotificationError`] and logged by the
//! caller. They never turn into an [`AppError`](crate::error::AppError).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::store::{Booking, Driver};

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification relay answered {0}")]
    Rejected(reqwest::StatusCode),

    #[error("notification timed out after {0:?}")]
    Timeout(Duration),
}

/// Mail payload handed to the relay.
#[derive(Debug, Clone, Serialize)]
pub struct TripRequestedMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl TripRequestedMail {
    pub fn new(driver: &Driver, booking: &Booking) -> Self {
        Self {
            to: driver.email.clone(),
            subject: "New trip requested".to_string(),
            body: format!(
                "Hello {}, a rider booked a trip with you.\n\
                 Pickup: {:.6}, {:.6}\n\
                 Drop-off: {:.6}, {:.6}\n\
                 Distance: {:.2} km\n\
                 Price: {:.2}\n\
                 Booking: {}",
                driver.name,
                booking.origin_lat,
                booking.origin_lng,
                booking.dest_lat,
                booking.dest_lng,
                booking.distance_km,
                booking.price,
                booking.id,
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_driver(&self, driver: &Driver, booking: &Booking)
        -> Result<(), NotificationError>;
}

/// Posts the mail payload as JSON to a relay endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_driver(
        &self,
        driver: &Driver,
        booking: &Booking,
    ) -> Result<(), NotificationError> {
        let mail = TripRequestedMail::new(driver, booking);
        let response = self.client.post(&self.url).json(&mail).send().await?;

        if !response.status().is_success() {
            return Err(NotificationError::Rejected(response.status()));
        }

        Ok(())
    }
}

/// Writes the mail to the log. Used when no relay is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_driver(
        &self,
        driver: &Driver,
        booking: &Booking,
    ) -> Result<(), NotificationError> {
        let mail = TripRequestedMail::new(driver, booking);
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            booking_id = %booking.id,
            "Driver notification (no relay configured)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::store::memory::test_driver;

    fn booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            rider_id: Uuid::new_v4(),
            driver_id: 1000,
            origin_lat: 37.8881,
            origin_lng: -4.7793,
            dest_lat: 37.8850,
            dest_lng: -4.7805,
            price: 3.5,
            distance_km: 0.36,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_mail_addresses_driver() {
        let driver = test_driver(1000, "Angel", 37.8888, -4.7783);
        let booking = booking();
        let mail = TripRequestedMail::new(&driver, &booking);

        assert_eq!(mail.to, "angel@example.com");
        assert!(mail.body.contains("Angel"));
        assert!(mail.body.contains("3.50"));
        assert!(mail.body.contains(&booking.id.to_string()));
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        let driver = test_driver(1000, "Angel", 37.8888, -4.7783);
        assert!(LogNotifier.notify_driver(&driver, &booking()).await.is_ok());
    }

    #[tokio::test]
    async fn test_webhook_unreachable_is_an_error() {
        // Nothing listens on the discard port locally
        let notifier =
            WebhookNotifier::new("http://127.0.0.1:9/mail", Duration::from_millis(500)).unwrap();
        let driver = test_driver(1000, "Angel", 37.8888, -4.7783);

        let result = notifier.notify_driver(&driver, &booking()).await;
        assert!(matches!(result, Err(NotificationError::Transport(_))));
    }
}
