use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::catalog::is_synthetic_id;
use super::notifier::{NotificationError, Notifier};
use super::pricing::PricingPolicy;
use crate::error::{AppError, AppResult};
use crate::store::{Booking, BookingStore, Driver, DriverStore, NewBooking};
use crate::utils::geo::{self, Coordinate};

/// Outcome of the notification that follows a persisted booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    Failed,
}

/// A persisted booking plus the detached notification task.
///
/// Dropping `notification` detaches the task; it keeps running.
pub struct Booked {
    pub booking: Booking,
    pub notification: JoinHandle<NotificationStatus>,
}

#[derive(Clone)]
pub struct BookingService {
    drivers: Arc<dyn DriverStore>,
    bookings: Arc<dyn BookingStore>,
    notifier: Arc<dyn Notifier>,
    policy: PricingPolicy,
    notify_timeout: Duration,
}

impl BookingService {
    pub fn new(
        drivers: Arc<dyn DriverStore>,
        bookings: Arc<dyn BookingStore>,
        notifier: Arc<dyn Notifier>,
        policy: PricingPolicy,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            drivers,
            bookings,
            notifier,
            policy,
            notify_timeout,
        }
    }

    /// Persist a booking for `rider_id` with a real driver, then notify the
    /// driver in the background.
    ///
    /// The client-offered price is stored as given once it clears the floor;
    /// the distance is always recomputed here.
    pub async fn book(
        &self,
        rider_id: Uuid,
        driver_id: i32,
        origin: Coordinate,
        destination: Coordinate,
        offered_price: f64,
    ) -> AppResult<Booked> {
        if !offered_price.is_finite() || offered_price < self.policy.price_floor {
            return Err(AppError::InvalidRequest(format!(
                "Price must be at least {:.2}",
                self.policy.price_floor
            )));
        }

        let driver = self.resolve_driver(driver_id).await?;
        let distance_km = geo::distance(origin, destination);

        let booking = self
            .bookings
            .insert_booking(NewBooking {
                rider_id,
                driver_id: driver.id,
                origin,
                destination,
                price: offered_price,
                distance_km,
            })
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            rider_id = %rider_id,
            driver_id = driver.id,
            distance_km,
            price = offered_price,
            "Trip booked"
        );

        let notification = self.dispatch_notification(driver, booking.clone());

        Ok(Booked {
            booking,
            notification,
        })
    }

    pub async fn rider_bookings(&self, rider_id: Uuid) -> AppResult<Vec<Booking>> {
        self.bookings.bookings_for_rider(rider_id).await
    }

    pub async fn driver_bookings(&self, driver_id: i32) -> AppResult<Vec<Booking>> {
        self.bookings.bookings_for_driver(driver_id).await
    }

    pub async fn all_bookings(&self) -> AppResult<Vec<Booking>> {
        self.bookings.all_bookings().await
    }

    async fn resolve_driver(&self, driver_id: i32) -> AppResult<Driver> {
        if is_synthetic_id(driver_id) {
            tracing::warn!(driver_id, "Rejected booking for synthetic driver");
            return Err(AppError::UnknownDriver(driver_id));
        }

        self.drivers
            .find_driver(driver_id)
            .await?
            .ok_or(AppError::UnknownDriver(driver_id))
    }

    fn dispatch_notification(&self, driver: Driver, booking: Booking) -> JoinHandle<NotificationStatus> {
        let notifier = Arc::clone(&self.notifier);
        let timeout = self.notify_timeout;

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, notifier.notify_driver(&driver, &booking)).await {
                Ok(result) => result,
                Err(_) => Err(NotificationError::Timeout(timeout)),
            };

            match result {
                Ok(()) => {
                    tracing::debug!(booking_id = %booking.id, driver_id = driver.id, "Driver notified");
                    NotificationStatus::Sent
                }
                Err(e) => {
                    tracing::error!(
                        booking_id = %booking.id,
                        driver_id = driver.id,
                        error = %e,
                        "Failed to notify driver"
                    );
                    NotificationStatus::Failed
                }
            }
        })
    }
}
