use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Booking, BookingStore, Driver, DriverStore, NewBooking};
use crate::error::AppResult;
use crate::utils::geo::Coordinate;

/// In-process store for tests.
#[derive(Default)]
pub struct MemoryStore {
    drivers: RwLock<Vec<Driver>>,
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryStore {
    pub fn with_drivers(drivers: Vec<Driver>) -> Self {
        Self {
            drivers: RwLock::new(drivers),
            bookings: RwLock::default(),
        }
    }

    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }
}

pub fn test_driver(id: i32, name: &str, lat: f64, lng: f64) -> Driver {
    Driver {
        id,
        name: name.to_string(),
        surname: "Tester".to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        home: Coordinate::new(lat, lng).unwrap(),
    }
}

#[async_trait]
impl DriverStore for MemoryStore {
    async fn list_drivers(&self) -> AppResult<Vec<Driver>> {
        let mut drivers = self.drivers.read().await.clone();
        drivers.sort_by_key(|d| d.id);
        Ok(drivers)
    }

    async fn find_driver(&self, id: i32) -> AppResult<Option<Driver>> {
        Ok(self.drivers.read().await.iter().find(|d| d.id == id).cloned())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking(&self, booking: NewBooking) -> AppResult<Booking> {
        let record = Booking {
            id: Uuid::new_v4(),
            rider_id: booking.rider_id,
            driver_id: booking.driver_id,
            origin_lat: booking.origin.lat(),
            origin_lng: booking.origin.lng(),
            dest_lat: booking.destination.lat(),
            dest_lng: booking.destination.lng(),
            price: booking.price,
            distance_km: booking.distance_km,
            created_at: Utc::now(),
        };
        self.bookings.write().await.push(record.clone());
        Ok(record)
    }

    async fn bookings_for_rider(&self, rider_id: Uuid) -> AppResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.rider_id == rider_id)
            .cloned()
            .collect())
    }

    async fn bookings_for_driver(&self, driver_id: i32) -> AppResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.driver_id == driver_id)
            .cloned()
            .collect())
    }

    async fn all_bookings(&self) -> AppResult<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }
}
