//! Storage seams for drivers and bookings.
//!
//! The quoting path only reads drivers; bookings are append-only.

pub mod database;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{driver, trip};
use crate::error::AppResult;
use crate::utils::geo::Coordinate;

pub use database::DatabaseStore;

#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub home: Coordinate,
}

impl TryFrom<driver::Model> for Driver {
    type Error = crate::error::AppError;

    fn try_from(model: driver::Model) -> AppResult<Self> {
        Ok(Self {
            id: model.id,
            home: Coordinate::new(model.home_lat, model.home_lng)?,
            name: model.name,
            surname: model.surname,
            email: model.email,
        })
    }
}

/// A booking that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub rider_id: Uuid,
    pub driver_id: i32,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub price: f64,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub driver_id: i32,
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
    pub price: f64,
    pub distance_km: f64,
    pub created_at: DateTime<Utc>,
}

impl From<trip::Model> for Booking {
    fn from(model: trip::Model) -> Self {
        Self {
            id: model.id,
            rider_id: model.rider_id,
            driver_id: model.driver_id,
            origin_lat: model.origin_lat,
            origin_lng: model.origin_lng,
            dest_lat: model.dest_lat,
            dest_lng: model.dest_lng,
            price: model.price,
            distance_km: model.distance_km,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Distinct rider ids across `bookings`, for a single user lookup.
pub fn rider_ids(bookings: &[Booking]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = bookings.iter().map(|b| b.rider_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[async_trait]
pub trait DriverStore: Send + Sync {
    /// All registered drivers, ordered by id.
    async fn list_drivers(&self) -> AppResult<Vec<Driver>>;

    async fn find_driver(&self, id: i32) -> AppResult<Option<Driver>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: NewBooking) -> AppResult<Booking>;

    async fn bookings_for_rider(&self, rider_id: Uuid) -> AppResult<Vec<Booking>>;

    async fn bookings_for_driver(&self, driver_id: i32) -> AppResult<Vec<Booking>>;

    async fn all_bookings(&self) -> AppResult<Vec<Booking>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_for(rider_id: Uuid) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            rider_id,
            driver_id: 1000,
            origin_lat: 37.8881,
            origin_lng: -4.7793,
            dest_lat: 37.9,
            dest_lng: -4.75,
            price: 5.10,
            distance_km: 2.4,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rider_ids_are_distinct() {
        let ana = Uuid::new_v4();
        let bea = Uuid::new_v4();
        let bookings = vec![booking_for(ana), booking_for(bea), booking_for(ana)];

        let ids = rider_ids(&bookings);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&ana));
        assert!(ids.contains(&bea));
    }

    #[test]
    fn test_rider_ids_empty() {
        assert!(rider_ids(&[]).is_empty());
    }
}
