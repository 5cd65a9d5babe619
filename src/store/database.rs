use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{Booking, BookingStore, Driver, DriverStore, NewBooking};
use crate::entities::{driver, trip};
use crate::error::AppResult;

/// Postgres-backed store over the sea-orm entities.
#[derive(Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DriverStore for DatabaseStore {
    async fn list_drivers(&self) -> AppResult<Vec<Driver>> {
        driver::Entity::find()
            .order_by_asc(driver::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Driver::try_from)
            .collect()
    }

    async fn find_driver(&self, id: i32) -> AppResult<Option<Driver>> {
        driver::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Driver::try_from)
            .transpose()
    }
}

#[async_trait]
impl BookingStore for DatabaseStore {
    async fn insert_booking(&self, booking: NewBooking) -> AppResult<Booking> {
        let new_trip = trip::ActiveModel {
            id: Set(Uuid::new_v4()),
            rider_id: Set(booking.rider_id),
            driver_id: Set(booking.driver_id),
            origin_lat: Set(booking.origin.lat()),
            origin_lng: Set(booking.origin.lng()),
            dest_lat: Set(booking.destination.lat()),
            dest_lng: Set(booking.destination.lng()),
            price: Set(booking.price),
            distance_km: Set(booking.distance_km),
            ..Default::default()
        };

        Ok(new_trip.insert(&self.db).await?.into())
    }

    async fn bookings_for_rider(&self, rider_id: Uuid) -> AppResult<Vec<Booking>> {
        let trips = trip::Entity::find()
            .filter(trip::Column::RiderId.eq(rider_id))
            .order_by_desc(trip::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(trips.into_iter().map(Booking::from).collect())
    }

    async fn bookings_for_driver(&self, driver_id: i32) -> AppResult<Vec<Booking>> {
        let trips = trip::Entity::find()
            .filter(trip::Column::DriverId.eq(driver_id))
            .order_by_desc(trip::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(trips.into_iter().map(Booking::from).collect())
    }

    async fn all_bookings(&self) -> AppResult<Vec<Booking>> {
        let trips = trip::Entity::find()
            .order_by_desc(trip::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(trips.into_iter().map(Booking::from).collect())
    }
}
