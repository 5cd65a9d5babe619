use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{driver, user, user::UserRole};
use crate::error::AppResult;
use crate::handlers::auth::create_user;
use crate::store::{self, Booking};
use crate::utils::geo::Coordinate;
use crate::AppState;

// ============ Drivers ============

#[derive(Debug, Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub home_lat: Option<f64>,
    pub home_lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub home_lat: f64,
    pub home_lng: f64,
    pub created_at: DateTime<Utc>,
}

impl From<driver::Model> for DriverResponse {
    fn from(d: driver::Model) -> Self {
        Self {
            id: d.id,
            user_id: d.user_id,
            name: d.name,
            surname: d.surname,
            email: d.email,
            home_lat: d.home_lat,
            home_lng: d.home_lng,
            created_at: d.created_at.with_timezone(&Utc),
        }
    }
}

/// Register a driver: a driver-role user plus its profile, in one transaction
pub async fn create_driver(
    State(state): State<AppState>,
    Json(payload): Json<CreateDriverRequest>,
) -> AppResult<(StatusCode, Json<DriverResponse>)> {
    let home = Coordinate::from_parts(payload.home_lat, payload.home_lng, "Home")?;

    let txn = state.db.begin().await?;

    let account = create_user(
        &txn,
        &payload.email,
        &payload.password,
        &payload.name,
        UserRole::Driver,
    )
    .await?;

    let profile = driver::ActiveModel {
        user_id: Set(account.id),
        name: Set(account.name.clone()),
        surname: Set(payload.surname.trim().to_string()),
        email: Set(account.email.clone()),
        home_lat: Set(home.lat()),
        home_lng: Set(home.lng()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(driver_id = profile.id, user_id = %account.id, "Driver registered");

    Ok((StatusCode::CREATED, Json(profile.into())))
}

/// List all drivers (admin)
pub async fn list_drivers(State(state): State<AppState>) -> AppResult<Json<Vec<DriverResponse>>> {
    let drivers = driver::Entity::find()
        .order_by_asc(driver::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(drivers.into_iter().map(DriverResponse::from).collect()))
}

// ============ Trips ============

#[derive(Debug, Serialize)]
pub struct TripInfo {
    #[serde(flatten)]
    pub booking: Booking,
    pub rider_email: String,
}

/// List all trips (admin)
pub async fn list_all_trips(State(state): State<AppState>) -> AppResult<Json<Vec<TripInfo>>> {
    let bookings = state.bookings.all_bookings().await?;
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(store::rider_ids(&bookings)))
        .all(&state.db)
        .await?;

    let responses = bookings
        .into_iter()
        .map(|booking| {
            let rider_email = users
                .iter()
                .find(|u| u.id == booking.rider_id)
                .map(|u| u.email.clone())
                .unwrap_or_default();
            TripInfo {
                booking,
                rider_email,
            }
        })
        .collect();

    Ok(Json(responses))
}
