use axum::{extract::State, Extension, Json};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;

use crate::entities::{driver, user};
use crate::error::{AppError, AppResult};
use crate::store::{self, Booking};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DriverTripResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub rider_name: String,
}

/// List trips booked with the logged-in driver
pub async fn my_trips(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<DriverTripResponse>>> {
    let profile = driver::Entity::find()
        .filter(driver::Column::UserId.eq(claims.sub))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver profile not found".to_string()))?;

    let bookings = state.bookings.driver_bookings(profile.id).await?;

    let riders = user::Entity::find()
        .filter(user::Column::Id.is_in(store::rider_ids(&bookings)))
        .all(&state.db)
        .await?;

    let responses = bookings
        .into_iter()
        .map(|booking| {
            let rider_name = riders
                .iter()
                .find(|u| u.id == booking.rider_id)
                .map(|u| u.name.clone())
                .unwrap_or_default();
            DriverTripResponse {
                booking,
                rider_name,
            }
        })
        .collect();

    Ok(Json(responses))
}
