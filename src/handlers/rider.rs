use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::Offer;
use crate::store::Booking;
use crate::utils::geo::Coordinate;
use crate::utils::jwt::Claims;
use crate::AppState;

// Fields are optional so a missing value surfaces as InvalidRequest rather
// than a generic extractor rejection.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub dest_lat: Option<f64>,
    pub dest_lng: Option<f64>,
}

impl QuoteRequest {
    pub fn coordinates(&self) -> AppResult<(Coordinate, Coordinate)> {
        Ok((
            Coordinate::from_parts(self.origin_lat, self.origin_lng, "Origin")?,
            Coordinate::from_parts(self.dest_lat, self.dest_lng, "Destination")?,
        ))
    }
}

/// List priced offers for a trip
pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<Vec<Offer>>> {
    let (origin, destination) = payload.coordinates()?;
    let offers = state.quotes.quote(origin, destination).await?;
    Ok(Json(offers))
}

#[derive(Debug, Deserialize)]
pub struct BookTripRequest {
    pub driver_id: Option<i32>,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub dest_lat: Option<f64>,
    pub dest_lng: Option<f64>,
    pub price: Option<f64>,
}

/// Book a trip with one of the offered drivers
pub async fn book_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BookTripRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let driver_id = payload
        .driver_id
        .ok_or_else(|| AppError::InvalidRequest("driver_id is required".to_string()))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::InvalidRequest("price is required".to_string()))?;
    let origin = Coordinate::from_parts(payload.origin_lat, payload.origin_lng, "Origin")?;
    let destination = Coordinate::from_parts(payload.dest_lat, payload.dest_lng, "Destination")?;

    // The notification task is detached; its outcome is only logged
    let booked = state
        .bookings
        .book(claims.sub, driver_id, origin, destination, price)
        .await?;

    Ok((StatusCode::CREATED, Json(booked.booking)))
}

/// List the current rider's trips
pub async fn my_trips(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(state.bookings.rider_bookings(claims.sub).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_requires_all_fields() {
        let payload: QuoteRequest =
            serde_json::from_str(r#"{"origin_lat": 37.8881, "origin_lng": -4.7793, "dest_lat": 37.885}"#)
                .unwrap();
        assert!(matches!(payload.coordinates(), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_quote_request_rejects_out_of_range() {
        let payload: QuoteRequest = serde_json::from_str(
            r#"{"origin_lat": 137.0, "origin_lng": -4.7793, "dest_lat": 37.885, "dest_lng": -4.7805}"#,
        )
        .unwrap();
        assert!(matches!(payload.coordinates(), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_quote_request_parses() {
        let payload: QuoteRequest = serde_json::from_str(
            r#"{"origin_lat": 37.8881, "origin_lng": -4.7793, "dest_lat": 37.885, "dest_lng": -4.7805}"#,
        )
        .unwrap();
        let (origin, destination) = payload.coordinates().unwrap();
        assert_eq!(origin.lat(), 37.8881);
        assert_eq!(destination.lng(), -4.7805);
    }
}
