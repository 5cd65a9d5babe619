use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{admin, auth, driver, rider};
use crate::middleware::auth::{auth_middleware, require_admin, require_driver, require_rider};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let driver_governor = create_role_governor(RateLimitedRole::Driver);
    let rider_governor = create_role_governor(RateLimitedRole::Rider);
    let public_governor = create_public_governor();

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Quoting has no side effects and needs no session
    let public_routes = Router::new()
        .route("/quotes", post(rider::quote))
        .layer(public_governor);

    let admin_routes = Router::new()
        .route("/drivers", get(admin::list_drivers).post(admin::create_driver))
        .route("/trips", get(admin::list_all_trips))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let driver_routes = Router::new()
        .route("/trips", get(driver::my_trips))
        .layer(driver_governor)
        .layer(middleware::from_fn(require_driver))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let rider_routes = Router::new()
        .route("/", post(rider::book_trip).get(rider::my_trips))
        .layer(rider_governor)
        .layer(middleware::from_fn(require_rider))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/driver", driver_routes)
        .nest("/api/trips", rider_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{self, Body},
        extract::ConnectInfo,
        http::{header, Request, StatusCode},
    };
    use sea_orm::DatabaseConnection;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::entities::user::UserRole;
    use crate::services::{BookingService, DriverCatalog, LogNotifier, PricingPolicy, QuoteEngine};
    use crate::store::memory::{test_driver, MemoryStore};
    use crate::utils::jwt::create_token;

    const SECRET: &str = "test-secret";

    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            jwt_secret: SECRET.to_string(),
            jwt_expiration_hours: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            notify_webhook_url: None,
            notify_timeout_secs: 1,
            seed_demo_drivers: false,
        }
    }

    fn app(store: MemoryStore) -> Router {
        let store = Arc::new(store);
        let policy = PricingPolicy::default();
        let state = AppState::with_services(
            DatabaseConnection::default(),
            test_config(),
            QuoteEngine::new(DriverCatalog::new(store.clone()), policy.clone()),
            BookingService::new(
                store.clone(),
                store,
                Arc::new(LogNotifier),
                policy,
                Duration::from_secs(1),
            ),
        );
        create_router(state)
    }

    fn json_request(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let mut request = builder.body(Body::from(body.to_string())).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
        request
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn rider_token() -> String {
        create_token(Uuid::new_v4(), "rider@example.com", UserRole::Rider, SECRET, 1).unwrap()
    }

    #[tokio::test]
    async fn test_quote_returns_fallback_offers() {
        let response = app(MemoryStore::default())
            .oneshot(json_request(
                "/api/quotes",
                json!({
                    "origin_lat": 37.8881, "origin_lng": -4.7793,
                    "dest_lat": 37.8850, "dest_lng": -4.7805
                }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let offers = read_json(response).await;
        assert_eq!(offers[0]["driver_id"], 999);
        assert_eq!(offers[1]["driver_id"], 888);
        assert_eq!(offers[0]["price"], 3.5);
    }

    #[tokio::test]
    async fn test_quote_missing_coordinate_is_bad_request() {
        let response = app(MemoryStore::default())
            .oneshot(json_request(
                "/api/quotes",
                json!({ "origin_lat": 37.8881, "origin_lng": -4.7793, "dest_lat": 37.8850 }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_booking_requires_session() {
        let response = app(MemoryStore::default())
            .oneshot(json_request(
                "/api/trips",
                json!({
                    "driver_id": 1000, "price": 4.0,
                    "origin_lat": 37.8881, "origin_lng": -4.7793,
                    "dest_lat": 37.8850, "dest_lng": -4.7805
                }),
                None,
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_booking_synthetic_driver_is_unprocessable() {
        let token = rider_token();
        let response = app(MemoryStore::default())
            .oneshot(json_request(
                "/api/trips",
                json!({
                    "driver_id": 999, "price": 3.5,
                    "origin_lat": 37.8881, "origin_lng": -4.7793,
                    "dest_lat": 37.8850, "dest_lng": -4.7805
                }),
                Some(&token),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_booking_real_driver_is_created() {
        let token = rider_token();
        let store = MemoryStore::with_drivers(vec![test_driver(1000, "Angel", 37.8888, -4.7783)]);

        let response = app(store)
            .oneshot(json_request(
                "/api/trips",
                json!({
                    "driver_id": 1000, "price": 4.25,
                    "origin_lat": 37.8881, "origin_lng": -4.7793,
                    "dest_lat": 37.8850, "dest_lng": -4.7805,
                    "distance_km": 999.0
                }),
                Some(&token),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let booking = read_json(response).await;
        assert_eq!(booking["driver_id"], 1000);
        assert_eq!(booking["price"], 4.25);
        // Client-sent distance is ignored
        assert!(booking["distance_km"].as_f64().unwrap() < 1.0);
    }

    #[tokio::test]
    async fn test_driver_token_cannot_book() {
        let token =
            create_token(Uuid::new_v4(), "d@example.com", UserRole::Driver, SECRET, 1).unwrap();
        let response = app(MemoryStore::default())
            .oneshot(json_request("/api/trips", json!({}), Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
