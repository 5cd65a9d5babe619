pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::{
    BookingService, DriverCatalog, LogNotifier, Notifier, PricingPolicy, QuoteEngine,
    WebhookNotifier,
};
use store::DatabaseStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub quotes: QuoteEngine,
    pub bookings: BookingService,
}

impl AppState {
    /// Wire the quoting and booking services over the database.
    pub fn new(db: DatabaseConnection, config: Config) -> AppResult<Self> {
        let store = Arc::new(DatabaseStore::new(db.clone()));
        let policy = PricingPolicy::default();

        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => {
                tracing::info!(url = %url, "Driver notifications via webhook");
                Arc::new(
                    WebhookNotifier::new(url.clone(), config.notify_timeout())
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                )
            }
            None => {
                tracing::warn!("NOTIFY_WEBHOOK_URL not set, driver notifications are only logged");
                Arc::new(LogNotifier)
            }
        };

        let quotes = QuoteEngine::new(DriverCatalog::new(store.clone()), policy.clone());
        let bookings = BookingService::new(
            store.clone(),
            store,
            notifier,
            policy,
            config.notify_timeout(),
        );

        Ok(Self::with_services(db, config, quotes, bookings))
    }

    pub fn with_services(
        db: DatabaseConnection,
        config: Config,
        quotes: QuoteEngine,
        bookings: BookingService,
    ) -> Self {
        Self {
            db,
            config,
            quotes,
            bookings,
        }
    }
}
