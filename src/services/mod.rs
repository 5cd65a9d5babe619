pub mod booking;
pub mod catalog;
pub mod notifier;
pub mod pricing;
pub mod quote;

pub use booking::{Booked, BookingService, NotificationStatus};
pub use catalog::{CatalogResult, DriverCatalog};
pub use notifier::{LogNotifier, Notifier, WebhookNotifier};
pub use pricing::PricingPolicy;
pub use quote::{Offer, QuoteEngine};
