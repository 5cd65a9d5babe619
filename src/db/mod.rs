use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};

use crate::config::Config;
use crate::entities::{driver, user, user::UserRole};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::create_user;

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

const ADMIN_EMAIL: &str = "admin@tripbooking.local";

/// Create the admin account if it doesn't exist
pub async fn seed_admin(db: &DatabaseConnection) -> AppResult<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(ADMIN_EMAIL))
        .one(db)
        .await?;

    if existing.is_none() {
        create_user(db, ADMIN_EMAIL, "admin123", "Admin", UserRole::Admin).await?;
        tracing::info!("Admin account created: {}", ADMIN_EMAIL);
    }

    Ok(())
}

/// (name, surname, email, home_lat, home_lng)
const DEMO_DRIVERS: [(&str, &str, &str, f64, f64); 3] = [
    ("Angel", "Moyano", "angel@gmail.com", 37.888800, -4.778320),
    ("Marcos", "Leal", "marcos@gmail.com", 37.885000, -4.780500),
    ("Carlos", "Gómez", "carlos@gmail.com", 37.887500, -4.776200),
];

/// Register the demo drivers when the driver table is empty
pub async fn seed_demo_drivers(db: &DatabaseConnection) -> AppResult<()> {
    if driver::Entity::find().count(db).await? > 0 {
        tracing::debug!("Drivers already present, skipping demo seed");
        return Ok(());
    }

    let txn = db.begin().await?;
    for (name, surname, email, home_lat, home_lng) in DEMO_DRIVERS {
        let account = create_user(&txn, email, "secret123", name, UserRole::Driver).await?;
        driver::ActiveModel {
            user_id: Set(account.id),
            name: Set(name.to_string()),
            surname: Set(surname.to_string()),
            email: Set(account.email),
            home_lat: Set(home_lat),
            home_lng: Set(home_lng),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    tracing::info!(count = DEMO_DRIVERS.len(), "Demo drivers seeded");
    Ok(())
}
