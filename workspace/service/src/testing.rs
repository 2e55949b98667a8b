//! Shared fixtures for the service tests.

use migration::{Migrator, MigratorTrait};
use model::entities::{car, car_brand, user};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::catalog::{self, NewBrand, NewCar};
use crate::identity::{self, NewUser};

/// Create an in-memory SQLite database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    init_test_tracing();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Logs through the test writer at RUST_LOG level (WARN by default).
fn init_test_tracing() {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    // Another test may have installed the subscriber already.
    let _ = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_test_writer()
        .try_init();
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        ..Default::default()
    }
}

pub async fn create_test_user(db: &DatabaseConnection, email: &str) -> user::Model {
    identity::create_user(db, new_user(email))
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_brand(db: &DatabaseConnection, name: &str) -> car_brand::Model {
    catalog::create_brand(
        db,
        NewBrand {
            name: name.to_string(),
            logo: None,
        },
    )
    .await
    .expect("Failed to create test brand")
}

/// A 2022 Corolla renting at 50.00 a day.
pub fn new_car(brand_id: uuid::Uuid, license_plate: &str) -> NewCar {
    NewCar {
        brand_id,
        category_id: None,
        owner_id: None,
        name: "Corolla".to_string(),
        model_year: 2022,
        license_plate: license_plate.to_string(),
        color: "White".to_string(),
        seats: 5,
        transmission: car::Transmission::Automatic,
        fuel_type: car::FuelType::Petrol,
        daily_rate: Decimal::new(5000, 2),
        sale_price: None,
        description: None,
    }
}

pub async fn create_test_car(
    db: &DatabaseConnection,
    brand_id: uuid::Uuid,
    license_plate: &str,
) -> car::Model {
    catalog::create_car(db, new_car(brand_id, license_plate))
        .await
        .expect("Failed to create test car")
}
