use anyhow::{Context, Result};
use chrono::NaiveDate;
use model::entities::car::{FuelType, Transmission};
use model::entities::payment::{PaymentMethod, PaymentStatus};
use model::entities::rental_booking::BookingStatus;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use service::catalog::{self, NewBrand, NewCar, NewCategory, NewImage};
use service::commerce::{self, NewBooking, NewPayment};
use service::feedback::{self, NewReview};
use service::identity::{self, NewUser};
use tracing::{info, trace};

/// Loads the demo data set through the service layer, so every rule applies.
/// Running it twice fails with a conflict on the first duplicate.
pub async fn seed_demo(db: &DatabaseConnection) -> Result<()> {
    trace!("Entering seed_demo function");

    let owner = identity::create_user(
        db,
        NewUser {
            email: "fleet@carsales.example".to_string(),
            first_name: "Fleet".to_string(),
            last_name: "Manager".to_string(),
            is_staff: true,
            has_accepted_terms: true,
            ..Default::default()
        },
    )
    .await?;
    identity::set_user_active(db, owner.id, true).await?;

    let customer = identity::create_user(
        db,
        NewUser {
            email: "jane.doe@carsales.example".to_string(),
            phone_number: Some("+237600000001".to_string()),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address: Some("12 Avenue Kennedy, Yaounde".to_string()),
            has_accepted_terms: true,
            ..Default::default()
        },
    )
    .await?;
    identity::set_user_active(db, customer.id, true).await?;

    let brand = catalog::create_brand(
        db,
        NewBrand {
            name: "Toyota".to_string(),
            logo: Some("brands/logos/toyota.png".to_string()),
        },
    )
    .await?;
    let category = catalog::create_category(
        db,
        NewCategory {
            name: "Sedan".to_string(),
            description: Some("Four-door passenger cars".to_string()),
        },
    )
    .await?;

    let car = catalog::create_car(
        db,
        NewCar {
            brand_id: brand.id,
            category_id: Some(category.id),
            owner_id: Some(owner.id),
            name: "Corolla".to_string(),
            model_year: 2022,
            license_plate: "CE-123-AB".to_string(),
            color: "White".to_string(),
            seats: 5,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Hybrid,
            daily_rate: Decimal::new(5000, 2),
            sale_price: Some(Decimal::new(1850000, 2)),
            description: Some("Reliable city car".to_string()),
        },
    )
    .await?;
    catalog::attach_image(
        db,
        car.id,
        NewImage {
            image: "cars/images/corolla-front.jpg".to_string(),
            is_featured: true,
        },
    )
    .await?;

    let booking = commerce::create_booking(
        db,
        NewBooking {
            user_id: customer.id,
            car_id: car.id,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid demo start date")?,
            end_date: NaiveDate::from_ymd_opt(2024, 1, 4).context("invalid demo end date")?,
            total_price: None,
            pickup_location: Some("Airport".to_string()),
            dropoff_location: Some("Airport".to_string()),
            notes: None,
        },
    )
    .await?;
    commerce::transition_booking(db, booking.id, BookingStatus::Confirmed).await?;

    let payment = commerce::record_payment(
        db,
        NewPayment {
            user_id: customer.id,
            booking_id: Some(booking.id),
            amount: booking.total_price,
            method: PaymentMethod::MobileMoney,
            transaction_id: "DEMO-0001".to_string(),
        },
    )
    .await?;
    commerce::confirm_payment(db, payment.id, PaymentStatus::Success).await?;
    commerce::transition_booking(db, booking.id, BookingStatus::Completed).await?;

    feedback::create_review(
        db,
        NewReview {
            user_id: customer.id,
            car_id: car.id,
            rating: 5,
            comment: Some("Clean car and a smooth pickup".to_string()),
        },
    )
    .await?;

    info!(
        "Demo data loaded: booking {} for {} at {}",
        booking.id,
        customer.full_name(),
        booking.total_price
    );
    Ok(())
}
