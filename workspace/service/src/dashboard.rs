//! Admin overview figures computed over live records.

use std::collections::BTreeMap;

use model::entities::car::{self, CarStatus};
use model::entities::payment::{self, PaymentStatus};
use model::entities::prelude::*;
use model::entities::rental_booking::{self, BookingStatus};
use model::entities::{car_review, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, Iterable, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::feedback::mean_rating;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Live users without staff rights.
    pub customers: u64,
    /// Live cars per status; every status is present, possibly with zero.
    pub cars_by_status: BTreeMap<String, u64>,
    pub bookings_by_status: BTreeMap<String, u64>,
    /// Sum of successful payments.
    pub revenue: Decimal,
    pub reviews: u64,
    pub average_rating: Option<Decimal>,
}

#[instrument(skip(db))]
pub async fn summary(db: &DatabaseConnection) -> Result<DashboardSummary> {
    let customers = User::find_live()
        .filter(user::Column::IsStaff.eq(false))
        .count(db)
        .await?;

    let mut cars_by_status = BTreeMap::new();
    for status in CarStatus::iter() {
        let count = Car::find_live()
            .filter(car::Column::Status.eq(status))
            .count(db)
            .await?;
        cars_by_status.insert(status.to_value(), count);
    }

    let mut bookings_by_status = BTreeMap::new();
    for status in BookingStatus::iter() {
        let count = RentalBooking::find_live()
            .filter(rental_booking::Column::Status.eq(status))
            .count(db)
            .await?;
        bookings_by_status.insert(status.to_value(), count);
    }

    let amounts: Vec<Decimal> = Payment::find_live()
        .select_only()
        .column(payment::Column::Amount)
        .filter(payment::Column::Status.eq(PaymentStatus::Success))
        .into_tuple()
        .all(db)
        .await?;
    let revenue: Decimal = amounts.into_iter().sum();

    let ratings: Vec<i32> = CarReview::find_live()
        .select_only()
        .column(car_review::Column::Rating)
        .into_tuple()
        .all(db)
        .await?;

    let summary = DashboardSummary {
        customers,
        cars_by_status,
        bookings_by_status,
        revenue,
        reviews: ratings.len() as u64,
        average_rating: mean_rating(&ratings),
    };
    debug!(?summary, "Computed dashboard summary");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, set_car_status};
    use crate::commerce::{
        confirm_payment, create_booking, record_payment, transition_booking, NewBooking,
        NewPayment,
    };
    use crate::feedback::{create_review, NewReview};
    use crate::identity::{create_user, soft_delete_user, NewUser};
    use crate::testing::{create_test_brand, create_test_user, new_car, setup_db};
    use chrono::NaiveDate;
    use model::entities::payment::PaymentMethod;

    #[tokio::test]
    async fn test_empty_summary() {
        let db = setup_db().await;

        let summary = summary(&db).await.unwrap();

        assert_eq!(summary.customers, 0);
        assert_eq!(summary.cars_by_status.len(), CarStatus::iter().count());
        assert!(summary.cars_by_status.values().all(|&count| count == 0));
        assert_eq!(summary.bookings_by_status.get("pending"), Some(&0));
        assert_eq!(summary.revenue, Decimal::ZERO);
        assert_eq!(summary.reviews, 0);
        assert_eq!(summary.average_rating, None);
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let db = setup_db().await;
        create_user(
            &db,
            NewUser {
                email: "admin@example.com".to_string(),
                is_staff: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let customer = create_test_user(&db, "customer@example.com").await;
        let gone = create_test_user(&db, "gone@example.com").await;
        soft_delete_user(&db, gone.id).await.unwrap();

        let brand = create_test_brand(&db, "Toyota").await;
        let corolla = catalog::create_car(&db, new_car(brand.id, "ABC-123")).await.unwrap();
        let yaris = catalog::create_car(&db, new_car(brand.id, "XYZ-789")).await.unwrap();
        set_car_status(&db, yaris.id, CarStatus::Maintenance).await.unwrap();

        let booking = create_booking(
            &db,
            NewBooking {
                user_id: customer.id,
                car_id: corolla.id,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
                total_price: None,
                pickup_location: None,
                dropoff_location: None,
                notes: None,
            },
        )
        .await
        .unwrap();
        transition_booking(&db, booking.id, BookingStatus::Confirmed)
            .await
            .unwrap();

        let payment = |transaction_id: &str| NewPayment {
            user_id: customer.id,
            booking_id: Some(booking.id),
            amount: booking.total_price,
            method: PaymentMethod::Cash,
            transaction_id: transaction_id.to_string(),
        };
        let paid = record_payment(&db, payment("TX-1")).await.unwrap();
        confirm_payment(&db, paid.id, PaymentStatus::Success)
            .await
            .unwrap();
        let failed = record_payment(&db, payment("TX-2")).await.unwrap();
        confirm_payment(&db, failed.id, PaymentStatus::Failed)
            .await
            .unwrap();
        record_payment(&db, payment("TX-3")).await.unwrap();

        create_review(
            &db,
            NewReview {
                user_id: customer.id,
                car_id: corolla.id,
                rating: 4,
                comment: None,
            },
        )
        .await
        .unwrap();

        let summary = summary(&db).await.unwrap();

        assert_eq!(summary.customers, 1);
        assert_eq!(summary.cars_by_status.get("available"), Some(&1));
        assert_eq!(summary.cars_by_status.get("maintenance"), Some(&1));
        assert_eq!(summary.cars_by_status.get("rented"), Some(&0));
        assert_eq!(summary.bookings_by_status.get("confirmed"), Some(&1));
        assert_eq!(summary.bookings_by_status.get("pending"), Some(&0));
        assert_eq!(summary.revenue, Decimal::new(15000, 2));
        assert_eq!(summary.reviews, 1);
        assert_eq!(summary.average_rating, Some(Decimal::new(400, 2)));
    }
}
