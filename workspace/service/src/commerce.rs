//! Rental bookings and payments.
//!
//! Both carry a status governed by an explicit transition table
//! (`BookingStatus::can_transition_to`, `PaymentStatus::can_transition_to`).
//! Status changes are applied with a conditional update on the status read,
//! so two concurrent changes cannot both succeed from the same state.

use chrono::{NaiveDate, Utc};
use model::entities::prelude::*;
use model::entities::rental_booking::{self, BookingStatus};
use model::entities::payment::{self, PaymentMethod, PaymentStatus};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;
use validator::Validate;

use crate::amount;
use crate::error::{Result, ServiceError};
use crate::lifecycle;

const BOOKING: &str = "rental_booking";
const PAYMENT: &str = "payment";

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Computed from the car's daily rate when absent.
    pub total_price: Option<Decimal>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[validate(length(min = 1, max = 100))]
    pub transaction_id: String,
}

/// Creates a pending booking.
///
/// Without an explicit `total_price` the price is
/// `(end_date - start_date).days × car.daily_rate`, using the rate read in
/// the same transaction as the insert. It is not recomputed afterwards.
#[instrument(skip(db))]
pub async fn create_booking(
    db: &DatabaseConnection,
    new_booking: NewBooking,
) -> Result<rental_booking::Model> {
    trace!("Entering create_booking function");

    if new_booking.end_date < new_booking.start_date {
        return Err(ServiceError::validation(
            BOOKING,
            "end_date",
            "must not be before start_date",
        ));
    }
    if new_booking
        .total_price
        .is_some_and(|price| price.is_sign_negative())
    {
        return Err(ServiceError::validation(BOOKING, "total_price", "must not be negative"));
    }

    let txn = db.begin().await?;

    lifecycle::require_live::<User, _>(&txn, "user", new_booking.user_id).await?;
    let car = lifecycle::require_live::<Car, _>(&txn, "car", new_booking.car_id).await?;

    let total_price = match new_booking.total_price {
        Some(price) => price,
        None => {
            let price = rental_booking::rental_price(
                new_booking.start_date,
                new_booking.end_date,
                car.daily_rate,
            );
            debug!(
                "Computed total price {} from daily rate {} of car {}",
                price, car.daily_rate, car.id
            );
            price
        }
    };
    let total_price = amount::PRICE.fit(BOOKING, "total_price", total_price)?;

    let booking = rental_booking::ActiveModel {
        user_id: Set(new_booking.user_id),
        car_id: Set(new_booking.car_id),
        start_date: Set(new_booking.start_date),
        end_date: Set(new_booking.end_date),
        total_price: Set(total_price),
        status: Set(BookingStatus::Pending),
        pickup_location: Set(new_booking.pickup_location),
        dropoff_location: Set(new_booking.dropoff_location),
        notes: Set(new_booking.notes),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| ServiceError::from_write(BOOKING, err, &[]))?;

    txn.commit().await?;

    info!(
        "Booking {} created for car {} ({} to {}), total {}",
        booking.id, booking.car_id, booking.start_date, booking.end_date, booking.total_price
    );
    Ok(booking)
}

#[instrument(skip(db))]
pub async fn find_booking(db: &DatabaseConnection, id: Uuid) -> Result<rental_booking::Model> {
    lifecycle::require_live::<RentalBooking, _>(db, BOOKING, id).await
}

/// Live bookings of a user, newest first.
#[instrument(skip(db))]
pub async fn bookings_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<rental_booking::Model>> {
    Ok(RentalBooking::find_live()
        .filter(rental_booking::Column::UserId.eq(user_id))
        .order_by_desc(rental_booking::Column::Created)
        .all(db)
        .await?)
}

/// Moves a booking to `target` if the transition table allows it.
#[instrument(skip(db))]
pub async fn transition_booking(
    db: &DatabaseConnection,
    id: Uuid,
    target: BookingStatus,
) -> Result<rental_booking::Model> {
    let txn = db.begin().await?;

    let booking = lifecycle::require_live::<RentalBooking, _>(&txn, BOOKING, id).await?;
    let current = booking.status;
    if !current.can_transition_to(target) {
        return Err(ServiceError::invalid_transition(
            BOOKING,
            current.to_value(),
            target.to_value(),
        ));
    }

    let result = RentalBooking::update_many()
        .col_expr(rental_booking::Column::Status, Expr::value(target))
        .col_expr(rental_booking::Column::Modified, Expr::value(Utc::now()))
        .filter(rental_booking::Column::Id.eq(id))
        .filter(rental_booking::Column::Status.eq(current))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        // Another caller changed the status since it was read
        return Err(ServiceError::invalid_transition(
            BOOKING,
            current.to_value(),
            target.to_value(),
        ));
    }

    let booking = lifecycle::require_live::<RentalBooking, _>(&txn, BOOKING, id).await?;
    txn.commit().await?;

    info!("Booking {} moved from {:?} to {:?}", id, current, target);
    Ok(booking)
}

/// Records a pending payment. The transaction id must be unique.
#[instrument(skip(db))]
pub async fn record_payment(
    db: &DatabaseConnection,
    new_payment: NewPayment,
) -> Result<payment::Model> {
    trace!("Entering record_payment function");

    let new_payment = NewPayment {
        transaction_id: new_payment.transaction_id.trim().to_string(),
        ..new_payment
    };
    new_payment
        .validate()
        .map_err(|errors| ServiceError::from_validation_errors(PAYMENT, &errors))?;
    if new_payment.amount <= Decimal::ZERO {
        return Err(ServiceError::validation(PAYMENT, "amount", "must be positive"));
    }
    let amount = amount::PRICE.fit(PAYMENT, "amount", new_payment.amount)?;

    let txn = db.begin().await?;

    lifecycle::require_live::<User, _>(&txn, "user", new_payment.user_id).await?;
    lifecycle::require_live_opt::<RentalBooking, _>(&txn, BOOKING, new_payment.booking_id).await?;

    let unique = [("transaction_id", new_payment.transaction_id.clone())];
    let payment = payment::ActiveModel {
        user_id: Set(new_payment.user_id),
        booking_id: Set(new_payment.booking_id),
        amount: Set(amount),
        method: Set(new_payment.method),
        transaction_id: Set(new_payment.transaction_id),
        status: Set(PaymentStatus::Pending),
        paid_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| ServiceError::from_write(PAYMENT, err, &unique))?;

    txn.commit().await?;

    info!(
        "Payment {} recorded ({} via {:?}, transaction {})",
        payment.id, payment.amount, payment.method, payment.transaction_id
    );
    Ok(payment)
}

/// Settles a payment.
///
/// `success` stamps `paid_at` with the current time; `failed` ends a pending
/// payment; `refunded` reverses a successful one.
#[instrument(skip(db))]
pub async fn confirm_payment(
    db: &DatabaseConnection,
    id: Uuid,
    outcome: PaymentStatus,
) -> Result<payment::Model> {
    let txn = db.begin().await?;

    let payment = lifecycle::require_live::<Payment, _>(&txn, PAYMENT, id).await?;
    let current = payment.status;
    if !current.can_transition_to(outcome) {
        return Err(ServiceError::invalid_transition(
            PAYMENT,
            current.to_value(),
            outcome.to_value(),
        ));
    }

    let now = Utc::now();
    let mut update = Payment::update_many()
        .col_expr(payment::Column::Status, Expr::value(outcome))
        .col_expr(payment::Column::Modified, Expr::value(now))
        .filter(payment::Column::Id.eq(id))
        .filter(payment::Column::Status.eq(current));
    if outcome == PaymentStatus::Success {
        update = update.col_expr(payment::Column::PaidAt, Expr::value(now));
    }

    let result = update.exec(&txn).await?;
    if result.rows_affected == 0 {
        // Another caller settled the payment since it was read
        return Err(ServiceError::invalid_transition(
            PAYMENT,
            current.to_value(),
            outcome.to_value(),
        ));
    }

    let payment = lifecycle::require_live::<Payment, _>(&txn, PAYMENT, id).await?;
    txn.commit().await?;

    info!("Payment {} moved from {:?} to {:?}", id, current, outcome);
    Ok(payment)
}
