//! Car reviews and ratings.

use model::entities::car_review;
use model::entities::prelude::*;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, ServiceError};
use crate::lifecycle;

const ENTITY: &str = "car_review";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewReview {
    pub user_id: Uuid,
    pub car_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
}

/// Arithmetic mean of `ratings` rounded to two places, `None` when empty.
pub(crate) fn mean_rating(ratings: &[i32]) -> Option<Decimal> {
    if ratings.is_empty() {
        return None;
    }
    let total: i64 = ratings.iter().map(|&rating| i64::from(rating)).sum();
    let count = Decimal::from(ratings.len() as u64);
    Some((Decimal::from(total) / count).round_dp(2))
}

/// Records a user's review of a car. A user reviews a given car at most once.
#[instrument(skip(db))]
pub async fn create_review(
    db: &DatabaseConnection,
    new_review: NewReview,
) -> Result<car_review::Model> {
    trace!("Entering create_review function");

    new_review
        .validate()
        .map_err(|errors| ServiceError::from_validation_errors(ENTITY, &errors))?;

    let txn = db.begin().await?;

    lifecycle::require_live::<User, _>(&txn, "user", new_review.user_id).await?;
    lifecycle::require_live::<Car, _>(&txn, "car", new_review.car_id).await?;

    let pair = format!("{}/{}", new_review.user_id, new_review.car_id);
    let review = car_review::ActiveModel {
        user_id: Set(new_review.user_id),
        car_id: Set(new_review.car_id),
        rating: Set(new_review.rating),
        comment: Set(new_review
            .comment
            .map(|comment| comment.trim().to_string())
            .filter(|comment| !comment.is_empty())),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| ServiceError::from_write(ENTITY, err, &[("user_id, car_id", pair)]))?;

    txn.commit().await?;

    info!(
        "Review {} added for car {} with rating {}",
        review.id, review.car_id, review.rating
    );
    Ok(review)
}

/// Live reviews of a car, newest first.
#[instrument(skip(db))]
pub async fn reviews_for_car(
    db: &DatabaseConnection,
    car_id: Uuid,
) -> Result<Vec<car_review::Model>> {
    lifecycle::require_live::<Car, _>(db, "car", car_id).await?;

    Ok(CarReview::find_live()
        .filter(car_review::Column::CarId.eq(car_id))
        .order_by_desc(car_review::Column::Created)
        .all(db)
        .await?)
}

/// Mean rating over the car's live reviews, `None` when it has none.
#[instrument(skip(db))]
pub async fn average_rating(db: &DatabaseConnection, car_id: Uuid) -> Result<Option<Decimal>> {
    let ratings: Vec<i32> = reviews_for_car(db, car_id)
        .await?
        .into_iter()
        .map(|review| review.rating)
        .collect();

    let average = mean_rating(&ratings);
    debug!("Car {} has {} reviews, average {:?}", car_id, ratings.len(), average);
    Ok(average)
}

#[instrument(skip(db))]
pub async fn soft_delete_review(db: &DatabaseConnection, id: Uuid) -> Result<()> {
    lifecycle::soft_delete::<CarReview, _>(db, ENTITY, id).await
}
