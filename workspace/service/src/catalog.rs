//! Brands, categories, cars and their images.

use model::entities::car::{self, CarStatus, FuelType, Transmission};
use model::entities::prelude::*;
use model::entities::{car_brand, car_category, car_image};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;
use validator::Validate;

use crate::amount;
use crate::error::{Result, ServiceError};
use crate::lifecycle;

const BRAND: &str = "car_brand";
const CATEGORY: &str = "car_category";
const CAR: &str = "car";
const IMAGE: &str = "car_image";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBrand {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub logo: Option<String>,
}

/// Changes to a brand; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BrandChanges {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

/// Changes to a category; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryChanges {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCar {
    pub brand_id: Uuid,
    pub category_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub model_year: i32,
    #[validate(length(min = 1, max = 20))]
    pub license_plate: String,
    #[validate(length(min = 1, max = 50))]
    pub color: String,
    #[validate(range(min = 1, max = 100))]
    pub seats: i32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub daily_rate: Decimal,
    pub sale_price: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewImage {
    #[validate(length(min = 1))]
    pub image: String,
    #[serde(default)]
    pub is_featured: bool,
}

fn validate<T: Validate>(entity: &'static str, value: &T) -> Result<()> {
    value
        .validate()
        .map_err(|errors| ServiceError::from_validation_errors(entity, &errors))
}

#[instrument(skip(db))]
pub async fn create_brand(db: &DatabaseConnection, new_brand: NewBrand) -> Result<car_brand::Model> {
    let new_brand = NewBrand {
        name: new_brand.name.trim().to_string(),
        ..new_brand
    };
    validate(BRAND, &new_brand)?;

    let unique = [("name", new_brand.name.clone())];
    let brand = car_brand::ActiveModel {
        name: Set(new_brand.name),
        logo: Set(new_brand.logo),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err| ServiceError::from_write(BRAND, err, &unique))?;

    info!("Brand '{}' created with ID: {}", brand.name, brand.id);
    Ok(brand)
}

#[instrument(skip(db))]
pub async fn update_brand(
    db: &DatabaseConnection,
    id: Uuid,
    changes: BrandChanges,
) -> Result<car_brand::Model> {
    let changes = BrandChanges {
        name: changes.name.map(|name| name.trim().to_string()),
        ..changes
    };
    validate(BRAND, &changes)?;

    let brand = lifecycle::require_live::<CarBrand, _>(db, BRAND, id).await?;
    let mut active: car_brand::ActiveModel = brand.into();
    if let Some(name) = &changes.name {
        active.name = Set(name.clone());
    }
    if let Some(logo) = changes.logo {
        active.logo = Set(Some(logo));
    }

    let unique = [("name", changes.name.unwrap_or_default())];
    let brand = active
        .update(db)
        .await
        .map_err(|err| ServiceError::from_write(BRAND, err, &unique))?;

    info!("Brand {} updated", brand.id);
    Ok(brand)
}

/// Deletes a brand together with all of its cars.
#[instrument(skip(db))]
pub async fn delete_brand(db: &DatabaseConnection, id: Uuid) -> Result<()> {
    lifecycle::hard_delete::<CarBrand, _>(db, BRAND, id).await
}

#[instrument(skip(db))]
pub async fn create_category(
    db: &DatabaseConnection,
    new_category: NewCategory,
) -> Result<car_category::Model> {
    let new_category = NewCategory {
        name: new_category.name.trim().to_string(),
        ..new_category
    };
    validate(CATEGORY, &new_category)?;

    let unique = [("name", new_category.name.clone())];
    let category = car_category::ActiveModel {
        name: Set(new_category.name),
        description: Set(new_category.description),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err| ServiceError::from_write(CATEGORY, err, &unique))?;

    info!("Category '{}' created with ID: {}", category.name, category.id);
    Ok(category)
}

#[instrument(skip(db))]
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    changes: CategoryChanges,
) -> Result<car_category::Model> {
    let changes = CategoryChanges {
        name: changes.name.map(|name| name.trim().to_string()),
        ..changes
    };
    validate(CATEGORY, &changes)?;

    let category = lifecycle::require_live::<CarCategory, _>(db, CATEGORY, id).await?;
    let mut active: car_category::ActiveModel = category.into();
    if let Some(name) = &changes.name {
        active.name = Set(name.clone());
    }
    if let Some(description) = changes.description {
        active.description = Set(Some(description));
    }

    let unique = [("name", changes.name.unwrap_or_default())];
    let category = active
        .update(db)
        .await
        .map_err(|err| ServiceError::from_write(CATEGORY, err, &unique))?;

    info!("Category {} updated", category.id);
    Ok(category)
}

/// Deletes a category. Its cars stay, with their category cleared.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<()> {
    lifecycle::hard_delete::<CarCategory, _>(db, CATEGORY, id).await
}

/// Adds a car to the fleet with status `available`.
#[instrument(skip(db, new_car), fields(license_plate = %new_car.license_plate))]
pub async fn create_car(db: &DatabaseConnection, new_car: NewCar) -> Result<car::Model> {
    trace!("Entering create_car function");

    let new_car = NewCar {
        name: new_car.name.trim().to_string(),
        license_plate: new_car.license_plate.trim().to_string(),
        color: new_car.color.trim().to_string(),
        ..new_car
    };
    validate(CAR, &new_car)?;

    let model_years = car::current_model_year_range();
    if !model_years.contains(&new_car.model_year) {
        return Err(ServiceError::validation(
            CAR,
            "model_year",
            format!(
                "must be between {} and {}",
                model_years.start(),
                model_years.end()
            ),
        ));
    }
    if new_car.daily_rate.is_sign_negative() {
        return Err(ServiceError::validation(CAR, "daily_rate", "must not be negative"));
    }
    if new_car.sale_price.is_some_and(|price| price.is_sign_negative()) {
        return Err(ServiceError::validation(CAR, "sale_price", "must not be negative"));
    }
    let daily_rate = amount::PRICE.fit(CAR, "daily_rate", new_car.daily_rate)?;
    let sale_price = new_car
        .sale_price
        .map(|price| amount::SALE_PRICE.fit(CAR, "sale_price", price))
        .transpose()?;

    let txn = db.begin().await?;

    lifecycle::require_live::<CarBrand, _>(&txn, BRAND, new_car.brand_id).await?;
    lifecycle::require_live_opt::<CarCategory, _>(&txn, CATEGORY, new_car.category_id).await?;
    lifecycle::require_live_opt::<User, _>(&txn, "user", new_car.owner_id).await?;

    let unique = [("license_plate", new_car.license_plate.clone())];
    let car = car::ActiveModel {
        brand_id: Set(new_car.brand_id),
        category_id: Set(new_car.category_id),
        owner_id: Set(new_car.owner_id),
        name: Set(new_car.name),
        model_year: Set(new_car.model_year),
        license_plate: Set(new_car.license_plate),
        color: Set(new_car.color),
        seats: Set(new_car.seats),
        transmission: Set(new_car.transmission),
        fuel_type: Set(new_car.fuel_type),
        daily_rate: Set(daily_rate),
        sale_price: Set(sale_price),
        description: Set(new_car.description),
        status: Set(CarStatus::Available),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|err| ServiceError::from_write(CAR, err, &unique))?;

    txn.commit().await?;

    info!("Car {} ({}) created with ID: {}", car.name, car.license_plate, car.id);
    Ok(car)
}

#[instrument(skip(db))]
pub async fn find_car(db: &DatabaseConnection, id: Uuid) -> Result<car::Model> {
    lifecycle::require_live::<Car, _>(db, CAR, id).await
}

#[instrument(skip(db))]
pub async fn set_car_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: CarStatus,
) -> Result<car::Model> {
    let car = find_car(db, id).await?;

    let mut active: car::ActiveModel = car.into();
    active.status = Set(status);
    let car = active.update(db).await?;

    info!("Car {} status set to {:?}", car.id, car.status);
    Ok(car)
}

/// Live cars that can be booked, newest first.
#[instrument(skip(db))]
pub async fn list_available_cars(db: &DatabaseConnection) -> Result<Vec<car::Model>> {
    let cars = Car::find_live()
        .filter(car::Column::Status.eq(CarStatus::Available))
        .order_by_desc(car::Column::Created)
        .all(db)
        .await?;

    debug!("Found {} available cars", cars.len());
    Ok(cars)
}

#[instrument(skip(db))]
pub async fn soft_delete_car(db: &DatabaseConnection, id: Uuid) -> Result<()> {
    lifecycle::soft_delete::<Car, _>(db, CAR, id).await
}

/// Attaches an image to a car. A featured image replaces the car's
/// previously featured one.
#[instrument(skip(db))]
pub async fn attach_image(
    db: &DatabaseConnection,
    car_id: Uuid,
    new_image: NewImage,
) -> Result<car_image::Model> {
    validate(IMAGE, &new_image)?;

    let txn = db.begin().await?;

    lifecycle::require_live::<Car, _>(&txn, CAR, car_id).await?;

    if new_image.is_featured {
        let result = CarImage::update_many()
            .col_expr(car_image::Column::IsFeatured, Expr::value(false))
            .filter(car_image::Column::CarId.eq(car_id))
            .filter(car_image::Column::IsFeatured.eq(true))
            .exec(&txn)
            .await?;
        debug!("Unfeatured {} previous images", result.rows_affected);
    }

    let image = car_image::ActiveModel {
        car_id: Set(car_id),
        image: Set(new_image.image),
        is_featured: Set(new_image.is_featured),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!("Image {} attached to car {}", image.id, car_id);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{create_test_brand, create_test_car, create_test_user, new_car, setup_db};
    use chrono::{Datelike, Utc};
    use sea_orm::{EntityTrait, ModelTrait};

    #[tokio::test]
    async fn test_brand_name_is_unique() {
        let db = setup_db().await;
        create_test_brand(&db, "Toyota").await;

        let err = create_brand(
            &db,
            NewBrand {
                name: " Toyota ".to_string(),
                logo: None,
            },
        )
        .await
        .unwrap_err();

        assert!(
            matches!(err, ServiceError::Conflict { entity: "car_brand", field: "name", .. }),
            "{:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_update_brand() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyta").await;
        create_test_brand(&db, "Honda").await;

        let brand = update_brand(
            &db,
            brand.id,
            BrandChanges {
                name: Some("Toyota".to_string()),
                logo: Some("brands/logos/toyota.png".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(brand.name, "Toyota");
        assert_eq!(brand.logo.as_deref(), Some("brands/logos/toyota.png"));

        let err = update_brand(
            &db,
            brand.id,
            BrandChanges {
                name: Some("Honda".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }), "{:?}", err);

        let err = update_brand(&db, Uuid::new_v4(), BrandChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_category_create_and_update() {
        let db = setup_db().await;
        let category = create_category(
            &db,
            NewCategory {
                name: "SUV".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let category = update_category(
            &db,
            category.id,
            CategoryChanges {
                description: Some("Sport utility vehicles".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(category.name, "SUV");
        assert_eq!(category.description.as_deref(), Some("Sport utility vehicles"));

        let err = create_category(
            &db,
            NewCategory {
                name: "SUV".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }), "{:?}", err);

        let err = create_category(
            &db,
            NewCategory {
                name: "  ".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_create_car() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;
        let owner = create_test_user(&db, "owner@example.com").await;

        let car = create_car(
            &db,
            NewCar {
                owner_id: Some(owner.id),
                ..new_car(brand.id, " ABC-123 ")
            },
        )
        .await
        .unwrap();

        assert_eq!(car.license_plate, "ABC-123");
        assert_eq!(car.status, CarStatus::Available);
        assert!(car.is_available());
        assert_eq!(car.daily_rate, Decimal::new(5000, 2));
        assert_eq!(car.owner_id, Some(owner.id));
    }

    #[tokio::test]
    async fn test_duplicate_license_plate_conflicts() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;
        create_test_car(&db, brand.id, "ABC-123").await;

        let err = create_car(&db, new_car(brand.id, "ABC-123")).await.unwrap_err();

        assert!(
            matches!(err, ServiceError::Conflict { field: "license_plate", .. }),
            "{:?}",
            err
        );
        assert_eq!(Car::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_model_year_bounds() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;
        let current_year = Utc::now().year();

        let car_of_year = |plate: &str, model_year: i32| NewCar {
            model_year,
            ..new_car(brand.id, plate)
        };

        let err = create_car(&db, car_of_year("Y-1979", 1979)).await.unwrap_err();
        assert!(
            matches!(&err, ServiceError::Validation { field, .. } if field == "model_year"),
            "{:?}",
            err
        );

        create_car(&db, car_of_year("Y-1980", 1980)).await.unwrap();
        create_car(&db, car_of_year("Y-NEXT", current_year + 1)).await.unwrap();

        let err = create_car(&db, car_of_year("Y-LATE", current_year + 2))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_create_car_field_validation() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;

        let err = create_car(
            &db,
            NewCar {
                seats: 0,
                ..new_car(brand.id, "SEATS-0")
            },
        )
        .await
        .unwrap_err();
        assert!(
            matches!(&err, ServiceError::Validation { field, .. } if field == "seats"),
            "{:?}",
            err
        );

        let err = create_car(
            &db,
            NewCar {
                daily_rate: Decimal::new(-1, 0),
                ..new_car(brand.id, "NEG-1")
            },
        )
        .await
        .unwrap_err();
        assert!(
            matches!(&err, ServiceError::Validation { field, .. } if field == "daily_rate"),
            "{:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_create_car_amounts_fit_their_columns() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;

        let err = create_car(
            &db,
            NewCar {
                daily_rate: Decimal::new(1_000_000_000_000, 0),
                ..new_car(brand.id, "RATE-BIG")
            },
        )
        .await
        .unwrap_err();
        assert!(
            matches!(&err, ServiceError::Validation { field, .. } if field == "daily_rate"),
            "{:?}",
            err
        );

        let err = create_car(
            &db,
            NewCar {
                sale_price: Some(Decimal::new(10_000_000_000, 0)),
                ..new_car(brand.id, "SALE-BIG")
            },
        )
        .await
        .unwrap_err();
        assert!(
            matches!(&err, ServiceError::Validation { field, .. } if field == "sale_price"),
            "{:?}",
            err
        );
        assert!(Car::find().all(&db).await.unwrap().is_empty());

        // The largest values each column holds are accepted
        let car = create_car(
            &db,
            NewCar {
                daily_rate: Decimal::new(9_999_999_999, 2),
                sale_price: Some(Decimal::new(999_999_999_999, 2)),
                ..new_car(brand.id, "MAX-001")
            },
        )
        .await
        .unwrap();
        assert_eq!(car.daily_rate, Decimal::new(9_999_999_999, 2));
        assert_eq!(car.sale_price, Some(Decimal::new(999_999_999_999, 2)));
    }

    #[tokio::test]
    async fn test_create_car_requires_existing_references() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;

        let err = create_car(&db, new_car(Uuid::new_v4(), "ABC-123")).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::NotFound { entity: "car_brand", .. }),
            "{:?}",
            err
        );

        let err = create_car(
            &db,
            NewCar {
                category_id: Some(Uuid::new_v4()),
                ..new_car(brand.id, "ABC-123")
            },
        )
        .await
        .unwrap_err();
        assert!(
            matches!(err, ServiceError::NotFound { entity: "car_category", .. }),
            "{:?}",
            err
        );

        assert!(Car::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_availability_follows_status() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;
        let corolla = create_test_car(&db, brand.id, "ABC-123").await;
        let yaris = create_test_car(&db, brand.id, "XYZ-789").await;

        let rented = set_car_status(&db, corolla.id, CarStatus::Rented).await.unwrap();
        assert!(!rented.is_available());

        let available = list_available_cars(&db).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, yaris.id);

        soft_delete_car(&db, yaris.id).await.unwrap();
        assert!(list_available_cars(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attach_image() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;
        let car = create_test_car(&db, brand.id, "ABC-123").await;

        let front = attach_image(
            &db,
            car.id,
            NewImage {
                image: "cars/images/front.jpg".to_string(),
                is_featured: true,
            },
        )
        .await
        .unwrap();
        let side = attach_image(
            &db,
            car.id,
            NewImage {
                image: "cars/images/side.jpg".to_string(),
                is_featured: true,
            },
        )
        .await
        .unwrap();

        let images = car.find_related(CarImage).all(&db).await.unwrap();
        assert_eq!(images.len(), 2);
        let featured: Vec<_> = images.iter().filter(|i| i.is_featured).collect();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, side.id);
        assert!(images.iter().any(|i| i.id == front.id && !i.is_featured));

        let err = attach_image(
            &db,
            Uuid::new_v4(),
            NewImage {
                image: "cars/images/ghost.jpg".to_string(),
                is_featured: false,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_delete_brand_cascades_to_cars() {
        let db = setup_db().await;
        let toyota = create_test_brand(&db, "Toyota").await;
        let honda = create_test_brand(&db, "Honda").await;
        let corolla = create_test_car(&db, toyota.id, "ABC-123").await;
        create_test_car(&db, honda.id, "HND-001").await;
        attach_image(
            &db,
            corolla.id,
            NewImage {
                image: "cars/images/front.jpg".to_string(),
                is_featured: false,
            },
        )
        .await
        .unwrap();

        delete_brand(&db, toyota.id).await.unwrap();

        let cars = Car::find().all(&db).await.unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].brand_id, honda.id);
        assert!(CarImage::find().all(&db).await.unwrap().is_empty());

        assert!(matches!(
            delete_brand(&db, toyota.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_category_clears_car_category() {
        let db = setup_db().await;
        let brand = create_test_brand(&db, "Toyota").await;
        let sedan = create_category(
            &db,
            NewCategory {
                name: "Sedan".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        let car = create_car(
            &db,
            NewCar {
                category_id: Some(sedan.id),
                ..new_car(brand.id, "ABC-123")
            },
        )
        .await
        .unwrap();
        assert_eq!(car.category_id, Some(sedan.id));

        delete_category(&db, sedan.id).await.unwrap();

        let car = find_car(&db, car.id).await.unwrap();
        assert_eq!(car.category_id, None);
    }
}
