use std::ops::RangeInclusive;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::base::{base_entity, ActivationStatus};

/// Oldest model year accepted for a car.
pub const MIN_MODEL_YEAR: i32 = 1980;

/// Lifecycle status of a car in the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CarStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "rented")]
    Rented,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    #[sea_orm(string_value = "automatic")]
    Automatic,
    #[sea_orm(string_value = "manual")]
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[sea_orm(string_value = "petrol")]
    Petrol,
    #[sea_orm(string_value = "diesel")]
    Diesel,
    #[sea_orm(string_value = "electric")]
    Electric,
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
}

/// A car available for rent or sale.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub is_deleted: bool,
    pub activation_status: ActivationStatus,
    pub activate_date: Option<DateTimeUtc>,
    pub deactivate_date: Option<DateTimeUtc>,
    pub created: DateTimeUtc,
    pub modified: DateTimeUtc,
    pub metadata: Json,
    pub brand_id: Uuid,
    /// Cleared when the category is deleted.
    pub category_id: Option<Uuid>,
    pub name: String,
    pub model_year: i32,
    #[sea_orm(unique)]
    pub license_plate: String,
    pub color: String,
    pub seats: i32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    /// Daily rental price.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub daily_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub sale_price: Option<Decimal>,
    pub description: Option<String>,
    /// Cleared when the owning user is deleted.
    pub owner_id: Option<Uuid>,
    pub status: CarStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car_brand::Entity",
        from = "Column::BrandId",
        to = "super::car_brand::Column::Id",
        on_delete = "Cascade"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::car_category::Entity",
        from = "Column::CategoryId",
        to = "super::car_category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Owner,
    #[sea_orm(has_many = "super::car_image::Entity")]
    Image,
    #[sea_orm(has_many = "super::rental_booking::Entity")]
    RentalBooking,
    #[sea_orm(has_many = "super::car_review::Entity")]
    CarReview,
}

impl Related<super::car_brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::car_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::car_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl Related<super::rental_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalBooking.def()
    }
}

impl Related<super::car_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarReview.def()
    }
}

base_entity!();

impl Model {
    /// True exactly when the car can be booked right now.
    pub fn is_available(&self) -> bool {
        self.status == CarStatus::Available
    }
}

/// Model years accepted when `current_year` is the calendar year.
pub fn model_year_range(current_year: i32) -> RangeInclusive<i32> {
    MIN_MODEL_YEAR..=current_year + 1
}

/// Model years accepted today.
pub fn current_model_year_range() -> RangeInclusive<i32> {
    model_year_range(Utc::now().year())
}
