use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::base::{base_entity, ActivationStatus};

/// A customer or administrator, identified by email.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
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
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    /// Opaque reference into the file store.
    pub profile_photo: Option<String>,
    /// Users start inactive until an administrator or a confirmation flow
    /// activates them.
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub has_accepted_terms: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::car::Entity")]
    OwnedCar,
    #[sea_orm(has_many = "super::rental_booking::Entity")]
    RentalBooking,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
    #[sea_orm(has_many = "super::car_review::Entity")]
    CarReview,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedCar.def()
    }
}

impl Related<super::rental_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalBooking.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl Related<super::car_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarReview.def()
    }
}

base_entity!();

impl Model {
    /// First and last name joined by a space with the result trimmed, or the
    /// email when both are blank.
    pub fn full_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name, self.last_name);
        let full_name = full_name.trim();
        if full_name.is_empty() {
            self.email.clone()
        } else {
            full_name.to_string()
        }
    }
}
