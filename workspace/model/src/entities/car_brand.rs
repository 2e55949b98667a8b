use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::base::{base_entity, ActivationStatus};

/// A car manufacturer such as Toyota or BMW.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car_brands")]
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
    pub name: String,
    /// Opaque reference into the file store.
    pub logo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::car::Entity")]
    Car,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

base_entity!();
