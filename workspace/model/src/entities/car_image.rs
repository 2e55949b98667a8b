use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::base::{base_entity, ActivationStatus};

/// One picture of a car. A car has at most one featured image.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car_images")]
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
    pub car_id: Uuid,
    /// Opaque reference into the file store.
    pub image: String,
    pub is_featured: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id",
        on_delete = "Cascade"
    )]
    Car,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

base_entity!();
