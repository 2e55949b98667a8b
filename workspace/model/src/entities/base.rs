//! Columns and behaviour shared by every table.
//!
//! Each entity carries the same bookkeeping columns: a UUID primary key,
//! a soft-delete flag, an activation marker with an optional window,
//! creation/modification timestamps and a free-form JSON metadata bag.
//! The [`base_entity!`] macro wires the defaults for these columns into the
//! entity's `ActiveModelBehavior` and implements [`SoftDelete`] for it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activation marker of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "active")]
    Active,
}

/// Read helpers that hide soft-deleted rows.
pub trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn is_deleted_column() -> Self::Column;
    fn modified_column() -> Self::Column;

    /// All rows that have not been soft-deleted.
    fn find_live() -> Select<Self> {
        Self::find().filter(Self::is_deleted_column().eq(false))
    }

    /// A single live row by id.
    fn find_live_by_id(id: Uuid) -> Select<Self> {
        Self::find_live().filter(Self::id_column().eq(id))
    }
}

/// Implements `ActiveModelBehavior` and [`SoftDelete`] for the entity defined
/// in the calling module.
///
/// `ActiveModel::new()` (and therefore `Default::default()`) fills the base
/// columns and opens the activation window at creation time; every update
/// restamps `modified`.
macro_rules! base_entity {
    () => {
        #[async_trait::async_trait]
        impl ActiveModelBehavior for ActiveModel {
            fn new() -> Self {
                let now = chrono::Utc::now();
                Self {
                    id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
                    is_deleted: sea_orm::ActiveValue::Set(false),
                    activation_status: sea_orm::ActiveValue::Set(
                        $crate::entities::base::ActivationStatus::Active,
                    ),
                    activate_date: sea_orm::ActiveValue::Set(Some(now)),
                    created: sea_orm::ActiveValue::Set(now),
                    modified: sea_orm::ActiveValue::Set(now),
                    metadata: sea_orm::ActiveValue::Set(serde_json::json!({})),
                    ..<Self as ActiveModelTrait>::default()
                }
            }

            async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
            where
                C: ConnectionTrait,
            {
                if !insert {
                    self.modified = sea_orm::ActiveValue::Set(chrono::Utc::now());
                }
                Ok(self)
            }
        }

        impl $crate::entities::base::SoftDelete for Entity {
            fn id_column() -> Column {
                Column::Id
            }

            fn is_deleted_column() -> Column {
                Column::IsDeleted
            }

            fn modified_column() -> Column {
                Column::Modified
            }
        }
    };
}

pub(crate) use base_entity;
