//! Record-level helpers shared by every module: live lookups and soft delete.

use chrono::Utc;
use model::entities::base::SoftDelete;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, ServiceError};

/// Loads a live (not soft-deleted) record or fails with `NotFound`.
pub(crate) async fn require_live<E, C>(db: &C, entity: &'static str, id: Uuid) -> Result<E::Model>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    debug!("Looking up {} {}", entity, id);
    E::find_live_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found(entity, id))
}

/// Like [`require_live`] for optional references.
pub(crate) async fn require_live_opt<E, C>(
    db: &C,
    entity: &'static str,
    id: Option<Uuid>,
) -> Result<Option<E::Model>>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    match id {
        Some(id) => Ok(Some(require_live::<E, C>(db, entity, id).await?)),
        None => Ok(None),
    }
}

/// Marks a live record as deleted. Dependent rows are left untouched.
pub(crate) async fn soft_delete<E, C>(db: &C, entity: &'static str, id: Uuid) -> Result<()>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::is_deleted_column(), Expr::value(true))
        .col_expr(E::modified_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .filter(E::is_deleted_column().eq(false))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::not_found(entity, id));
    }

    info!("Soft-deleted {} {}", entity, id);
    Ok(())
}

/// Physically removes a record; the storage layer applies the referential
/// actions of its dependants.
pub(crate) async fn hard_delete<E, C>(db: &C, entity: &'static str, id: Uuid) -> Result<()>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let result = E::delete_many()
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::not_found(entity, id));
    }

    info!("Deleted {} {}", entity, id);
    Ok(())
}
