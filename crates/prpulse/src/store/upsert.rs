use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter};

use super::errors::{Result, StoreError};
use super::params::{LinkParams, UpsertParams};

/// Execute an upsert and return the stored row.
///
/// The insert runs without `RETURNING` so the same path works on every
/// backend; the row is then read back by its match key.
///
/// # Errors
/// Returns `StoreError::Database` if either statement fails, or
/// `StoreError::NotFound` if the row cannot be read back.
pub async fn upsert<A>(
    db: &DatabaseConnection,
    params: UpsertParams<A>,
) -> Result<<A::Entity as EntityTrait>::Model>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let UpsertParams {
        model,
        on_conflict,
        key,
    } = params;

    <A::Entity as EntityTrait>::insert(model)
        .on_conflict(on_conflict)
        .exec_without_returning(db)
        .await?;

    <A::Entity as EntityTrait>::find()
        .filter(key.clone())
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("{key:?}")))
}

/// Insert a join row unless it already exists.
///
/// Returns `true` when a row was inserted.
pub async fn link<A>(db: &DatabaseConnection, params: LinkParams<A>) -> Result<bool>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let inserted = <A::Entity as EntityTrait>::insert(params.model)
        .on_conflict(params.on_conflict)
        .exec_without_returning(db)
        .await?;
    Ok(inserted > 0)
}
