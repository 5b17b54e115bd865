use crate::biospecimens::models::{
    ActiveModel, BiospecimenCreate, BiospecimenUpdate, Entity, Model,
};
use crate::containers::models as containers;
use crate::containers::services as container_services;
use crate::samples::services as sample_services;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, TransactionTrait,
};
use uuid::Uuid;

// Entry points the external CRUD layer calls. Each write wraps the
// biospecimen mutation and the sample/container derivation in one
// transaction, so a failure anywhere rolls back the whole request.

pub async fn get_biospecimen(db: &DatabaseConnection, id: Uuid) -> Result<Model, DbErr> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Biospecimen with id '{id}' not found")))
}

pub async fn create_biospecimen(
    db: &DatabaseConnection,
    create_data: BiospecimenCreate,
) -> Result<Model, DbErr> {
    let txn = db.begin().await?;

    let active_model: ActiveModel = create_data.into();
    let inserted = active_model.insert(&txn).await?;
    sample_services::manage_sample_containers(&txn, &inserted).await?;

    txn.commit().await?;
    Ok(inserted)
}

pub async fn update_biospecimen(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: BiospecimenUpdate,
) -> Result<Model, DbErr> {
    let txn = db.begin().await?;

    let existing = Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Biospecimen with id '{id}' not found")))?;
    let updated = update_data
        .merge_into_active_model(existing.into_active_model())
        .update(&txn)
        .await?;
    sample_services::manage_sample_containers(&txn, &updated).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Delete the biospecimen and its container, then reconcile the sample the
/// container belonged to: purge it if orphaned, otherwise refresh its
/// aggregate volume. Reconciliation failures do not fail the delete.
pub async fn delete_biospecimen(db: &DatabaseConnection, id: Uuid) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    let existing = Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Biospecimen with id '{id}' not found")))?;

    let container = containers::Entity::find()
        .filter(containers::Column::BiospecimenId.eq(existing.id))
        .one(&txn)
        .await?;
    let affected_sample = container.as_ref().map(|container| container.sample_id);

    if let Some(container) = container {
        containers::Entity::delete_by_id(container.id).exec(&txn).await?;
    }
    Entity::delete_by_id(existing.id).exec(&txn).await?;

    if let Some(sample_id) = affected_sample {
        if let Err(err) = container_services::reconcile_sample(&txn, sample_id).await {
            tracing::warn!(%sample_id, error = %err, "sample reconciliation failed after biospecimen delete; retried on next write");
        }
    }

    txn.commit().await?;
    Ok(())
}
