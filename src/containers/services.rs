use crate::biospecimens::models as biospecimens;
use crate::containers::models::{ActiveModel, Column, Entity, Model};
use crate::samples::models as samples;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

/// Keep the biospecimen's container in step with its resolved sample: create
/// the container on first sighting, otherwise refresh its aliquot id, volume,
/// and sample link (the sample changes when the biospecimen's natural key
/// changed). Refreshes the new sample's aggregate volume and reconciles the
/// sample the container moved away from.
pub async fn sync_container<C: ConnectionTrait>(
    conn: &C,
    biospecimen: &biospecimens::Model,
    sample: &samples::Model,
) -> Result<Model, DbErr> {
    let existing = Entity::find()
        .filter(Column::BiospecimenId.eq(biospecimen.id))
        .one(conn)
        .await?;

    let (container, previous_sample_id) = match existing {
        Some(model) => {
            let previous = (model.sample_id != sample.id).then_some(model.sample_id);
            let mut active = model.into_active_model();
            active.external_aliquot_id = Set(biospecimen.external_aliquot_id.clone());
            active.volume_ul = Set(biospecimen.volume_ul);
            active.sample_id = Set(sample.id);
            active.last_updated = Set(Utc::now());
            (active.update(conn).await?, previous)
        }
        None => {
            let now = Utc::now();
            let active = ActiveModel {
                id: Set(Uuid::new_v4()),
                external_aliquot_id: Set(biospecimen.external_aliquot_id.clone()),
                volume_ul: Set(biospecimen.volume_ul),
                biospecimen_id: Set(biospecimen.id),
                sample_id: Set(sample.id),
                created_at: Set(now),
                last_updated: Set(now),
            };
            (active.insert(conn).await?, None)
        }
    };

    recompute_sample_volume(conn, sample.id).await?;

    // The sample this container moved away from may now be an orphan. Its
    // cleanup must not fail the triggering write; the next write touching
    // that sample repairs the state.
    if let Some(sample_id) = previous_sample_id {
        if let Err(err) = reconcile_sample(conn, sample_id).await {
            tracing::warn!(%sample_id, error = %err, "sample reconciliation failed after container move; retried on next write");
        }
    }

    Ok(container)
}

/// Recompute a sample's volume as the sum of its containers' non-null
/// volumes. Containers without a volume contribute nothing; a sample whose
/// containers all lack a volume reads NULL, never zero.
///
/// Read-then-write: concurrent writers touching the same sample's containers
/// can lose an update. The next structural change recomputes from scratch.
pub async fn recompute_sample_volume<C: ConnectionTrait>(
    conn: &C,
    sample_id: Uuid,
) -> Result<samples::Model, DbErr> {
    let containers = Entity::find()
        .filter(Column::SampleId.eq(sample_id))
        .all(conn)
        .await?;

    let volumes: Vec<f64> = containers
        .iter()
        .filter_map(|container| container.volume_ul)
        .collect();
    let volume = if volumes.is_empty() {
        None
    } else {
        Some(volumes.iter().sum())
    };

    let sample = samples::Entity::find_by_id(sample_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Sample with id '{sample_id}' not found")))?;
    let mut active = sample.into_active_model();
    active.volume_ul = Set(volume);
    active.last_updated = Set(Utc::now());
    active.update(conn).await
}

/// Delete the sample if no container references it any more. Returns whether
/// a row was removed. Orphans only ever bloat the samples table; a missed
/// purge is repaired by the next structural change.
pub async fn purge_if_orphaned<C: ConnectionTrait>(
    conn: &C,
    sample_id: Uuid,
) -> Result<bool, DbErr> {
    let remaining = Entity::find()
        .filter(Column::SampleId.eq(sample_id))
        .count(conn)
        .await?;
    if remaining > 0 {
        return Ok(false);
    }

    samples::Entity::delete_by_id(sample_id).exec(conn).await?;
    tracing::debug!(%sample_id, "purged orphaned sample");
    Ok(true)
}

/// Applied after every structural change to a sample's containers: purge the
/// sample when orphaned, otherwise refresh its aggregate volume.
pub async fn reconcile_sample<C: ConnectionTrait>(conn: &C, sample_id: Uuid) -> Result<(), DbErr> {
    if !purge_if_orphaned(conn, sample_id).await? {
        recompute_sample_volume(conn, sample_id).await?;
    }
    Ok(())
}
