use crate::biospecimens::models as biospecimens;
use crate::containers::services as container_services;
use crate::samples::models::{ActiveModel, Column, Entity, Model};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Placeholder stored when a text component of the natural key is not
/// supplied. NULL would bypass the unique index (NULL compares distinct from
/// NULL), so the sentinel is the persisted value, not just a match key.
pub const NOT_REPORTED: &str = "Not Reported";
/// Sentinel for an unreported age at event.
pub const AGE_NOT_REPORTED: i32 = -9999;
/// Sentinel for an unreported concentration.
pub const CONCENTRATION_NOT_REPORTED: f64 = -9999.0;

/// Natural-key fields of a sample, extracted from a biospecimen by the fixed
/// biospecimen→sample field mapping (`external_sample_id` → `external_id`;
/// the remaining fields keep their names). Construction applies the sentinel
/// normalization, so two biospecimens that leave the same fields unset
/// resolve to the same sample.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleNaturalKey {
    pub external_id: String,
    pub participant_id: Uuid,
    pub age_at_event_days: i32,
    pub composition: String,
    pub tissue_type: String,
    pub analyte_type: String,
    pub anatomical_location: String,
    pub method_of_sample_procurement: String,
    pub preservation_method: String,
    pub concentration_mg_per_ml: f64,
}

impl SampleNaturalKey {
    pub fn from_biospecimen(biospecimen: &biospecimens::Model) -> Self {
        Self {
            external_id: text_or_not_reported(biospecimen.external_sample_id.as_deref()),
            participant_id: biospecimen.participant_id,
            age_at_event_days: biospecimen.age_at_event_days.unwrap_or(AGE_NOT_REPORTED),
            composition: text_or_not_reported(biospecimen.composition.as_deref()),
            tissue_type: text_or_not_reported(biospecimen.tissue_type.as_deref()),
            analyte_type: text_or_not_reported(biospecimen.analyte_type.as_deref()),
            anatomical_location: text_or_not_reported(biospecimen.anatomical_location.as_deref()),
            method_of_sample_procurement: text_or_not_reported(
                biospecimen.method_of_sample_procurement.as_deref(),
            ),
            preservation_method: text_or_not_reported(biospecimen.preservation_method.as_deref()),
            concentration_mg_per_ml: biospecimen
                .concentration_mg_per_ml
                .unwrap_or(CONCENTRATION_NOT_REPORTED),
        }
    }
}

fn text_or_not_reported(value: Option<&str>) -> String {
    value.map_or_else(|| NOT_REPORTED.to_string(), ToString::to_string)
}

/// Human-readable event key: participant id, external sample id, and age at
/// event joined with `-`. Components that are unset, empty, or zero read as
/// `"Not Reported"`. Deterministic, no side effects.
pub fn sample_event_key(biospecimen: &biospecimens::Model) -> String {
    let external_id = match biospecimen.external_sample_id.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NOT_REPORTED.to_string(),
    };
    let age = match biospecimen.age_at_event_days {
        Some(age) if age != 0 => age.to_string(),
        _ => NOT_REPORTED.to_string(),
    };
    format!("{}-{external_id}-{age}", biospecimen.participant_id)
}

/// Insert-or-update the sample matching the biospecimen's natural key.
///
/// The write is a single atomic `INSERT .. ON CONFLICT .. DO UPDATE` against
/// `uq_samples_natural_key`, so two requests racing on the same key resolve
/// inside the store instead of both observing "no sample yet" and inserting
/// twice. Only non-key attributes are updated on conflict; the row id is
/// generated on the insert branch only and never regenerated.
///
/// Runs on the caller's connection or transaction and never commits itself.
pub async fn upsert_sample<C: ConnectionTrait>(
    conn: &C,
    biospecimen: &biospecimens::Model,
) -> Result<Model, DbErr> {
    let key = SampleNaturalKey::from_biospecimen(biospecimen);
    let now = Utc::now();

    let payload = ActiveModel {
        id: Set(Uuid::new_v4()),
        external_id: Set(key.external_id.clone()),
        participant_id: Set(key.participant_id),
        age_at_event_days: Set(key.age_at_event_days),
        composition: Set(key.composition.clone()),
        tissue_type: Set(key.tissue_type.clone()),
        analyte_type: Set(key.analyte_type.clone()),
        anatomical_location: Set(key.anatomical_location.clone()),
        method_of_sample_procurement: Set(key.method_of_sample_procurement.clone()),
        preservation_method: Set(key.preservation_method.clone()),
        concentration_mg_per_ml: Set(key.concentration_mg_per_ml),
        sample_event_key: Set(sample_event_key(biospecimen)),
        volume_ul: Set(biospecimen.volume_ul),
        visible: Set(biospecimen.visible),
        visibility_reason: Set(biospecimen.visibility_reason.clone()),
        visibility_comment: Set(biospecimen.visibility_comment.clone()),
        created_at: Set(now),
        last_updated: Set(now),
    };

    Entity::insert(payload)
        .on_conflict(
            OnConflict::columns([
                Column::ExternalId,
                Column::ParticipantId,
                Column::AgeAtEventDays,
                Column::Composition,
                Column::TissueType,
                Column::AnalyteType,
                Column::AnatomicalLocation,
                Column::MethodOfSampleProcurement,
                Column::PreservationMethod,
                Column::ConcentrationMgPerMl,
            ])
            .update_columns([
                Column::SampleEventKey,
                Column::VolumeUl,
                Column::Visible,
                Column::VisibilityReason,
                Column::VisibilityComment,
                Column::LastUpdated,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_by_natural_key(conn, &key)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Sample not found after upsert".to_string()))
}

pub(crate) async fn find_by_natural_key<C: ConnectionTrait>(
    conn: &C,
    key: &SampleNaturalKey,
) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::ExternalId.eq(key.external_id.as_str()))
        .filter(Column::ParticipantId.eq(key.participant_id))
        .filter(Column::AgeAtEventDays.eq(key.age_at_event_days))
        .filter(Column::Composition.eq(key.composition.as_str()))
        .filter(Column::TissueType.eq(key.tissue_type.as_str()))
        .filter(Column::AnalyteType.eq(key.analyte_type.as_str()))
        .filter(Column::AnatomicalLocation.eq(key.anatomical_location.as_str()))
        .filter(Column::MethodOfSampleProcurement.eq(key.method_of_sample_procurement.as_str()))
        .filter(Column::PreservationMethod.eq(key.preservation_method.as_str()))
        .filter(Column::ConcentrationMgPerMl.eq(key.concentration_mg_per_ml))
        .one(conn)
        .await
}

/// Single entry point invoked on every biospecimen create or update:
/// resolves the sample for the biospecimen's natural key, synchronizes the
/// 1:1 container, and returns the sample with its aggregate volume current.
///
/// Re-entrant: submitting an unchanged biospecimen twice leaves sample and
/// container ids, rows, and aggregates untouched.
pub async fn manage_sample_containers<C: ConnectionTrait>(
    conn: &C,
    biospecimen: &biospecimens::Model,
) -> Result<Model, DbErr> {
    let sample = upsert_sample(conn, biospecimen).await?;
    container_services::sync_container(conn, biospecimen, &sample).await?;

    // Container sync rewrites the aggregate volume; hand back the fresh row.
    Entity::find_by_id(sample.id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Sample with id '{}' not found", sample.id)))
}
