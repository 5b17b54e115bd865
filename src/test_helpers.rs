//! Shared helpers for creating catalog entities across the test suite,
//! following the ownership hierarchy: Participants → Biospecimens →
//! {Samples, Containers}.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

use crate::biospecimens::models::{self as biospecimens, BiospecimenCreate};
use crate::participants::models as participants;

/// Insert a participant row to own test biospecimens.
pub async fn create_test_participant(db: &DatabaseConnection) -> participants::Model {
    let now = Utc::now();
    participants::ActiveModel {
        id: Set(Uuid::new_v4()),
        external_id: Set(Some(format!("PT-{}", Uuid::new_v4()))),
        created_at: Set(now),
        last_updated: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert test participant")
}

/// Baseline create payload; tests override the fields they exercise.
pub fn biospecimen_create(participant_id: Uuid) -> BiospecimenCreate {
    BiospecimenCreate {
        participant_id,
        external_sample_id: Some("sa-01".to_string()),
        external_aliquot_id: Some("ct-01".to_string()),
        age_at_event_days: Some(456),
        composition: Some("Peripheral Whole Blood".to_string()),
        tissue_type: Some("Normal".to_string()),
        analyte_type: Some("DNA".to_string()),
        anatomical_location: Some("Arm".to_string()),
        method_of_sample_procurement: Some("Blood Draw".to_string()),
        preservation_method: Some("Frozen".to_string()),
        concentration_mg_per_ml: Some(1.5),
        volume_ul: Some(3.0),
        visible: true,
        visibility_reason: None,
        visibility_comment: None,
    }
}

/// Insert a biospecimen row directly, without running the derivation engine.
/// Used by tests that exercise engine functions in isolation.
pub async fn insert_test_biospecimen(
    db: &DatabaseConnection,
    create_data: BiospecimenCreate,
) -> biospecimens::Model {
    let active_model: biospecimens::ActiveModel = create_data.into();
    active_model
        .insert(db)
        .await
        .expect("Failed to insert test biospecimen")
}

/// In-memory biospecimen for pure functions that never touch the store.
pub fn biospecimen_model(participant_id: Uuid) -> biospecimens::Model {
    let now = Utc::now();
    biospecimens::Model {
        id: Uuid::new_v4(),
        participant_id,
        external_sample_id: Some("s1".to_string()),
        external_aliquot_id: Some("ct-01".to_string()),
        age_at_event_days: Some(456),
        composition: Some("Peripheral Whole Blood".to_string()),
        tissue_type: Some("Normal".to_string()),
        analyte_type: Some("DNA".to_string()),
        anatomical_location: Some("Arm".to_string()),
        method_of_sample_procurement: Some("Blood Draw".to_string()),
        preservation_method: Some("Frozen".to_string()),
        concentration_mg_per_ml: Some(1.5),
        volume_ul: Some(3.0),
        visible: true,
        visibility_reason: None,
        visibility_comment: None,
        created_at: now,
        last_updated: now,
    }
}
