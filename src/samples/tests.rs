use crate::config::test_helpers::setup_test_db;
use crate::containers::models as containers;
use crate::samples::models::Entity;
use crate::samples::services::{
    AGE_NOT_REPORTED, CONCENTRATION_NOT_REPORTED, NOT_REPORTED, SampleNaturalKey,
    manage_sample_containers, sample_event_key, upsert_sample,
};
use crate::test_helpers::{
    biospecimen_create, biospecimen_model, create_test_participant, insert_test_biospecimen,
};
use rstest::rstest;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

#[test]
fn test_sample_event_key_is_deterministic() {
    let biospecimen = biospecimen_model(Uuid::new_v4());

    assert_eq!(
        sample_event_key(&biospecimen),
        sample_event_key(&biospecimen)
    );
    assert_eq!(
        sample_event_key(&biospecimen),
        format!("{}-s1-456", biospecimen.participant_id)
    );
}

#[rstest]
#[case(Some("s1".to_string()), Some(456), "s1-456")]
#[case(None, None, "Not Reported-Not Reported")]
#[case(Some(String::new()), Some(456), "Not Reported-456")]
#[case(Some("s1".to_string()), Some(0), "s1-Not Reported")]
fn test_sample_event_key_substitutes_missing_components(
    #[case] external_sample_id: Option<String>,
    #[case] age_at_event_days: Option<i32>,
    #[case] suffix: &str,
) {
    let mut biospecimen = biospecimen_model(Uuid::new_v4());
    biospecimen.external_sample_id = external_sample_id;
    biospecimen.age_at_event_days = age_at_event_days;

    assert_eq!(
        sample_event_key(&biospecimen),
        format!("{}-{suffix}", biospecimen.participant_id)
    );
}

#[test]
fn test_natural_key_substitutes_sentinels_for_null_fields() {
    let mut biospecimen = biospecimen_model(Uuid::new_v4());
    biospecimen.external_sample_id = None;
    biospecimen.age_at_event_days = None;
    biospecimen.tissue_type = None;
    biospecimen.concentration_mg_per_ml = None;

    let key = SampleNaturalKey::from_biospecimen(&biospecimen);

    assert_eq!(key.external_id, NOT_REPORTED);
    assert_eq!(key.age_at_event_days, AGE_NOT_REPORTED);
    assert_eq!(key.tissue_type, NOT_REPORTED);
    assert_eq!(key.concentration_mg_per_ml, CONCENTRATION_NOT_REPORTED);
    // Supplied fields pass through the fixed mapping untouched.
    assert_eq!(key.composition, "Peripheral Whole Blood");
    assert_eq!(key.participant_id, biospecimen.participant_id);
}

#[test]
fn test_natural_key_keeps_empty_string_distinct_from_null() {
    // Only NULL is normalized; an explicit empty string is a key value of
    // its own (the event key, by contrast, treats it as unreported).
    let mut biospecimen = biospecimen_model(Uuid::new_v4());
    biospecimen.external_sample_id = Some(String::new());

    let key = SampleNaturalKey::from_biospecimen(&biospecimen);

    assert_eq!(key.external_id, "");
}

#[tokio::test]
async fn test_upsert_is_update_in_place_for_same_natural_key() {
    let db = setup_test_db().await;
    let participant = create_test_participant(&db).await;

    let mut biospecimen = biospecimen_model(participant.id);
    let created = upsert_sample(&db, &biospecimen)
        .await
        .expect("first upsert failed");

    biospecimen.volume_ul = Some(9.0);
    biospecimen.visibility_comment = Some("re-consented".to_string());
    let updated = upsert_sample(&db, &biospecimen)
        .await
        .expect("second upsert failed");

    assert_eq!(created.id, updated.id, "upsert must not regenerate the id");
    assert_eq!(updated.volume_ul, Some(9.0));
    assert_eq!(updated.visibility_comment.as_deref(), Some("re-consented"));

    let total = Entity::find().count(&db).await.unwrap();
    assert_eq!(total, 1, "exactly one sample per natural key");
}

#[tokio::test]
async fn test_upsert_distinct_keys_creates_distinct_samples() {
    let db = setup_test_db().await;
    let participant = create_test_participant(&db).await;

    let biospecimen = biospecimen_model(participant.id);
    upsert_sample(&db, &biospecimen).await.unwrap();

    let mut other = biospecimen_model(participant.id);
    other.external_sample_id = Some("s2".to_string());
    upsert_sample(&db, &other).await.unwrap();

    let total = Entity::find().count(&db).await.unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_upsert_persists_sentinel_values() {
    let db = setup_test_db().await;
    let participant = create_test_participant(&db).await;

    let mut biospecimen = biospecimen_model(participant.id);
    biospecimen.external_sample_id = None;
    biospecimen.age_at_event_days = None;
    biospecimen.concentration_mg_per_ml = None;
    biospecimen.preservation_method = None;

    let sample = upsert_sample(&db, &biospecimen).await.unwrap();

    // The sentinel is the stored value, not just a match key.
    assert_eq!(sample.external_id, NOT_REPORTED);
    assert_eq!(sample.age_at_event_days, AGE_NOT_REPORTED);
    assert_eq!(sample.concentration_mg_per_ml, CONCENTRATION_NOT_REPORTED);
    assert_eq!(sample.preservation_method, NOT_REPORTED);
    assert_eq!(
        sample.sample_event_key,
        format!("{}-Not Reported-Not Reported", participant.id)
    );
}

#[tokio::test]
async fn test_upsert_with_unknown_participant_propagates_store_error() {
    let db = setup_test_db().await;

    let biospecimen = biospecimen_model(Uuid::new_v4());
    let result = upsert_sample(&db, &biospecimen).await;

    assert!(result.is_err(), "foreign key violation must surface");
}

#[tokio::test]
async fn test_manage_sample_containers_is_idempotent() {
    let db = setup_test_db().await;
    let participant = create_test_participant(&db).await;
    let biospecimen =
        insert_test_biospecimen(&db, biospecimen_create(participant.id)).await;

    let first = manage_sample_containers(&db, &biospecimen).await.unwrap();
    let second = manage_sample_containers(&db, &biospecimen).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.volume_ul, second.volume_ul);

    let sample_count = Entity::find().count(&db).await.unwrap();
    let container_count = containers::Entity::find().count(&db).await.unwrap();
    assert_eq!((sample_count, container_count), (1, 1));

    // One container reporting 3.0 µl drives the aggregate.
    assert_eq!(second.volume_ul, Some(3.0));
}
