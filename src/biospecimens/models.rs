use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Authoritative, user-facing specimen record. Each create or update of a
/// biospecimen drives the sample/container derivation in
/// [`crate::samples::services::manage_sample_containers`].
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "biospecimens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub participant_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub external_sample_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub external_aliquot_id: Option<String>,
    pub age_at_event_days: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub composition: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub tissue_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub analyte_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub anatomical_location: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub method_of_sample_procurement: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub preservation_method: Option<String>,
    pub concentration_mg_per_ml: Option<f64>,
    pub volume_ul: Option<f64>,
    pub visible: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub visibility_reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub visibility_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::participants::models::Entity",
        from = "Column::ParticipantId",
        to = "crate::participants::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Participants,
    #[sea_orm(has_one = "crate::containers::models::Entity")]
    Containers,
}

impl Related<crate::participants::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<crate::containers::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Containers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Payload accepted from the external CRUD layer when creating a
/// biospecimen. Fields arrive already type- and enum-checked.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiospecimenCreate {
    pub participant_id: Uuid,
    #[serde(default)]
    pub external_sample_id: Option<String>,
    #[serde(default)]
    pub external_aliquot_id: Option<String>,
    #[serde(default)]
    pub age_at_event_days: Option<i32>,
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub tissue_type: Option<String>,
    #[serde(default)]
    pub analyte_type: Option<String>,
    #[serde(default)]
    pub anatomical_location: Option<String>,
    #[serde(default)]
    pub method_of_sample_procurement: Option<String>,
    #[serde(default)]
    pub preservation_method: Option<String>,
    #[serde(default)]
    pub concentration_mg_per_ml: Option<f64>,
    #[serde(default)]
    pub volume_ul: Option<f64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub visibility_reason: Option<String>,
    #[serde(default)]
    pub visibility_comment: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl From<BiospecimenCreate> for ActiveModel {
    fn from(create_data: BiospecimenCreate) -> Self {
        let now = Utc::now();
        ActiveModel {
            id: Set(Uuid::new_v4()),
            participant_id: Set(create_data.participant_id),
            external_sample_id: Set(create_data.external_sample_id),
            external_aliquot_id: Set(create_data.external_aliquot_id),
            age_at_event_days: Set(create_data.age_at_event_days),
            composition: Set(create_data.composition),
            tissue_type: Set(create_data.tissue_type),
            analyte_type: Set(create_data.analyte_type),
            anatomical_location: Set(create_data.anatomical_location),
            method_of_sample_procurement: Set(create_data.method_of_sample_procurement),
            preservation_method: Set(create_data.preservation_method),
            concentration_mg_per_ml: Set(create_data.concentration_mg_per_ml),
            volume_ul: Set(create_data.volume_ul),
            visible: Set(create_data.visible),
            visibility_reason: Set(create_data.visibility_reason),
            visibility_comment: Set(create_data.visibility_comment),
            created_at: Set(now),
            last_updated: Set(now),
        }
    }
}

/// Partial update payload. A missing field leaves the column unchanged; for
/// nullable columns an explicit JSON `null` clears the value (double-`Option`
/// deserialized via `serde_with::rust::double_option`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BiospecimenUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<Uuid>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub external_sample_id: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub external_aliquot_id: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub age_at_event_days: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub composition: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub tissue_type: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub analyte_type: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub anatomical_location: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub method_of_sample_procurement: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub preservation_method: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub concentration_mg_per_ml: Option<Option<f64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub volume_ul: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub visibility_reason: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub visibility_comment: Option<Option<String>>,
}

impl BiospecimenUpdate {
    pub(crate) fn merge_into_active_model(self, mut model: ActiveModel) -> ActiveModel {
        if let Some(value) = self.participant_id {
            model.participant_id = Set(value);
        }
        if let Some(value) = self.external_sample_id {
            model.external_sample_id = Set(value);
        }
        if let Some(value) = self.external_aliquot_id {
            model.external_aliquot_id = Set(value);
        }
        if let Some(value) = self.age_at_event_days {
            model.age_at_event_days = Set(value);
        }
        if let Some(value) = self.composition {
            model.composition = Set(value);
        }
        if let Some(value) = self.tissue_type {
            model.tissue_type = Set(value);
        }
        if let Some(value) = self.analyte_type {
            model.analyte_type = Set(value);
        }
        if let Some(value) = self.anatomical_location {
            model.anatomical_location = Set(value);
        }
        if let Some(value) = self.method_of_sample_procurement {
            model.method_of_sample_procurement = Set(value);
        }
        if let Some(value) = self.preservation_method {
            model.preservation_method = Set(value);
        }
        if let Some(value) = self.concentration_mg_per_ml {
            model.concentration_mg_per_ml = Set(value);
        }
        if let Some(value) = self.volume_ul {
            model.volume_ul = Set(value);
        }
        if let Some(value) = self.visible {
            model.visible = Set(value);
        }
        if let Some(value) = self.visibility_reason {
            model.visibility_reason = Set(value);
        }
        if let Some(value) = self.visibility_comment {
            model.visibility_comment = Set(value);
        }
        model.last_updated = Set(Utc::now());
        model
    }
}
