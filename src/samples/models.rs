use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Derived aggregate of biologically equivalent biospecimens. At most one
/// row exists per natural key (the ten columns covered by
/// `uq_samples_natural_key`); rows are created and refreshed exclusively by
/// [`crate::samples::services::upsert_sample`].
///
/// Natural-key columns are NOT NULL: absent source values are stored as
/// sentinels (`"Not Reported"`, `-9999`), so readers must treat those as "no
/// value provided".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "samples")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub external_id: String,
    pub participant_id: Uuid,
    pub age_at_event_days: i32,
    #[sea_orm(column_type = "Text")]
    pub composition: String,
    #[sea_orm(column_type = "Text")]
    pub tissue_type: String,
    #[sea_orm(column_type = "Text")]
    pub analyte_type: String,
    #[sea_orm(column_type = "Text")]
    pub anatomical_location: String,
    #[sea_orm(column_type = "Text")]
    pub method_of_sample_procurement: String,
    #[sea_orm(column_type = "Text")]
    pub preservation_method: String,
    pub concentration_mg_per_ml: f64,
    #[sea_orm(column_type = "Text")]
    pub sample_event_key: String,
    /// Sum of the non-null volumes of this sample's containers; NULL when no
    /// container reports a volume.
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
    #[sea_orm(has_many = "crate::containers::models::Entity")]
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
