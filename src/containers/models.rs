use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Physical specimen instance, mirroring exactly one biospecimen
/// (`biospecimen_id` is unique) and linking it to its resolved sample.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "containers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub external_aliquot_id: Option<String>,
    pub volume_ul: Option<f64>,
    #[sea_orm(unique)]
    pub biospecimen_id: Uuid,
    pub sample_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::biospecimens::models::Entity",
        from = "Column::BiospecimenId",
        to = "crate::biospecimens::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Biospecimens,
    #[sea_orm(
        belongs_to = "crate::samples::models::Entity",
        from = "Column::SampleId",
        to = "crate::samples::models::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Samples,
}

impl Related<crate::biospecimens::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Biospecimens.def()
    }
}

impl Related<crate::samples::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Samples.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
