use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Columns covered by the samples natural-key unique index, in index order.
fn sample_natural_key_columns() -> [Samples; 10] {
    [
        Samples::ExternalId,
        Samples::ParticipantId,
        Samples::AgeAtEventDays,
        Samples::Composition,
        Samples::TissueType,
        Samples::AnalyteType,
        Samples::AnatomicalLocation,
        Samples::MethodOfSampleProcurement,
        Samples::PreservationMethod,
        Samples::ConcentrationMgPerMl,
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)] // Large migration requires extensive table definitions
    #[allow(clippy::match_wildcard_for_single_variants)] // Wildcard matches for unsupported databases are semantically correct
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enable UUID extension for PostgreSQL (ignored by SQLite)
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\";")
                .await?;
        }

        // Create participants table
        let mut participants_table = Table::create()
            .table(Participants::Table)
            .if_not_exists()
            .col(ColumnDef::new(Participants::ExternalId).text())
            .col(
                ColumnDef::new(Participants::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Participants::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .to_owned();

        // Add ID column with appropriate type and default based on database backend
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                participants_table.col(
                    ColumnDef::new(Participants::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .default(Expr::cust("uuid_generate_v4()")),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                participants_table.col(
                    ColumnDef::new(Participants::Id)
                        .uuid()
                        .not_null()
                        .primary_key(),
                );
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(participants_table).await?;

        // Create biospecimens table
        let mut biospecimens_table = Table::create()
            .table(Biospecimens::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Biospecimens::ParticipantId)
                    .uuid()
                    .not_null(),
            )
            .col(ColumnDef::new(Biospecimens::ExternalSampleId).text())
            .col(ColumnDef::new(Biospecimens::ExternalAliquotId).text())
            .col(ColumnDef::new(Biospecimens::AgeAtEventDays).integer())
            .col(ColumnDef::new(Biospecimens::Composition).text())
            .col(ColumnDef::new(Biospecimens::TissueType).text())
            .col(ColumnDef::new(Biospecimens::AnalyteType).text())
            .col(ColumnDef::new(Biospecimens::AnatomicalLocation).text())
            .col(ColumnDef::new(Biospecimens::MethodOfSampleProcurement).text())
            .col(ColumnDef::new(Biospecimens::PreservationMethod).text())
            .col(ColumnDef::new(Biospecimens::ConcentrationMgPerMl).double())
            .col(ColumnDef::new(Biospecimens::VolumeUl).double())
            .col(
                ColumnDef::new(Biospecimens::Visible)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(Biospecimens::VisibilityReason).text())
            .col(ColumnDef::new(Biospecimens::VisibilityComment).text())
            .col(
                ColumnDef::new(Biospecimens::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Biospecimens::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_biospecimens_participant_id")
                    .from(Biospecimens::Table, Biospecimens::ParticipantId)
                    .to(Participants::Table, Participants::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .to_owned();

        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                biospecimens_table.col(
                    ColumnDef::new(Biospecimens::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .default(Expr::cust("uuid_generate_v4()")),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                biospecimens_table.col(
                    ColumnDef::new(Biospecimens::Id)
                        .uuid()
                        .not_null()
                        .primary_key(),
                );
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(biospecimens_table).await?;

        // Create samples table. Natural-key columns are NOT NULL: absent input is
        // stored as sentinel values so the unique index can match rows that would
        // otherwise compare NULL-distinct.
        let mut samples_table = Table::create()
            .table(Samples::Table)
            .if_not_exists()
            .col(ColumnDef::new(Samples::ExternalId).text().not_null())
            .col(ColumnDef::new(Samples::ParticipantId).uuid().not_null())
            .col(
                ColumnDef::new(Samples::AgeAtEventDays)
                    .integer()
                    .not_null(),
            )
            .col(ColumnDef::new(Samples::Composition).text().not_null())
            .col(ColumnDef::new(Samples::TissueType).text().not_null())
            .col(ColumnDef::new(Samples::AnalyteType).text().not_null())
            .col(
                ColumnDef::new(Samples::AnatomicalLocation)
                    .text()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Samples::MethodOfSampleProcurement)
                    .text()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Samples::PreservationMethod)
                    .text()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Samples::ConcentrationMgPerMl)
                    .double()
                    .not_null(),
            )
            .col(ColumnDef::new(Samples::SampleEventKey).text().not_null())
            .col(ColumnDef::new(Samples::VolumeUl).double())
            .col(
                ColumnDef::new(Samples::Visible)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(Samples::VisibilityReason).text())
            .col(ColumnDef::new(Samples::VisibilityComment).text())
            .col(
                ColumnDef::new(Samples::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Samples::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_samples_participant_id")
                    .from(Samples::Table, Samples::ParticipantId)
                    .to(Participants::Table, Participants::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .to_owned();

        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                samples_table.col(
                    ColumnDef::new(Samples::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .default(Expr::cust("uuid_generate_v4()")),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                samples_table.col(ColumnDef::new(Samples::Id).uuid().not_null().primary_key());
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(samples_table).await?;

        // The natural-key unique index is what the atomic upsert conflicts against.
        let mut natural_key_index = Index::create()
            .name("uq_samples_natural_key")
            .table(Samples::Table)
            .unique()
            .to_owned();
        for column in sample_natural_key_columns() {
            natural_key_index.col(column);
        }
        manager.create_index(natural_key_index).await?;

        // Create containers table (one per biospecimen)
        let mut containers_table = Table::create()
            .table(Containers::Table)
            .if_not_exists()
            .col(ColumnDef::new(Containers::ExternalAliquotId).text())
            .col(ColumnDef::new(Containers::VolumeUl).double())
            .col(
                ColumnDef::new(Containers::BiospecimenId)
                    .uuid()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Containers::SampleId).uuid().not_null())
            .col(
                ColumnDef::new(Containers::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Containers::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_containers_biospecimen_id")
                    .from(Containers::Table, Containers::BiospecimenId)
                    .to(Biospecimens::Table, Biospecimens::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_containers_sample_id")
                    .from(Containers::Table, Containers::SampleId)
                    .to(Samples::Table, Samples::Id)
                    .on_delete(ForeignKeyAction::NoAction)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .to_owned();

        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                containers_table.col(
                    ColumnDef::new(Containers::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .default(Expr::cust("uuid_generate_v4()")),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                containers_table.col(
                    ColumnDef::new(Containers::Id)
                        .uuid()
                        .not_null()
                        .primary_key(),
                );
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(containers_table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_containers_sample_id")
                    .table(Containers::Table)
                    .col(Containers::SampleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Containers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Samples::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Biospecimens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    ExternalId,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Biospecimens {
    Table,
    Id,
    ParticipantId,
    ExternalSampleId,
    ExternalAliquotId,
    AgeAtEventDays,
    Composition,
    TissueType,
    AnalyteType,
    AnatomicalLocation,
    MethodOfSampleProcurement,
    PreservationMethod,
    ConcentrationMgPerMl,
    VolumeUl,
    Visible,
    VisibilityReason,
    VisibilityComment,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Samples {
    Table,
    Id,
    ExternalId,
    ParticipantId,
    AgeAtEventDays,
    Composition,
    TissueType,
    AnalyteType,
    AnatomicalLocation,
    MethodOfSampleProcurement,
    PreservationMethod,
    ConcentrationMgPerMl,
    SampleEventKey,
    VolumeUl,
    Visible,
    VisibilityReason,
    VisibilityComment,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Containers {
    Table,
    Id,
    ExternalAliquotId,
    VolumeUl,
    BiospecimenId,
    SampleId,
    CreatedAt,
    LastUpdated,
}
