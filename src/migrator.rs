// The `MigrationTrait` signature elides the `SchemaManager` lifetime; writing
// it as `<'_>` here trips E0195 against the async_trait expansion, so the
// elided-lifetimes lint must be allowed in this module.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_shipments_table::Migration),
            Box::new(m20240301_000002_create_tracking_updates_table::Migration),
            Box::new(m20240301_000003_create_admin_users_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_shipments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_shipments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Shipments::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Shipments::TrackingNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Shipments::SenderName).string().not_null())
                        .col(ColumnDef::new(Shipments::SenderAddress).string().not_null())
                        .col(ColumnDef::new(Shipments::SenderPhone).string().null())
                        .col(ColumnDef::new(Shipments::SenderEmail).string().null())
                        .col(ColumnDef::new(Shipments::RecipientName).string().not_null())
                        .col(
                            ColumnDef::new(Shipments::RecipientAddress)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::RecipientPhone).string().null())
                        .col(ColumnDef::new(Shipments::RecipientEmail).string().null())
                        .col(ColumnDef::new(Shipments::ServiceType).string().not_null())
                        .col(ColumnDef::new(Shipments::PackageType).string().null())
                        .col(ColumnDef::new(Shipments::Weight).decimal().null())
                        .col(ColumnDef::new(Shipments::Dimensions).string().null())
                        .col(ColumnDef::new(Shipments::Description).string().null())
                        .col(ColumnDef::new(Shipments::Status).string().not_null())
                        .col(
                            ColumnDef::new(Shipments::EstimatedDelivery)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Shipments::ActualDelivery).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(Shipments::Cost).decimal().null())
                        .col(ColumnDef::new(Shipments::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Shipments::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_status")
                        .table(Shipments::Table)
                        .col(Shipments::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_created_at")
                        .table(Shipments::Table)
                        .col(Shipments::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Shipments {
        Table,
        Id,
        TrackingNumber,
        SenderName,
        SenderAddress,
        SenderPhone,
        SenderEmail,
        RecipientName,
        RecipientAddress,
        RecipientPhone,
        RecipientEmail,
        ServiceType,
        PackageType,
        Weight,
        Dimensions,
        Description,
        Status,
        EstimatedDelivery,
        ActualDelivery,
        Cost,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_tracking_updates_table {

    use sea_orm_migration::prelude::*;

    use super::m20240301_000001_create_shipments_table::Shipments;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_tracking_updates_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TrackingUpdates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TrackingUpdates::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TrackingUpdates::ShipmentId).uuid().not_null())
                        .col(ColumnDef::new(TrackingUpdates::Status).string().not_null())
                        .col(ColumnDef::new(TrackingUpdates::Location).string().not_null())
                        .col(ColumnDef::new(TrackingUpdates::Description).string().null())
                        .col(
                            ColumnDef::new(TrackingUpdates::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TrackingUpdates::UpdatedBy).uuid().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tracking_updates_shipment")
                                .from(TrackingUpdates::Table, TrackingUpdates::ShipmentId)
                                .to(Shipments::Table, Shipments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tracking_updates_shipment_id")
                        .table(TrackingUpdates::Table)
                        .col(TrackingUpdates::ShipmentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tracking_updates_timestamp")
                        .table(TrackingUpdates::Table)
                        .col(TrackingUpdates::Timestamp)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TrackingUpdates::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum TrackingUpdates {
        Table,
        Id,
        ShipmentId,
        Status,
        Location,
        Description,
        Timestamp,
        UpdatedBy,
    }
}

mod m20240301_000003_create_admin_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_admin_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AdminUsers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(AdminUsers::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(AdminUsers::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(AdminUsers::Email).string().not_null())
                        .col(ColumnDef::new(AdminUsers::Password).string().not_null())
                        .col(
                            ColumnDef::new(AdminUsers::Role)
                                .string()
                                .not_null()
                                .default("admin"),
                        )
                        .col(
                            ColumnDef::new(AdminUsers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(AdminUsers::CreatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AdminUsers::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum AdminUsers {
        Table,
        Id,
        Username,
        Email,
        Password,
        Role,
        IsActive,
        CreatedAt,
    }
}
