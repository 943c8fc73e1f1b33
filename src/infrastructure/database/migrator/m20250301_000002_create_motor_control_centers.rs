//! Create motor_control_centers table

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_substations::Substations;

#[derive(DeriveMigrationName)]
pub struct Migration;

const MCC_NAMES: [&str; 11] = [
    "MCC-1", "MCC-2", "MCC-3", "MCC-4", "MCC-5", "MCC-6", "MCC-7", "MCC-8", "MCC-9", "MCC-10",
    "MCC-11",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MotorControlCenters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MotorControlCenters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MotorControlCenters::Name)
                            .string_len(25)
                            .not_null()
                            .check(Expr::col(MotorControlCenters::Name).is_in(MCC_NAMES)),
                    )
                    .col(
                        ColumnDef::new(MotorControlCenters::Slug)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MotorControlCenters::SubstationId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_motor_control_centers_substation")
                            .from(MotorControlCenters::Table, MotorControlCenters::SubstationId)
                            .to(Substations::Table, Substations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_motor_control_centers_substation")
                    .table(MotorControlCenters::Table)
                    .col(MotorControlCenters::SubstationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MotorControlCenters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MotorControlCenters {
    Table,
    Id,
    Name,
    Slug,
    SubstationId,
}
