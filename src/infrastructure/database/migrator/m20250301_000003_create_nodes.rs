//! Create nodes table

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_substations::LEVELS;
use super::m20250301_000002_create_motor_control_centers::MotorControlCenters;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Nodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Nodes::Title).string_len(25).not_null())
                    .col(
                        ColumnDef::new(Nodes::Slug)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Nodes::Label).string_len(100))
                    .col(
                        ColumnDef::new(Nodes::Level)
                            .string_len(25)
                            .not_null()
                            .check(Expr::col(Nodes::Level).is_in(LEVELS)),
                    )
                    .col(
                        ColumnDef::new(Nodes::RoundPerMinute)
                            .integer()
                            .not_null()
                            .check(Expr::col(Nodes::RoundPerMinute).between(0, 3100)),
                    )
                    // four digits, one of them fractional
                    .col(
                        ColumnDef::new(Nodes::PowerTenths)
                            .integer()
                            .not_null()
                            .check(Expr::col(Nodes::PowerTenths).between(-9999, 9999)),
                    )
                    .col(ColumnDef::new(Nodes::MccId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nodes_mcc")
                            .from(Nodes::Table, Nodes::MccId)
                            .to(MotorControlCenters::Table, MotorControlCenters::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_nodes_mcc")
                    .table(Nodes::Table)
                    .col(Nodes::MccId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Nodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Nodes {
    Table,
    Id,
    Title,
    Slug,
    Label,
    Level,
    RoundPerMinute,
    PowerTenths,
    MccId,
}
