//! Create substations table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(super) const SUBSTATION_NAMES: [&str; 5] = ["РП-4", "РП-5", "РП-6", "РП-7", "РП-8"];

pub(super) const LEVELS: [&str; 9] = [
    "Не вказaно",
    "4.8",
    "8.0",
    "11.2",
    "15.4",
    "21.0",
    "25.6",
    "28.0",
    "32.0",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Substations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Substations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Substations::Name)
                            .string_len(25)
                            .not_null()
                            .check(Expr::col(Substations::Name).is_in(SUBSTATION_NAMES)),
                    )
                    .col(
                        ColumnDef::new(Substations::Slug)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Substations::Level)
                            .string_len(25)
                            .not_null()
                            .check(Expr::col(Substations::Level).is_in(LEVELS)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Substations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Substations {
    Table,
    Id,
    Name,
    Slug,
    Level,
}
