use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Users::Username).string_len(60).not_null().unique_key())
                .col(ColumnDef::new(Users::Email).string_len(100).not_null().unique_key())
                .col(ColumnDef::new(Users::DisplayName).string_len(250).not_null())
                .col(
                    ColumnDef::new(Users::Balance)
                        .decimal_len(15, 2)
                        .not_null()
                        .default(0)
                        .check(Expr::col(Users::Balance).gte(0))
                )
                .col(
                    ColumnDef::new(Users::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    DisplayName,
    Balance,
    CreatedAt,
}
