use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Transactions::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Transactions::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(Transactions::UserId).integer().not_null())
                .col(ColumnDef::new(Transactions::Type).string_len(20).not_null())
                .col(ColumnDef::new(Transactions::Amount).decimal_len(15, 2).not_null())
                .col(ColumnDef::new(Transactions::Description).text().not_null())
                .col(ColumnDef::new(Transactions::Reference).uuid().not_null().unique_key())
                .col(
                    ColumnDef::new(Transactions::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_transactions_user")
                        .from(Transactions::Table, Transactions::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        // History is read newest first per user
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_transactions_user_created")
                .table(Transactions::Table)
                .col(Transactions::UserId)
                .col(Transactions::CreatedAt)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Transactions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Type,
    Amount,
    Description,
    Reference,
    CreatedAt,
}
