use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(PaymentMethods::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(PaymentMethods::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(PaymentMethods::UserId).integer().not_null())
                .col(ColumnDef::new(PaymentMethods::Type).string_len(20).not_null())
                .col(ColumnDef::new(PaymentMethods::Last4).string_len(4).null())
                .col(ColumnDef::new(PaymentMethods::Brand).string_len(50).null())
                .col(ColumnDef::new(PaymentMethods::ExpiryMonth).integer().null())
                .col(ColumnDef::new(PaymentMethods::ExpiryYear).integer().null())
                .col(ColumnDef::new(PaymentMethods::IsDefault).boolean().not_null().default(false))
                .col(ColumnDef::new(PaymentMethods::IsActive).boolean().not_null().default(true))
                .col(
                    ColumnDef::new(PaymentMethods::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_payment_methods_user")
                        .from(PaymentMethods::Table, PaymentMethods::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_payment_methods_user")
                .table(PaymentMethods::Table)
                .col(PaymentMethods::UserId)
                .to_owned()
        ).await?;

        // At most one default method per user
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_payment_methods_one_default \
                 ON payment_methods (user_id) WHERE is_default"
            ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PaymentMethods::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PaymentMethods {
    Table,
    Id,
    UserId,
    Type,
    Last4,
    Brand,
    ExpiryMonth,
    ExpiryYear,
    IsDefault,
    IsActive,
    CreatedAt,
}
