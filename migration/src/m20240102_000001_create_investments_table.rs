use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_investment_plans_table::InvestmentPlans;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Investments::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Investments::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(Investments::UserId).integer().not_null())
                .col(ColumnDef::new(Investments::PlanId).integer().not_null())
                .col(
                    ColumnDef::new(Investments::Amount)
                        .decimal_len(15, 2)
                        .not_null()
                        .check(Expr::col(Investments::Amount).gt(0))
                )
                .col(
                    ColumnDef::new(Investments::Status)
                        .string_len(20)
                        .not_null()
                        .default("active")
                )
                .col(
                    ColumnDef::new(Investments::StartedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(ColumnDef::new(Investments::MaturesAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Investments::ClosedAt).timestamp_with_time_zone().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_investments_user")
                        .from(Investments::Table, Investments::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_investments_plan")
                        .from(Investments::Table, Investments::PlanId)
                        .to(InvestmentPlans::Table, InvestmentPlans::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_investments_user")
                .table(Investments::Table)
                .col(Investments::UserId)
                .to_owned()
        ).await?;

        // Maturity sweep scans active rows by due date
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_investments_status_matures_at")
                .table(Investments::Table)
                .col(Investments::Status)
                .col(Investments::MaturesAt)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Investments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Investments {
    Table,
    Id,
    UserId,
    PlanId,
    Amount,
    Status,
    StartedAt,
    MaturesAt,
    ClosedAt,
}
