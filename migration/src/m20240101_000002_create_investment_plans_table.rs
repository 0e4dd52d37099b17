use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// name, APY %, days, min, max
const DEFAULT_PLANS: [(&str, &str, i32, &str, &str); 4] = [
    ("Starter", "5.00", 30, "100.00", "999.99"),
    ("Growth", "12.50", 90, "1000.00", "9999.99"),
    ("Premium", "18.00", 180, "10000.00", "49999.99"),
    ("Elite", "24.00", 365, "50000.00", "250000.00"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(InvestmentPlans::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(InvestmentPlans::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(InvestmentPlans::Name).string_len(100).not_null())
                .col(
                    ColumnDef::new(InvestmentPlans::Rate)
                        .decimal_len(7, 4)
                        .not_null()
                        .check(Expr::col(InvestmentPlans::Rate).gte(0))
                )
                .col(
                    ColumnDef::new(InvestmentPlans::DurationDays)
                        .integer()
                        .not_null()
                        .check(Expr::col(InvestmentPlans::DurationDays).gt(0))
                )
                .col(ColumnDef::new(InvestmentPlans::MinAmount).decimal_len(15, 2).not_null())
                .col(ColumnDef::new(InvestmentPlans::MaxAmount).decimal_len(15, 2).not_null())
                .col(ColumnDef::new(InvestmentPlans::IsActive).boolean().not_null().default(true))
                .col(
                    ColumnDef::new(InvestmentPlans::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        let mut insert = Query::insert()
            .into_table(InvestmentPlans::Table)
            .columns([
                InvestmentPlans::Name,
                InvestmentPlans::Rate,
                InvestmentPlans::DurationDays,
                InvestmentPlans::MinAmount,
                InvestmentPlans::MaxAmount,
            ])
            .to_owned();

        for (name, rate, days, min, max) in DEFAULT_PLANS {
            insert.values_panic([
                name.into(),
                Expr::cust(rate).into(),
                days.into(),
                Expr::cust(min).into(),
                Expr::cust(max).into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(InvestmentPlans::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum InvestmentPlans {
    Table,
    Id,
    Name,
    Rate,
    DurationDays,
    MinAmount,
    MaxAmount,
    IsActive,
    CreatedAt,
}
