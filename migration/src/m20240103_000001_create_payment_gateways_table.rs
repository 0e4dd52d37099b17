use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

struct GatewaySeed {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    currencies: &'static str,
    method_types: &'static str,
    min_amount: &'static str,
    max_amount: &'static str,
    fee_type: &'static str,
    fee_value: &'static str,
}

const DEFAULT_GATEWAYS: [GatewaySeed; 3] = [
    GatewaySeed {
        slug: "stripe",
        name: "Stripe",
        description: "Card payments",
        currencies: r#"["USD","EUR","GBP"]"#,
        method_types: r#"["card"]"#,
        min_amount: "1.00",
        max_amount: "50000.00",
        fee_type: "percentage",
        fee_value: "2.90",
    },
    GatewaySeed {
        slug: "paypal",
        name: "PayPal",
        description: "PayPal balance and linked bank accounts",
        currencies: r#"["USD","EUR"]"#,
        method_types: r#"["digital_wallet","bank_account"]"#,
        min_amount: "1.00",
        max_amount: "25000.00",
        fee_type: "percentage",
        fee_value: "3.49",
    },
    GatewaySeed {
        slug: "crypto",
        name: "Crypto",
        description: "On-chain transfers",
        currencies: r#"["BTC","ETH","USDT"]"#,
        method_types: r#"["crypto_wallet"]"#,
        min_amount: "10.00",
        max_amount: "250000.00",
        fee_type: "fixed",
        fee_value: "5.00",
    },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(PaymentGateways::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(PaymentGateways::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key()
                )
                .col(ColumnDef::new(PaymentGateways::Slug).string_len(50).not_null().unique_key())
                .col(ColumnDef::new(PaymentGateways::Name).string_len(100).not_null())
                .col(ColumnDef::new(PaymentGateways::Description).text().null())
                .col(ColumnDef::new(PaymentGateways::IsActive).boolean().not_null().default(true))
                .col(ColumnDef::new(PaymentGateways::Currencies).json_binary().not_null())
                .col(ColumnDef::new(PaymentGateways::MethodTypes).json_binary().not_null())
                .col(ColumnDef::new(PaymentGateways::MinAmount).decimal_len(15, 2).not_null())
                .col(ColumnDef::new(PaymentGateways::MaxAmount).decimal_len(15, 2).not_null())
                .col(ColumnDef::new(PaymentGateways::FeeType).string_len(20).not_null())
                .col(
                    ColumnDef::new(PaymentGateways::FeeValue)
                        .decimal_len(10, 4)
                        .not_null()
                        .default(0)
                )
                .col(
                    ColumnDef::new(PaymentGateways::Config)
                        .json_binary()
                        .not_null()
                        .default(Expr::cust("'{}'::jsonb"))
                )
                .col(
                    ColumnDef::new(PaymentGateways::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        let mut insert = Query::insert()
            .into_table(PaymentGateways::Table)
            .columns([
                PaymentGateways::Slug,
                PaymentGateways::Name,
                PaymentGateways::Description,
                PaymentGateways::Currencies,
                PaymentGateways::MethodTypes,
                PaymentGateways::MinAmount,
                PaymentGateways::MaxAmount,
                PaymentGateways::FeeType,
                PaymentGateways::FeeValue,
            ])
            .to_owned();

        for gateway in DEFAULT_GATEWAYS {
            insert.values_panic([
                gateway.slug.into(),
                gateway.name.into(),
                gateway.description.into(),
                Expr::cust(format!("'{}'::jsonb", gateway.currencies)),
                Expr::cust(format!("'{}'::jsonb", gateway.method_types)),
                Expr::cust(gateway.min_amount),
                Expr::cust(gateway.max_amount),
                gateway.fee_type.into(),
                Expr::cust(gateway.fee_value),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PaymentGateways::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PaymentGateways {
    Table,
    Id,
    Slug,
    Name,
    Description,
    IsActive,
    Currencies,
    MethodTypes,
    MinAmount,
    MaxAmount,
    FeeType,
    FeeValue,
    Config,
    CreatedAt,
}
