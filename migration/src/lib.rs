pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_investment_plans_table;
mod m20240102_000001_create_investments_table;
mod m20240102_000002_create_transactions_table;
mod m20240103_000001_create_payment_gateways_table;
mod m20240103_000002_create_payment_methods_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_investment_plans_table::Migration),
            Box::new(m20240102_000001_create_investments_table::Migration),
            Box::new(m20240102_000002_create_transactions_table::Migration),
            Box::new(m20240103_000001_create_payment_gateways_table::Migration),
            Box::new(m20240103_000002_create_payment_methods_table::Migration)
        ]
    }
}
