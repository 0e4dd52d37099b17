use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    entity::prelude::*,
    sea_query::Expr,
    ConnectionTrait,
    DatabaseConnection,
    QuerySelect,
};

use crate::error::{ AppError, Result };

pub mod entity;
pub use entity::*;

mod plan_repository;
pub use plan_repository::PlanRepository;

mod investment_repository;
pub use investment_repository::InvestmentRepository;

mod transaction_repository;
pub use transaction_repository::TransactionRepository;

mod payment_repository;
pub use payment_repository::{ NewPaymentMethod, PaymentRepository };

pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<entity::user::Model> {
        entity::user::Entity
            ::find_by_id(id)
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Load the user and hold its row lock until `conn`'s transaction ends.
    pub async fn lock<C: ConnectionTrait>(conn: &C, id: i32) -> Result<entity::user::Model> {
        entity::user::Entity
            ::find_by_id(id)
            .lock_exclusive()
            .one(conn).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Add `amount` to the user's balance.
    pub async fn credit<C: ConnectionTrait>(conn: &C, id: i32, amount: Decimal) -> Result<()> {
        let result = entity::user::Entity
            ::update_many()
            .col_expr(entity::user::Column::Balance, Expr::col(entity::user::Column::Balance).add(amount))
            .filter(entity::user::Column::Id.eq(id))
            .exec(conn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    /// Subtract `amount` from the balance, refusing to go below zero.
    pub async fn debit<C: ConnectionTrait>(conn: &C, id: i32, amount: Decimal) -> Result<()> {
        let result = entity::user::Entity
            ::update_many()
            .col_expr(entity::user::Column::Balance, Expr::col(entity::user::Column::Balance).sub(amount))
            .filter(entity::user::Column::Id.eq(id))
            .filter(entity::user::Column::Balance.gte(amount))
            .exec(conn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::InsufficientBalance);
        }
        Ok(())
    }
}
