use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ DatabaseConnection, TransactionTrait };

use crate::calculator;
use crate::db::entity::transaction;
use crate::db::{ TransactionRepository, UserRepository };
use crate::enums::TransactionKind;
use crate::error::{ AppError, Result };

const MAX_PAGE_SIZE: u64 = 200;

pub struct TransactionService {
    db: Arc<DatabaseConnection>,
    transaction_repo: Arc<TransactionRepository>,
    user_repo: Arc<UserRepository>,
}

impl TransactionService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        transaction_repo: Arc<TransactionRepository>,
        user_repo: Arc<UserRepository>
    ) -> Self {
        Self {
            db,
            transaction_repo,
            user_repo,
        }
    }

    pub async fn get_user_transactions(
        &self,
        user_id: i32,
        limit: Option<u64>,
        offset: Option<u64>
    ) -> Result<Vec<transaction::Model>> {
        // Verify user exists
        self.user_repo.find_by_id(user_id).await?;

        let limit = limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
        self.transaction_repo.find_by_user(user_id, Some(limit), offset).await
    }

    /// Debit the balance and append a withdrawal entry in one unit.
    pub async fn withdraw(
        &self,
        user_id: i32,
        amount: Decimal,
        description: Option<String>
    ) -> Result<transaction::Model> {
        if amount <= Decimal::ZERO {
            return Err(AppError::invalid("amount", "Amount must be greater than zero"));
        }
        calculator::ensure_cents("amount", amount)?;

        self.user_repo.find_by_id(user_id).await?;

        let txn = self.db.begin().await?;
        UserRepository::debit(&txn, user_id, amount).await?;
        let entry = TransactionRepository::append(
            &txn,
            user_id,
            TransactionKind::Withdrawal,
            amount,
            description.unwrap_or_else(|| "Withdrawal".to_string())
        ).await?;
        txn.commit().await?;

        tracing::info!("User {} withdrew {}", user_id, amount);

        Ok(entry)
    }
}
