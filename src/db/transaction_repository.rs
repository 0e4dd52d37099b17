use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::db::entity::{ transaction, Transaction };
use crate::enums::TransactionKind;
use crate::error::Result;

/// Ledger access. Entries are only ever inserted.
pub struct TransactionRepository {
    db: Arc<DatabaseConnection>,
}

impl TransactionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        kind: TransactionKind,
        amount: Decimal,
        description: String
    ) -> Result<transaction::Model> {
        let entry = transaction::ActiveModel {
            user_id: Set(user_id),
            kind: Set(kind.to_string()),
            amount: Set(kind.signed(amount)),
            description: Set(description),
            reference: Set(Uuid::new_v4()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        Ok(entry.insert(conn).await?)
    }

    pub async fn find_by_user(
        &self,
        user_id: i32,
        limit: Option<u64>,
        offset: Option<u64>
    ) -> Result<Vec<transaction::Model>> {
        let transactions = Transaction::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .order_by_desc(transaction::Column::CreatedAt)
            .order_by_desc(transaction::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref()).await?;

        Ok(transactions)
    }
}
