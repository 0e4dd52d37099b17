use std::sync::Arc;

use chrono::{ DateTime, Duration, Utc };
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};

use crate::db::entity::{ investment, investment_plan, Investment };
use crate::enums::InvestmentStatus;
use crate::error::{ AppError, Result };

pub struct InvestmentRepository {
    db: Arc<DatabaseConnection>,
}

impl InvestmentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        plan: &investment_plan::Model,
        amount: Decimal,
        started_at: DateTime<Utc>
    ) -> Result<investment::Model> {
        let model = investment::ActiveModel {
            user_id: Set(user_id),
            plan_id: Set(plan.id),
            amount: Set(amount),
            status: Set(InvestmentStatus::Active.to_string()),
            started_at: Set(started_at),
            matures_at: Set(started_at + Duration::days(i64::from(plan.duration_days))),
            closed_at: Set(None),
            ..Default::default()
        };

        Ok(model.insert(conn).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<investment::Model> {
        Investment::find_by_id(id)
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound(format!("Investment {} not found", id)))
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<investment::Model>> {
        let investments = Investment::find()
            .filter(investment::Column::UserId.eq(user_id))
            .order_by_desc(investment::Column::StartedAt)
            .order_by_desc(investment::Column::Id)
            .all(self.db.as_ref()).await?;

        Ok(investments)
    }

    /// Active investments whose maturity is at or before `now`.
    pub async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<investment::Model>> {
        let investments = Investment::find()
            .filter(investment::Column::Status.eq(InvestmentStatus::Active.as_str()))
            .filter(investment::Column::MaturesAt.lte(now))
            .order_by_asc(investment::Column::MaturesAt)
            .all(self.db.as_ref()).await?;

        Ok(investments)
    }

    /// Move an active investment to a terminal status. Returns false when it was no longer active.
    pub async fn close<C: ConnectionTrait>(
        conn: &C,
        id: i32,
        status: InvestmentStatus,
        at: DateTime<Utc>
    ) -> Result<bool> {
        let result = Investment::update_many()
            .col_expr(investment::Column::Status, Expr::value(status.as_str()))
            .col_expr(investment::Column::ClosedAt, Expr::value(Some(at)))
            .filter(investment::Column::Id.eq(id))
            .filter(investment::Column::Status.eq(InvestmentStatus::Active.as_str()))
            .exec(conn).await?;

        Ok(result.rows_affected == 1)
    }
}
