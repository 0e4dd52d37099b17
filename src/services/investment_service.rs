use std::collections::HashMap;
use std::sync::Arc;

use chrono::{ DateTime, Utc };
use rust_decimal::Decimal;
use sea_orm::{ DatabaseConnection, TransactionTrait };

use crate::calculator;
use crate::db::entity::{ investment, investment_plan };
use crate::db::{ InvestmentRepository, PlanRepository, TransactionRepository, UserRepository };
use crate::enums::{ InvestmentStatus, TransactionKind };
use crate::error::{ AppError, Result };

pub struct InvestmentService {
    db: Arc<DatabaseConnection>,
    user_repo: Arc<UserRepository>,
    plan_repo: Arc<PlanRepository>,
    investment_repo: Arc<InvestmentRepository>,
}

impl InvestmentService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        user_repo: Arc<UserRepository>,
        plan_repo: Arc<PlanRepository>,
        investment_repo: Arc<InvestmentRepository>
    ) -> Self {
        Self {
            db,
            user_repo,
            plan_repo,
            investment_repo,
        }
    }

    /// Commit `amount` of the user's balance to a plan.
    pub async fn create(
        &self,
        user_id: i32,
        plan_id: i32,
        amount: Decimal
    ) -> Result<investment::Model> {
        if amount <= Decimal::ZERO {
            return Err(AppError::invalid("amount", "Amount must be greater than zero"));
        }
        calculator::ensure_cents("amount", amount)?;

        self.user_repo.find_by_id(user_id).await?;
        let plan = self.plan_repo.find_by_id(plan_id).await?;
        validate_against_plan(&plan, amount)?;

        let txn = self.db.begin().await?;

        UserRepository::debit(&txn, user_id, amount).await?;
        let investment = InvestmentRepository::insert(
            &txn,
            user_id,
            &plan,
            amount,
            Utc::now()
        ).await?;
        TransactionRepository::append(
            &txn,
            user_id,
            TransactionKind::Investment,
            amount,
            format!("Investment #{} in {} plan", investment.id, plan.name)
        ).await?;

        txn.commit().await?;

        tracing::info!(
            "User {} invested {} in plan {} (investment {}, matures {})",
            user_id,
            amount,
            plan.id,
            investment.id,
            investment.matures_at
        );

        Ok(investment)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<investment::Model>> {
        self.user_repo.find_by_id(user_id).await?;
        self.investment_repo.find_by_user(user_id).await
    }

    /// Cancel an active investment before it matures and refund the principal.
    pub async fn cancel(&self, id: i32) -> Result<investment::Model> {
        self.cancel_at(id, Utc::now()).await
    }

    async fn cancel_at(&self, id: i32, now: DateTime<Utc>) -> Result<investment::Model> {
        let investment = self.investment_repo.find_by_id(id).await?;
        let status: InvestmentStatus = investment.status.parse()?;
        if status.is_terminal() {
            return Err(AppError::Conflict(format!("Investment {} is already {}", id, status)));
        }
        // Past maturity the returns are owed; the sweep pays them out.
        if investment.matures_at <= now {
            return Err(
                AppError::Conflict(format!("Investment {} has matured and is awaiting payout", id))
            );
        }

        let txn = self.db.begin().await?;

        if !InvestmentRepository::close(&txn, id, InvestmentStatus::Cancelled, now).await? {
            return Err(AppError::Conflict(format!("Investment {} is no longer active", id)));
        }
        UserRepository::credit(&txn, investment.user_id, investment.amount).await?;
        TransactionRepository::append(
            &txn,
            investment.user_id,
            TransactionKind::Other,
            investment.amount,
            format!("Refund for cancelled investment #{}", id)
        ).await?;

        txn.commit().await?;

        tracing::info!("Investment {} cancelled, {} refunded", id, investment.amount);

        Ok(investment::Model {
            status: InvestmentStatus::Cancelled.to_string(),
            closed_at: Some(now),
            ..investment
        })
    }

    /// Complete every active investment that has reached maturity. Returns how many were completed.
    pub async fn complete_matured(&self, now: DateTime<Utc>) -> Result<usize> {
        let matured = self.investment_repo.find_matured(now).await?;
        if matured.is_empty() {
            return Ok(0);
        }

        let plans: HashMap<i32, investment_plan::Model> = self.plan_repo
            .find_all().await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut completed = 0;
        for investment in &matured {
            match self.complete_one(investment, plans.get(&investment.plan_id), now).await {
                Ok(true) => {
                    completed += 1;
                }
                Ok(false) => {
                    tracing::debug!("Investment {} was closed concurrently", investment.id);
                }
                Err(e) => {
                    tracing::warn!("Failed to complete investment {}: {}", investment.id, e);
                }
            }
        }

        Ok(completed)
    }

    async fn complete_one(
        &self,
        investment: &investment::Model,
        plan: Option<&investment_plan::Model>,
        now: DateTime<Utc>
    ) -> Result<bool> {
        let plan = plan.ok_or_else(||
            AppError::Internal(format!("Plan {} missing for investment {}", investment.plan_id, investment.id))
        )?;
        let returns = calculator::calculate(investment.amount, &plan.terms())?;

        let txn = self.db.begin().await?;

        if !InvestmentRepository::close(&txn, investment.id, InvestmentStatus::Completed, now).await? {
            return Ok(false);
        }
        UserRepository::credit(&txn, investment.user_id, returns.total_return).await?;
        TransactionRepository::append(
            &txn,
            investment.user_id,
            TransactionKind::Other,
            investment.amount,
            format!("Principal returned for investment #{}", investment.id)
        ).await?;
        TransactionRepository::append(
            &txn,
            investment.user_id,
            TransactionKind::Profit,
            returns.estimated_return,
            format!("Profit from {} plan investment #{}", plan.name, investment.id)
        ).await?;

        txn.commit().await?;

        tracing::info!(
            "Investment {} matured: {} profit credited to user {}",
            investment.id,
            returns.estimated_return,
            investment.user_id
        );

        Ok(true)
    }
}

fn validate_against_plan(plan: &investment_plan::Model, amount: Decimal) -> Result<()> {
    if !plan.is_active {
        return Err(
            AppError::invalid("planId", format!("Plan {} is not accepting new investments", plan.name))
        );
    }
    if amount < plan.min_amount || amount > plan.max_amount {
        return Err(
            AppError::invalid(
                "amount",
                format!(
                    "Amount must be between {} and {} for the {} plan",
                    plan.min_amount,
                    plan.max_amount,
                    plan.name
                )
            )
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{ DatabaseBackend, MockDatabase, MockExecResult };
    use crate::db::entity::{ transaction, user };

    fn plan(is_active: bool) -> investment_plan::Model {
        investment_plan::Model {
            id: 2,
            name: "Growth".to_string(),
            rate: Decimal::new(125, 1),
            duration_days: 30,
            min_amount: Decimal::new(100, 0),
            max_amount: Decimal::new(10000, 0),
            is_active,
            created_at: Utc::now(),
        }
    }

    fn user() -> user::Model {
        user::Model {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            balance: Decimal::new(5000, 0),
            created_at: Utc::now(),
        }
    }

    /// Matured a day ago on a 30-day plan.
    fn investment(amount: Decimal, status: InvestmentStatus) -> investment::Model {
        investment_started(amount, status, 31)
    }

    fn investment_started(amount: Decimal, status: InvestmentStatus, days_ago: i64) -> investment::Model {
        let started_at = Utc::now() - Duration::days(days_ago);
        investment::Model {
            id: 9,
            user_id: 1,
            plan_id: 2,
            amount,
            status: status.to_string(),
            started_at,
            matures_at: started_at + Duration::days(30),
            closed_at: None,
        }
    }

    fn ledger(kind: TransactionKind, amount: Decimal) -> transaction::Model {
        transaction::Model {
            id: 1,
            user_id: 1,
            kind: kind.to_string(),
            amount: kind.signed(amount),
            description: String::new(),
            reference: uuid::Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn service(db: DatabaseConnection) -> InvestmentService {
        let db = Arc::new(db);
        InvestmentService::new(
            Arc::clone(&db),
            Arc::new(UserRepository::new(Arc::clone(&db))),
            Arc::new(PlanRepository::new(Arc::clone(&db))),
            Arc::new(InvestmentRepository::new(db))
        )
    }

    #[test]
    fn test_amount_outside_plan_bounds() {
        let err = validate_against_plan(&plan(true), Decimal::new(50, 0)).unwrap_err();
        assert_eq!(err.field(), Some("amount"));

        let err = validate_against_plan(&plan(true), Decimal::new(10001, 0)).unwrap_err();
        assert_eq!(err.field(), Some("amount"));

        assert!(validate_against_plan(&plan(true), Decimal::new(100, 0)).is_ok());
        assert!(validate_against_plan(&plan(true), Decimal::new(10000, 0)).is_ok());
    }

    #[test]
    fn test_inactive_plan_rejected() {
        let err = validate_against_plan(&plan(false), Decimal::new(500, 0)).unwrap_err();
        assert_eq!(err.field(), Some("planId"));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_amount_without_queries() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(db).create(1, 2, Decimal::ZERO).await.unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[tokio::test]
    async fn test_create_unknown_plan_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user()]])
            .append_query_results([Vec::<investment_plan::Model>::new()])
            .into_connection();

        let err = service(db).create(1, 99, Decimal::new(500, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_create_insufficient_balance() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user()]])
            .append_query_results([vec![plan(true)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();

        let err = service(db).create(1, 2, Decimal::new(500, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance), "{:?}", err);
    }

    #[tokio::test]
    async fn test_create_debits_and_records() {
        let amount = Decimal::new(1000, 0);
        let created = investment(amount, InvestmentStatus::Active);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user()]])
            .append_query_results([vec![plan(true)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .append_query_results([vec![created.clone()]])
            .append_query_results([vec![ledger(TransactionKind::Investment, amount)]])
            .into_connection();

        let result = service(db).create(1, 2, amount).await.unwrap();
        assert_eq!(result, created);
    }

    #[tokio::test]
    async fn test_cancel_completed_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![investment(Decimal::new(500, 0), InvestmentStatus::Completed)]])
            .into_connection();

        let err = service(db).cancel(9).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_create_rejects_fractional_cents_without_queries() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(db).create(1, 2, Decimal::new(100005, 3)).await.unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[tokio::test]
    async fn test_cancel_after_maturity_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![investment(Decimal::new(500, 0), InvestmentStatus::Active)]])
            .into_connection();

        let err = service(db).cancel(9).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_cancel_at_maturity_instant_is_conflict() {
        let active = investment_started(Decimal::new(500, 0), InvestmentStatus::Active, 5);
        let matures_at = active.matures_at;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![active]])
            .into_connection();

        let err = service(db).cancel_at(9, matures_at).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_cancel_refunds_principal() {
        let amount = Decimal::new(500, 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![investment_started(amount, InvestmentStatus::Active, 5)]])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .append_query_results([vec![ledger(TransactionKind::Other, amount)]])
            .into_connection();

        let cancelled = service(db).cancel(9).await.unwrap();
        assert_eq!(cancelled.status, "cancelled");
        assert!(cancelled.closed_at.is_some());
    }

    #[tokio::test]
    async fn test_complete_matured_nothing_due() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<investment::Model>::new()])
            .into_connection();

        assert_eq!(service(db).complete_matured(Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_complete_matured_credits_returns() {
        let amount = Decimal::new(1000, 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![investment(amount, InvestmentStatus::Active)]])
            .append_query_results([vec![plan(true)]])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .append_query_results([vec![ledger(TransactionKind::Other, amount)]])
            .append_query_results([vec![ledger(TransactionKind::Profit, Decimal::new(1027, 2))]])
            .into_connection();

        assert_eq!(service(db).complete_matured(Utc::now()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_complete_matured_skips_concurrently_closed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![investment(Decimal::new(1000, 0), InvestmentStatus::Active)]])
            .append_query_results([vec![plan(true)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();

        assert_eq!(service(db).complete_matured(Utc::now()).await.unwrap(), 0);
    }
}
