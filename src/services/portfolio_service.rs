use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculator;
use crate::db::entity::{ investment, investment_plan, transaction, user };
use crate::db::{ InvestmentRepository, PlanRepository, TransactionRepository, UserRepository };
use crate::enums::{ InvestmentStatus, TransactionKind };
use crate::error::Result;

pub struct PortfolioService {
    user_repo: Arc<UserRepository>,
    plan_repo: Arc<PlanRepository>,
    investment_repo: Arc<InvestmentRepository>,
    transaction_repo: Arc<TransactionRepository>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub user_id: i32,
    pub balance: Decimal,
    pub total_invested: Decimal,
    pub active_investments: usize,
    pub completed_investments: usize,
    pub expected_returns: Decimal,
    pub total_profit: Decimal,
    pub total_withdrawn: Decimal,
}

impl PortfolioService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        plan_repo: Arc<PlanRepository>,
        investment_repo: Arc<InvestmentRepository>,
        transaction_repo: Arc<TransactionRepository>
    ) -> Self {
        Self {
            user_repo,
            plan_repo,
            investment_repo,
            transaction_repo,
        }
    }

    /// Get the dashboard summary for a user
    pub async fn get_portfolio(&self, user_id: i32) -> Result<Portfolio> {
        let user = self.user_repo.find_by_id(user_id).await?;
        let investments = self.investment_repo.find_by_user(user_id).await?;
        let plans = self.plan_repo.find_all().await?;
        let transactions = self.transaction_repo.find_by_user(user_id, None, None).await?;

        Ok(summarize(&user, &investments, &plans, &transactions))
    }
}

pub fn summarize(
    user: &user::Model,
    investments: &[investment::Model],
    plans: &[investment_plan::Model],
    transactions: &[transaction::Model]
) -> Portfolio {
    let plans: HashMap<i32, &investment_plan::Model> = plans
        .iter()
        .map(|p| (p.id, p))
        .collect();

    let mut portfolio = Portfolio {
        user_id: user.id,
        balance: user.balance,
        total_invested: Decimal::ZERO,
        active_investments: 0,
        completed_investments: 0,
        expected_returns: Decimal::ZERO,
        total_profit: Decimal::ZERO,
        total_withdrawn: Decimal::ZERO,
    };

    for inv in investments {
        match inv.status.parse::<InvestmentStatus>() {
            Ok(InvestmentStatus::Active) => {
                portfolio.active_investments += 1;
                portfolio.total_invested += inv.amount;

                let returns = plans
                    .get(&inv.plan_id)
                    .and_then(|plan| calculator::calculate(inv.amount, &plan.terms()).ok());
                match returns {
                    Some(r) => {
                        portfolio.expected_returns += r.estimated_return;
                    }
                    None => {
                        tracing::warn!("No return estimate for investment {}", inv.id);
                    }
                }
            }
            Ok(InvestmentStatus::Completed) => {
                portfolio.completed_investments += 1;
            }
            Ok(InvestmentStatus::Cancelled) => {}
            Err(_) => {
                tracing::warn!("Investment {} has unknown status '{}'", inv.id, inv.status);
            }
        }
    }

    for tx in transactions {
        match tx.kind.parse::<TransactionKind>() {
            Ok(TransactionKind::Profit) => {
                portfolio.total_profit += tx.amount;
            }
            Ok(TransactionKind::Withdrawal) => {
                portfolio.total_withdrawn += tx.amount.abs();
            }
            _ => {}
        }
    }

    portfolio
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn investment(id: i32, plan_id: i32, amount: &str, status: &str) -> investment::Model {
        investment::Model {
            id,
            user_id: 1,
            plan_id,
            amount: dec(amount),
            status: status.to_string(),
            started_at: Utc::now(),
            matures_at: Utc::now(),
            closed_at: None,
        }
    }

    fn ledger(kind: &str, amount: &str) -> transaction::Model {
        transaction::Model {
            id: 0,
            user_id: 1,
            kind: kind.to_string(),
            amount: dec(amount),
            description: String::new(),
            reference: uuid::Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize() {
        let user = user::Model {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            balance: dec("250.00"),
            created_at: Utc::now(),
        };
        let plans = vec![investment_plan::Model {
            id: 1,
            name: "Growth".to_string(),
            rate: dec("12.5"),
            duration_days: 30,
            min_amount: dec("100"),
            max_amount: dec("10000"),
            is_active: false,
            created_at: Utc::now(),
        }];
        let investments = vec![
            investment(1, 1, "1000", "active"),
            investment(2, 1, "500", "completed"),
            investment(3, 1, "700", "cancelled"),
            // plan no longer known: counted, but no estimate
            investment(4, 42, "300", "active")
        ];
        let transactions = vec![
            ledger("investment", "-1000"),
            ledger("profit", "5.14"),
            ledger("withdrawal", "-80"),
            ledger("other", "700")
        ];

        let portfolio = summarize(&user, &investments, &plans, &transactions);

        assert_eq!(portfolio.balance, dec("250.00"));
        assert_eq!(portfolio.active_investments, 2);
        assert_eq!(portfolio.completed_investments, 1);
        assert_eq!(portfolio.total_invested, dec("1300"));
        assert_eq!(portfolio.expected_returns, dec("10.27"));
        assert_eq!(portfolio.total_profit, dec("5.14"));
        assert_eq!(portfolio.total_withdrawn, dec("80"));
    }
}
