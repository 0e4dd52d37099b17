use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentPayload {
    pub user_id: i32,
    pub plan_id: i32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePayload {
    pub amount: Decimal,
    pub plan_id: i32,
}

/// An abstract request, independent of which backend will serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalOperation {
    GetPlans,
    GetUserInvestments(i32),
    CreateInvestment(CreateInvestmentPayload),
    GetUserData(i32),
    GetUserTransactions(i32),
    GetUserPortfolio(i32),
    CalculateInvestment(CalculatePayload),
}

impl LogicalOperation {
    pub fn name(&self) -> &'static str {
        match self {
            LogicalOperation::GetPlans => "get_plans",
            LogicalOperation::GetUserInvestments(_) => "get_user_investments",
            LogicalOperation::CreateInvestment(_) => "create_investment",
            LogicalOperation::GetUserData(_) => "get_user_data",
            LogicalOperation::GetUserTransactions(_) => "get_user_transactions",
            LogicalOperation::GetUserPortfolio(_) => "get_user_portfolio",
            LogicalOperation::CalculateInvestment(_) => "calculate_investment",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            LogicalOperation::CreateInvestment(_) | LogicalOperation::CalculateInvestment(_)
        )
    }

    /// Amount carried by write operations, if any.
    pub(crate) fn amount(&self) -> Option<Decimal> {
        match self {
            LogicalOperation::CreateInvestment(p) => Some(p.amount),
            LogicalOperation::CalculateInvestment(p) => Some(p.amount),
            _ => None,
        }
    }
}
