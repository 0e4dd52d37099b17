//! Endpoint shapes per backend. All knowledge of paths and bodies lives here.

use reqwest::Method;
use serde_json::{ json, Value };

use crate::enums::ApiMode;

use super::operation::LogicalOperation;

pub const STANDALONE_PREFIX: &str = "/api";
pub const EMBEDDED_PREFIX: &str = "/wp-json/blackcnote/v1";

/// A fully determined request, minus base URL and headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    fn get(path: String) -> Self {
        Self { method: Method::GET, path, query: Vec::new(), body: None }
    }

    fn post(path: String, body: Value) -> Self {
        Self { method: Method::POST, path, query: Vec::new(), body: Some(body) }
    }

    fn filtered_by_user(mut self, user_id: i32) -> Self {
        self.query.push(("user_id", user_id.to_string()));
        self
    }
}

pub trait RouteTable: Send + Sync {
    fn request_for(&self, operation: &LogicalOperation) -> RequestSpec;
}

/// The application's own REST backend.
pub struct StandaloneRoutes;

impl RouteTable for StandaloneRoutes {
    fn request_for(&self, operation: &LogicalOperation) -> RequestSpec {
        let p = STANDALONE_PREFIX;
        match operation {
            LogicalOperation::GetPlans => RequestSpec::get(format!("{p}/investment-plans")),
            LogicalOperation::GetUserInvestments(user_id) =>
                RequestSpec::get(format!("{p}/users/{user_id}/investments")),
            LogicalOperation::CreateInvestment(payload) =>
                RequestSpec::post(
                    format!("{p}/investments"),
                    json!({
                        "userId": payload.user_id,
                        "planId": payload.plan_id,
                        "amount": payload.amount.to_string(),
                    })
                ),
            LogicalOperation::GetUserData(user_id) =>
                RequestSpec::get(format!("{p}/users/{user_id}")),
            LogicalOperation::GetUserTransactions(user_id) =>
                RequestSpec::get(format!("{p}/users/{user_id}/transactions")),
            LogicalOperation::GetUserPortfolio(user_id) =>
                RequestSpec::get(format!("{p}/users/{user_id}/portfolio")),
            LogicalOperation::CalculateInvestment(payload) =>
                RequestSpec::post(
                    format!("{p}/calculate-investment"),
                    json!({
                        "amount": payload.amount.to_string(),
                        "planId": payload.plan_id,
                    })
                ),
        }
    }
}

/// WordPress REST conventions: pluralized resources, filtering through `?user_id=`.
pub struct EmbeddedRoutes;

impl RouteTable for EmbeddedRoutes {
    fn request_for(&self, operation: &LogicalOperation) -> RequestSpec {
        let p = EMBEDDED_PREFIX;
        match operation {
            LogicalOperation::GetPlans => RequestSpec::get(format!("{p}/plans")),
            LogicalOperation::GetUserInvestments(user_id) =>
                RequestSpec::get(format!("{p}/investments")).filtered_by_user(*user_id),
            // The host schema only exposes a meta bag for custom fields.
            LogicalOperation::CreateInvestment(payload) =>
                RequestSpec::post(
                    format!("{p}/investments"),
                    json!({
                        "status": "publish",
                        "meta": {
                            "user_id": payload.user_id,
                            "plan_id": payload.plan_id,
                            "amount": payload.amount.to_string(),
                        },
                    })
                ),
            LogicalOperation::GetUserData(user_id) =>
                RequestSpec::get(format!("{p}/users/{user_id}")),
            LogicalOperation::GetUserTransactions(user_id) =>
                RequestSpec::get(format!("{p}/transactions")).filtered_by_user(*user_id),
            LogicalOperation::GetUserPortfolio(user_id) =>
                RequestSpec::get(format!("{p}/portfolios")).filtered_by_user(*user_id),
            LogicalOperation::CalculateInvestment(payload) =>
                RequestSpec::post(
                    format!("{p}/calculations"),
                    json!({
                        "amount": payload.amount.to_string(),
                        "plan_id": payload.plan_id,
                    })
                ),
        }
    }
}

pub fn route_table(mode: ApiMode) -> &'static dyn RouteTable {
    match mode {
        ApiMode::Standalone => &StandaloneRoutes,
        ApiMode::Embedded => &EmbeddedRoutes,
    }
}
