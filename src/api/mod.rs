use std::sync::Arc;

use axum::{ routing::{ get, post, put }, Router };
use sea_orm::DatabaseConnection;

pub mod health;
pub mod plans;
pub mod users;
pub mod investments;
pub mod transactions;
pub mod portfolio;
pub mod calculator;
pub mod payments;

use crate::db::{
    InvestmentRepository,
    PaymentRepository,
    PlanRepository,
    TransactionRepository,
    UserRepository,
};
use crate::services::{
    InvestmentService,
    PaymentService,
    PlanService,
    PortfolioService,
    TransactionService,
    UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub plan_service: Arc<PlanService>,
    pub user_service: Arc<UserService>,
    pub investment_service: Arc<InvestmentService>,
    pub transaction_service: Arc<TransactionService>,
    pub portfolio_service: Arc<PortfolioService>,
    pub payment_service: Arc<PaymentService>,
}

impl AppState {
    /// Wire repositories and services over one shared connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        let user_repo = Arc::new(UserRepository::new(Arc::clone(&db)));
        let plan_repo = Arc::new(PlanRepository::new(Arc::clone(&db)));
        let investment_repo = Arc::new(InvestmentRepository::new(Arc::clone(&db)));
        let transaction_repo = Arc::new(TransactionRepository::new(Arc::clone(&db)));
        let payment_repo = Arc::new(PaymentRepository::new(Arc::clone(&db)));

        Self {
            plan_service: Arc::new(PlanService::new(plan_repo.clone())),
            user_service: Arc::new(UserService::new(user_repo.clone())),
            investment_service: Arc::new(
                InvestmentService::new(
                    Arc::clone(&db),
                    user_repo.clone(),
                    plan_repo.clone(),
                    investment_repo.clone()
                )
            ),
            transaction_service: Arc::new(
                TransactionService::new(Arc::clone(&db), transaction_repo.clone(), user_repo.clone())
            ),
            portfolio_service: Arc::new(
                PortfolioService::new(
                    user_repo.clone(),
                    plan_repo,
                    investment_repo,
                    transaction_repo
                )
            ),
            payment_service: Arc::new(PaymentService::new(db, payment_repo, user_repo)),
        }
    }
}

/// Every standalone endpoint the API client knows about, plus the extras the dashboard uses.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/investment-plans", get(plans::list_plans))
        .route("/api/investment-plans/{id}", get(plans::get_plan))
        .route("/api/investment-plans/{id}/deactivate", post(plans::deactivate_plan))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/users/{id}/investments", get(investments::list_user_investments))
        .route("/api/users/{id}/transactions", get(transactions::get_user_transactions))
        .route("/api/users/{id}/withdrawals", post(transactions::withdraw))
        .route("/api/users/{id}/portfolio", get(portfolio::get_portfolio))
        .route(
            "/api/users/{id}/payment-methods",
            get(payments::list_payment_methods).post(payments::add_payment_method)
        )
        .route(
            "/api/users/{id}/payment-methods/{method_id}/default",
            put(payments::set_default_payment_method)
        )
        .route("/api/investments", post(investments::create_investment))
        .route("/api/investments/{id}/cancel", post(investments::cancel_investment))
        .route("/api/calculate-investment", post(calculator::calculate_investment))
        .route("/api/payment-gateways", get(payments::list_gateways))
        .route("/api/payment-gateways/{slug}/quote", post(payments::quote_payment))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{ to_bytes, Body };
    use axum::http::{ Request, StatusCode };
    use chrono::Utc;
    use rust_decimal::Decimal;
    use chrono::Duration;
    use sea_orm::{ DatabaseBackend, MockDatabase, MockExecResult };
    use serde_json::{ json, Value };
    use std::str::FromStr;
    use tower::ServiceExt;

    use crate::db::entity::{
        investment,
        investment_plan,
        payment_gateway,
        payment_method,
        transaction,
        user,
    };

    fn plan() -> investment_plan::Model {
        investment_plan::Model {
            id: 1,
            name: "Growth".to_string(),
            rate: Decimal::new(125, 1),
            duration_days: 30,
            min_amount: Decimal::new(100, 0),
            max_amount: Decimal::new(10000, 0),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn carol() -> user::Model {
        user::Model {
            id: 3,
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            display_name: "Carol".to_string(),
            balance: Decimal::new(500000, 2),
            created_at: Utc::now(),
        }
    }

    fn active_investment(matures_in_days: i64) -> investment::Model {
        let matures_at = Utc::now() + Duration::days(matures_in_days);
        investment::Model {
            id: 9,
            user_id: 3,
            plan_id: 1,
            amount: Decimal::new(1000, 0),
            status: "active".to_string(),
            started_at: matures_at - Duration::days(30),
            matures_at,
            closed_at: None,
        }
    }

    fn ledger_entry(kind: &str, amount: Decimal) -> transaction::Model {
        transaction::Model {
            id: 21,
            user_id: 3,
            kind: kind.to_string(),
            amount,
            description: String::new(),
            reference: uuid::Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn stripe() -> payment_gateway::Model {
        payment_gateway::Model {
            id: 1,
            slug: "stripe".to_string(),
            name: "Stripe".to_string(),
            description: Some("Card payments".to_string()),
            is_active: true,
            currencies: json!(["USD", "EUR"]),
            method_types: json!(["card"]),
            min_amount: Decimal::new(1, 0),
            max_amount: Decimal::new(50000, 0),
            fee_type: "percentage".to_string(),
            fee_value: Decimal::new(29, 1),
            config: json!({ "publishableKey": "pk_test" }),
            created_at: Utc::now(),
        }
    }

    fn card(id: i32, is_default: bool) -> payment_method::Model {
        payment_method::Model {
            id,
            user_id: 3,
            method_type: "card".to_string(),
            last4: Some("4242".to_string()),
            brand: Some("visa".to_string()),
            expiry_month: Some(12),
            expiry_year: Some(2030),
            is_default,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn rows(n: u64) -> MockExecResult {
        MockExecResult { last_insert_id: 0, rows_affected: n }
    }

    fn dec(value: &Value) -> Decimal {
        Decimal::from_str(value.as_str().unwrap()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let (status, body) = send(router(AppState::new(db)), get_req("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_calculate_investment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![plan()]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/calculate-investment", json!({ "amount": "1000", "planId": 1 }))
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "estimatedReturn": "10.27", "totalReturn": "1010.27" }));
    }

    #[tokio::test]
    async fn test_calculate_rejects_zero_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![plan()]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/calculate-investment", json!({ "amount": "0", "planId": 1 }))
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "amount");
    }

    #[tokio::test]
    async fn test_calculate_unknown_plan() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<investment_plan::Model>::new()])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/calculate-investment", json!({ "amount": "1000", "planId": 7 }))
        ).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_plans() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![plan()]])
            .into_connection();

        let (status, body) = send(router(AppState::new(db)), get_req("/api/investment-plans")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Growth");
        assert_eq!(body[0]["rate"], "12.5");
        assert_eq!(body[0]["durationDays"], 30);
    }

    #[tokio::test]
    async fn test_get_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![user::Model {
                    id: 3,
                    username: "carol".to_string(),
                    email: "carol@example.com".to_string(),
                    display_name: "Carol".to_string(),
                    balance: Decimal::new(123456, 2),
                    created_at: Utc::now(),
                }],
            ])
            .into_connection();

        let (status, body) = send(router(AppState::new(db)), get_req("/api/users/3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["displayName"], "Carol");
        assert_eq!(body["balance"], "1234.56");
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let (status, _) = send(router(AppState::new(db)), get_req("/api/users/404")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/calculate-investment", json!({ "amount": "abc", "planId": 1 }))
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["field"], "body");
    }

    #[tokio::test]
    async fn test_create_investment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![carol()]])
            .append_query_results([vec![plan()]])
            .append_exec_results([rows(1)])
            .append_query_results([vec![active_investment(30)]])
            .append_query_results([vec![ledger_entry("investment", Decimal::new(-1000, 0))]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/investments", json!({ "userId": 3, "planId": 1, "amount": "1000" }))
        ).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["userId"], 3);
        assert_eq!(body["planId"], 1);
        assert_eq!(dec(&body["amount"]), Decimal::new(1000, 0));
        assert_eq!(body["status"], "active");
        assert!(body["maturesAt"].is_string());
        assert!(body.get("closedAt").is_none());
    }

    #[tokio::test]
    async fn test_create_investment_insufficient_balance() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![carol()]])
            .append_query_results([vec![plan()]])
            .append_exec_results([rows(0)])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/investments", json!({ "userId": 3, "planId": 1, "amount": "1000" }))
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INSUFFICIENT_BALANCE");
        assert_eq!(body["error"]["field"], "amount");
    }

    #[tokio::test]
    async fn test_cancel_investment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![active_investment(10)]])
            .append_exec_results([rows(1), rows(1)])
            .append_query_results([vec![ledger_entry("other", Decimal::new(1000, 0))]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/investments/9/cancel", json!({}))
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");
        assert!(body["closedAt"].is_string());
    }

    #[tokio::test]
    async fn test_cancel_matured_investment_is_409() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![active_investment(-1)]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/investments/9/cancel", json!({}))
        ).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_withdraw() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![carol()]])
            .append_exec_results([rows(1)])
            .append_query_results([vec![ledger_entry("withdrawal", Decimal::new(-120, 0))]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/users/3/withdrawals", json!({ "amount": "120" }))
        ).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], "withdrawal");
        assert_eq!(body["userId"], 3);
        assert_eq!(dec(&body["amount"]), Decimal::new(-120, 0));
        assert!(body["reference"].is_string());
    }

    #[tokio::test]
    async fn test_withdraw_fractional_cents_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json("/api/users/3/withdrawals", json!({ "amount": "100.005" }))
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "amount");
    }

    #[tokio::test]
    async fn test_list_gateways_hides_config() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stripe()]])
            .into_connection();

        let (status, body) = send(router(AppState::new(db)), get_req("/api/payment-gateways")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["slug"], "stripe");
        assert_eq!(body[0]["methodTypes"], json!(["card"]));
        assert_eq!(body[0]["feeType"], "percentage");
        assert!(body[0].get("config").is_none());
    }

    #[tokio::test]
    async fn test_quote_payment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stripe()]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json(
                "/api/payment-gateways/stripe/quote",
                json!({ "amount": "100.00", "currency": "usd" })
            )
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gateway"], "stripe");
        assert_eq!(body["currency"], "USD");
        assert_eq!(dec(&body["fee"]), Decimal::new(290, 2));
        assert_eq!(dec(&body["total"]), Decimal::new(10290, 2));
    }

    #[tokio::test]
    async fn test_add_first_payment_method() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stripe()]])
            .append_query_results([vec![carol()]])
            .append_query_results([Vec::<payment_method::Model>::new()])
            .append_query_results([vec![card(1, true)]])
            .into_connection();

        let (status, body) = send(
            router(AppState::new(db)),
            post_json(
                "/api/users/3/payment-methods",
                json!({
                    "type": "card",
                    "last4": "4242",
                    "brand": "visa",
                    "expiryMonth": 12,
                    "expiryYear": 2030
                })
            )
        ).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], "card");
        assert_eq!(body["isDefault"], true);
        assert_eq!(body["expiryMonth"], 12);
    }

    #[tokio::test]
    async fn test_list_payment_methods() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![carol()]])
            .append_query_results([vec![card(1, true), card(2, false)]])
            .into_connection();

        let (status, body) = send(router(AppState::new(db)), get_req("/api/users/3/payment-methods")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["isDefault"], true);
    }

    #[tokio::test]
    async fn test_set_default_payment_method() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![card(2, false)]])
            .append_query_results([vec![carol()]])
            .append_exec_results([rows(1), rows(1)])
            .into_connection();

        let request = Request::builder()
            .method("PUT")
            .uri("/api/users/3/payment-methods/2/default")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(AppState::new(db)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 2);
        assert_eq!(body["isDefault"], true);
    }
}
