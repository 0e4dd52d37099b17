use axum::{ extract::{ rejection::JsonRejection, Path, State }, http::StatusCode, Json };
use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };

use crate::db::entity::investment;
use crate::error::Result;

use super::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub user_id: i32,
    pub plan_id: i32,
    pub amount: Decimal,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResponse {
    pub id: i32,
    pub user_id: i32,
    pub plan_id: i32,
    pub amount: Decimal,
    pub status: String,
    pub started_at: String,
    pub matures_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
}

impl From<investment::Model> for InvestmentResponse {
    fn from(inv: investment::Model) -> Self {
        Self {
            id: inv.id,
            user_id: inv.user_id,
            plan_id: inv.plan_id,
            amount: inv.amount,
            status: inv.status,
            started_at: inv.started_at.to_rfc3339(),
            matures_at: inv.matures_at.to_rfc3339(),
            closed_at: inv.closed_at.map(|t| t.to_rfc3339()),
        }
    }
}

pub async fn list_user_investments(
    State(state): State<AppState>,
    Path(user_id): Path<i32>
) -> Result<Json<Vec<InvestmentResponse>>> {
    let investments = state.investment_service.list_for_user(user_id).await?;

    Ok(Json(investments.into_iter().map(InvestmentResponse::from).collect()))
}

pub async fn create_investment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateInvestmentRequest>, JsonRejection>
) -> Result<(StatusCode, Json<InvestmentResponse>)> {
    let Json(request) = payload?;

    let investment = state.investment_service.create(
        request.user_id,
        request.plan_id,
        request.amount
    ).await?;

    Ok((StatusCode::CREATED, Json(investment.into())))
}

pub async fn cancel_investment(
    State(state): State<AppState>,
    Path(investment_id): Path<i32>
) -> Result<Json<InvestmentResponse>> {
    let investment = state.investment_service.cancel(investment_id).await?;

    Ok(Json(investment.into()))
}
