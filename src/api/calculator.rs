use axum::{ extract::{ rejection::JsonRejection, State }, Json };
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculator::{ self, Returns };
use crate::error::Result;

use super::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub amount: Decimal,
    pub plan_id: i32,
}

pub async fn calculate_investment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculateRequest>, JsonRejection>
) -> Result<Json<Returns>> {
    let Json(request) = payload?;

    let plan = state.plan_service.get(request.plan_id).await?;
    let returns = calculator::calculate(request.amount, &plan.terms())?;

    Ok(Json(returns))
}
