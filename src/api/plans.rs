use axum::{ extract::{ Path, State }, Json };
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::entity::investment_plan;
use crate::error::Result;

use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: i32,
    pub name: String,
    pub rate: Decimal,
    pub duration_days: i32,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub is_active: bool,
}

impl From<investment_plan::Model> for PlanResponse {
    fn from(plan: investment_plan::Model) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            rate: plan.rate,
            duration_days: plan.duration_days,
            min_amount: plan.min_amount,
            max_amount: plan.max_amount,
            is_active: plan.is_active,
        }
    }
}

pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanResponse>>> {
    let plans = state.plan_service.list_active().await?;

    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

pub async fn get_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<i32>
) -> Result<Json<PlanResponse>> {
    let plan = state.plan_service.get(plan_id).await?;

    Ok(Json(plan.into()))
}

pub async fn deactivate_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<i32>
) -> Result<Json<PlanResponse>> {
    let plan = state.plan_service.deactivate(plan_id).await?;

    Ok(Json(plan.into()))
}
