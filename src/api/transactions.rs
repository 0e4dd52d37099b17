use axum::{ extract::{ rejection::JsonRejection, Path, Query, State }, http::StatusCode, Json };
use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

use crate::db::entity::transaction;
use crate::error::Result;

use super::AppState;

#[derive(Deserialize)]
pub struct TransactionQueryParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize)]
pub struct WithdrawRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn get_user_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(params): Query<TransactionQueryParams>
) -> Result<Json<Vec<TransactionResponse>>> {
    let transactions = state.transaction_service.get_user_transactions(
        user_id,
        params.limit,
        params.offset
    ).await?;

    let response: Vec<TransactionResponse> = transactions
        .into_iter()
        .map(|tx| tx.into())
        .collect();

    Ok(Json(response))
}

pub async fn withdraw(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    payload: std::result::Result<Json<WithdrawRequest>, JsonRejection>
) -> Result<(StatusCode, Json<TransactionResponse>)> {
    let Json(request) = payload?;

    let entry = state.transaction_service.withdraw(
        user_id,
        request.amount,
        request.description
    ).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i32,
    pub user_id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
    pub description: String,
    pub reference: Uuid,
    pub created_at: String,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(tx: transaction::Model) -> Self {
        Self {
            id: tx.id,
            user_id: tx.user_id,
            kind: tx.kind,
            amount: tx.amount,
            description: tx.description,
            reference: tx.reference,
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}
