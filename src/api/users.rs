use axum::{ extract::{ Path, State }, Json };
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;

use super::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub balance: Decimal,
    pub created_at: String,
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>
) -> Result<Json<UserResponse>> {
    let user = state.user_service.get_user(user_id).await?;

    Ok(
        Json(UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            balance: user.balance,
            created_at: user.created_at.to_rfc3339(),
        })
    )
}
