use axum::{ extract::{ Path, State }, Json };

use crate::error::Result;
use crate::services::portfolio_service::Portfolio;

use super::AppState;

pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<i32>
) -> Result<Json<Portfolio>> {
    let portfolio = state.portfolio_service.get_portfolio(user_id).await?;

    Ok(Json(portfolio))
}
