use axum::{ extract::{ rejection::JsonRejection, Path, State }, http::StatusCode, Json };
use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };

use crate::db::entity::{ payment_gateway, payment_method };
use crate::db::NewPaymentMethod;
use crate::enums::PaymentMethodType;
use crate::error::Result;
use crate::services::payment_service::FeeQuote;

use super::AppState;

/// Display metadata only; provider configuration never leaves the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub currencies: serde_json::Value,
    pub method_types: serde_json::Value,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub fee_type: String,
    pub fee_value: Decimal,
}

impl From<payment_gateway::Model> for GatewayResponse {
    fn from(g: payment_gateway::Model) -> Self {
        Self {
            slug: g.slug,
            name: g.name,
            description: g.description,
            currencies: g.currencies,
            method_types: g.method_types,
            min_amount: g.min_amount,
            max_amount: g.max_amount,
            fee_type: g.fee_type,
            fee_value: g.fee_value,
        }
    }
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentMethodRequest {
    #[serde(rename = "type")]
    pub method_type: String,
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub expiry_month: Option<i32>,
    #[serde(default)]
    pub expiry_year: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodResponse {
    pub id: i32,
    #[serde(rename = "type")]
    pub method_type: String,
    pub last4: Option<String>,
    pub brand: Option<String>,
    pub expiry_month: Option<i32>,
    pub expiry_year: Option<i32>,
    pub is_default: bool,
}

impl From<payment_method::Model> for PaymentMethodResponse {
    fn from(m: payment_method::Model) -> Self {
        Self {
            id: m.id,
            method_type: m.method_type,
            last4: m.last4,
            brand: m.brand,
            expiry_month: m.expiry_month,
            expiry_year: m.expiry_year,
            is_default: m.is_default,
        }
    }
}

pub async fn list_gateways(State(state): State<AppState>) -> Result<Json<Vec<GatewayResponse>>> {
    let gateways = state.payment_service.list_gateways().await?;

    Ok(Json(gateways.into_iter().map(GatewayResponse::from).collect()))
}

pub async fn quote_payment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>
) -> Result<Json<FeeQuote>> {
    let Json(request) = payload?;

    let quote = state.payment_service.quote(&slug, request.amount, &request.currency).await?;

    Ok(Json(quote))
}

pub async fn list_payment_methods(
    State(state): State<AppState>,
    Path(user_id): Path<i32>
) -> Result<Json<Vec<PaymentMethodResponse>>> {
    let methods = state.payment_service.list_methods(user_id).await?;

    Ok(Json(methods.into_iter().map(PaymentMethodResponse::from).collect()))
}

pub async fn add_payment_method(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    payload: std::result::Result<Json<AddPaymentMethodRequest>, JsonRejection>
) -> Result<(StatusCode, Json<PaymentMethodResponse>)> {
    let Json(request) = payload?;

    let method_type: PaymentMethodType = request.method_type.parse()?;

    let method = state.payment_service.add_method(user_id, NewPaymentMethod {
        method_type,
        last4: request.last4,
        brand: request.brand,
        expiry_month: request.expiry_month,
        expiry_year: request.expiry_year,
    }).await?;

    Ok((StatusCode::CREATED, Json(method.into())))
}

pub async fn set_default_payment_method(
    State(state): State<AppState>,
    Path((user_id, method_id)): Path<(i32, i32)>
) -> Result<Json<PaymentMethodResponse>> {
    let method = state.payment_service.set_default(user_id, method_id).await?;

    Ok(Json(method.into()))
}
