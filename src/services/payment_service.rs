use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ DatabaseConnection, TransactionTrait };
use serde::Serialize;

use crate::calculator::{ ensure_cents, round_currency };
use crate::db::entity::{ payment_gateway, payment_method };
use crate::db::{ NewPaymentMethod, PaymentRepository, UserRepository };
use crate::enums::FeeType;
use crate::error::{ AppError, Result };

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    pub gateway: String,
    pub currency: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub total: Decimal,
}

pub struct PaymentService {
    db: Arc<DatabaseConnection>,
    payment_repo: Arc<PaymentRepository>,
    user_repo: Arc<UserRepository>,
}

impl PaymentService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        payment_repo: Arc<PaymentRepository>,
        user_repo: Arc<UserRepository>
    ) -> Self {
        Self {
            db,
            payment_repo,
            user_repo,
        }
    }

    pub async fn list_gateways(&self) -> Result<Vec<payment_gateway::Model>> {
        self.payment_repo.find_active_gateways().await
    }

    pub async fn quote(&self, slug: &str, amount: Decimal, currency: &str) -> Result<FeeQuote> {
        let gateway = self.payment_repo.find_gateway(slug).await?;
        quote_fee(&gateway, amount, currency)
    }

    pub async fn list_methods(&self, user_id: i32) -> Result<Vec<payment_method::Model>> {
        self.user_repo.find_by_id(user_id).await?;
        self.payment_repo.find_methods(user_id).await
    }

    /// A user's first method becomes the default.
    pub async fn add_method(
        &self,
        user_id: i32,
        method: NewPaymentMethod
    ) -> Result<payment_method::Model> {
        validate_method(&method)?;

        let gateways = self.payment_repo.find_active_gateways().await?;
        if !gateways.iter().any(|g| g.accepts_method(method.method_type.as_str())) {
            return Err(
                AppError::invalid(
                    "type",
                    format!("No active gateway accepts {} payments", method.method_type)
                )
            );
        }

        // The user row lock serializes concurrent adds, so only one can claim the default.
        let txn = self.db.begin().await?;
        UserRepository::lock(&txn, user_id).await?;
        let is_default = !PaymentRepository::has_default(&txn, user_id).await?;
        let created = PaymentRepository::insert_method(&txn, user_id, method, is_default).await?;
        txn.commit().await?;

        tracing::info!("Payment method {} added for user {}", created.id, user_id);

        Ok(created)
    }

    /// Make `method_id` the user's only default method.
    pub async fn set_default(&self, user_id: i32, method_id: i32) -> Result<payment_method::Model> {
        let method = self.payment_repo.find_method(user_id, method_id).await?;
        if !method.is_active {
            return Err(AppError::invalid("methodId", "Payment method is no longer active"));
        }
        if method.is_default {
            return Ok(method);
        }

        let txn = self.db.begin().await?;
        UserRepository::lock(&txn, user_id).await?;
        PaymentRepository::clear_default(&txn, user_id).await?;
        PaymentRepository::mark_default(&txn, user_id, method_id).await?;
        txn.commit().await?;

        Ok(payment_method::Model {
            is_default: true,
            ..method
        })
    }
}

/// Fee for moving `amount` through `gateway`, rounded to cents.
pub fn quote_fee(
    gateway: &payment_gateway::Model,
    amount: Decimal,
    currency: &str
) -> Result<FeeQuote> {
    if !gateway.is_active {
        return Err(AppError::invalid("gateway", format!("{} is currently unavailable", gateway.name)));
    }

    let currency = currency.trim().to_uppercase();
    if !gateway.supports_currency(&currency) {
        return Err(
            AppError::invalid("currency", format!("{} does not support {}", gateway.name, currency))
        );
    }

    ensure_cents("amount", amount)?;
    if amount <= Decimal::ZERO || amount < gateway.min_amount || amount > gateway.max_amount {
        return Err(
            AppError::invalid(
                "amount",
                format!("Amount must be between {} and {}", gateway.min_amount, gateway.max_amount)
            )
        );
    }

    let fee = match gateway.fee_type.parse::<FeeType>()? {
        FeeType::Percentage => round_currency((amount * gateway.fee_value) / Decimal::from(100)),
        FeeType::Fixed => round_currency(gateway.fee_value),
    };

    Ok(FeeQuote {
        gateway: gateway.slug.clone(),
        currency,
        amount,
        fee,
        total: amount + fee,
    })
}

fn validate_method(method: &NewPaymentMethod) -> Result<()> {
    if let Some(last4) = &method.last4 {
        if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::invalid("last4", "last4 must be exactly four digits"));
        }
    }
    if let Some(month) = method.expiry_month {
        if !(1..=12).contains(&month) {
            return Err(AppError::invalid("expiryMonth", "Expiry month must be between 1 and 12"));
        }
    }
    Ok(())
}
