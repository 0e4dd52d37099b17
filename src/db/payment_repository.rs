use std::sync::Arc;

use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};

use crate::db::entity::{ payment_gateway, payment_method, PaymentGateway, PaymentMethod };
use crate::enums::PaymentMethodType;
use crate::error::{ AppError, Result };

#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
    pub method_type: PaymentMethodType,
    pub last4: Option<String>,
    pub brand: Option<String>,
    pub expiry_month: Option<i32>,
    pub expiry_year: Option<i32>,
}

pub struct PaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl PaymentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_active_gateways(&self) -> Result<Vec<payment_gateway::Model>> {
        let gateways = PaymentGateway::find()
            .filter(payment_gateway::Column::IsActive.eq(true))
            .order_by_asc(payment_gateway::Column::Id)
            .all(self.db.as_ref()).await?;

        Ok(gateways)
    }

    pub async fn find_gateway(&self, slug: &str) -> Result<payment_gateway::Model> {
        PaymentGateway::find()
            .filter(payment_gateway::Column::Slug.eq(slug))
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound(format!("Payment gateway '{}' not found", slug)))
    }

    pub async fn find_methods(&self, user_id: i32) -> Result<Vec<payment_method::Model>> {
        let methods = PaymentMethod::find()
            .filter(payment_method::Column::UserId.eq(user_id))
            .filter(payment_method::Column::IsActive.eq(true))
            .order_by_desc(payment_method::Column::IsDefault)
            .order_by_asc(payment_method::Column::Id)
            .all(self.db.as_ref()).await?;

        Ok(methods)
    }

    pub async fn find_method(&self, user_id: i32, id: i32) -> Result<payment_method::Model> {
        PaymentMethod::find_by_id(id)
            .filter(payment_method::Column::UserId.eq(user_id))
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound(format!("Payment method {} not found", id)))
    }

    /// Whether the user already has a default method, active or not.
    pub async fn has_default<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<bool> {
        let existing = PaymentMethod::find()
            .filter(payment_method::Column::UserId.eq(user_id))
            .filter(payment_method::Column::IsDefault.eq(true))
            .one(conn).await?;

        Ok(existing.is_some())
    }

    pub async fn insert_method<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        method: NewPaymentMethod,
        is_default: bool
    ) -> Result<payment_method::Model> {
        let model = payment_method::ActiveModel {
            user_id: Set(user_id),
            method_type: Set(method.method_type.to_string()),
            last4: Set(method.last4),
            brand: Set(method.brand),
            expiry_month: Set(method.expiry_month),
            expiry_year: Set(method.expiry_year),
            is_default: Set(is_default),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        Ok(model.insert(conn).await?)
    }

    pub async fn clear_default<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<()> {
        PaymentMethod::update_many()
            .col_expr(payment_method::Column::IsDefault, Expr::value(false))
            .filter(payment_method::Column::UserId.eq(user_id))
            .filter(payment_method::Column::IsDefault.eq(true))
            .exec(conn).await?;

        Ok(())
    }

    pub async fn mark_default<C: ConnectionTrait>(conn: &C, user_id: i32, id: i32) -> Result<()> {
        let result = PaymentMethod::update_many()
            .col_expr(payment_method::Column::IsDefault, Expr::value(true))
            .filter(payment_method::Column::Id.eq(id))
            .filter(payment_method::Column::UserId.eq(user_id))
            .exec(conn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Payment method {} not found", id)));
        }
        Ok(())
    }
}
