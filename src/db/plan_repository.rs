use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};

use crate::db::entity::{ investment_plan, InvestmentPlan };
use crate::error::{ AppError, Result };

pub struct PlanRepository {
    db: Arc<DatabaseConnection>,
}

impl PlanRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_active(&self) -> Result<Vec<investment_plan::Model>> {
        let plans = InvestmentPlan::find()
            .filter(investment_plan::Column::IsActive.eq(true))
            .order_by_asc(investment_plan::Column::Id)
            .all(self.db.as_ref()).await?;

        Ok(plans)
    }

    /// Every plan, including deactivated ones still referenced by investments.
    pub async fn find_all(&self) -> Result<Vec<investment_plan::Model>> {
        let plans = InvestmentPlan::find()
            .order_by_asc(investment_plan::Column::Id)
            .all(self.db.as_ref()).await?;

        Ok(plans)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<investment_plan::Model> {
        InvestmentPlan::find_by_id(id)
            .one(self.db.as_ref()).await?
            .ok_or_else(|| AppError::NotFound(format!("Investment plan {} not found", id)))
    }

    pub async fn deactivate(&self, id: i32) -> Result<investment_plan::Model> {
        let plan = self.find_by_id(id).await?;
        if !plan.is_active {
            return Ok(plan);
        }

        let mut model: investment_plan::ActiveModel = plan.into();
        model.is_active = Set(false);
        let plan = model.update(self.db.as_ref()).await?;

        Ok(plan)
    }
}
