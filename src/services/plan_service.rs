use std::sync::Arc;

use crate::db::{ entity::investment_plan, PlanRepository };
use crate::error::Result;

pub struct PlanService {
    plan_repo: Arc<PlanRepository>,
}

impl PlanService {
    pub fn new(plan_repo: Arc<PlanRepository>) -> Self {
        Self { plan_repo }
    }

    pub async fn list_active(&self) -> Result<Vec<investment_plan::Model>> {
        self.plan_repo.find_active().await
    }

    pub async fn get(&self, id: i32) -> Result<investment_plan::Model> {
        self.plan_repo.find_by_id(id).await
    }

    /// Plans are never deleted; they stop accepting new investments instead.
    pub async fn deactivate(&self, id: i32) -> Result<investment_plan::Model> {
        let plan = self.plan_repo.deactivate(id).await?;
        tracing::info!("Investment plan {} ({}) deactivated", plan.id, plan.name);
        Ok(plan)
    }
}
