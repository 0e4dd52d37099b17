use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Annual percentage yield, in percent.
    pub rate: Decimal,
    pub duration_days: i32,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investment::Entity")]
    Investment,
}

impl Related<super::investment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn terms(&self) -> crate::calculator::PlanTerms {
        crate::calculator::PlanTerms {
            rate: self.rate,
            duration_days: self.duration_days,
        }
    }
}
