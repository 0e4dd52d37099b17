use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_gateways")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// JSON array of ISO currency codes.
    pub currencies: Json,
    /// JSON array of accepted payment method types.
    pub method_types: Json,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub fee_type: String, // "percentage" or "fixed"
    pub fee_value: Decimal,
    pub config: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn supports_currency(&self, currency: &str) -> bool {
        json_strings(&self.currencies).any(|c| c.eq_ignore_ascii_case(currency))
    }

    pub fn accepts_method(&self, method_type: &str) -> bool {
        json_strings(&self.method_types).any(|m| m == method_type)
    }
}

fn json_strings(value: &Json) -> impl Iterator<Item = &str> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
}
