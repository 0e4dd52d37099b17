pub mod user;
pub mod investment_plan;
pub mod investment;
pub mod transaction;
pub mod payment_gateway;
pub mod payment_method;

pub use user::Entity as User;
pub use investment_plan::Entity as InvestmentPlan;
pub use investment::Entity as Investment;
pub use transaction::Entity as Transaction;
pub use payment_gateway::Entity as PaymentGateway;
pub use payment_method::Entity as PaymentMethod;
