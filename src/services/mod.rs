pub mod plan_service;
pub mod user_service;
pub mod investment_service;
pub mod transaction_service;
pub mod portfolio_service;
pub mod payment_service;

pub use plan_service::PlanService;
pub use user_service::UserService;
pub use investment_service::InvestmentService;
pub use transaction_service::TransactionService;
pub use portfolio_service::PortfolioService;
pub use payment_service::PaymentService;
