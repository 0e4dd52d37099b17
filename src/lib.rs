pub mod config;
pub mod enums;
pub mod error;
pub mod calculator;
pub mod environment;
pub mod client;
pub mod db;
pub mod services;
pub mod api;
pub mod maturity_checker;

pub use config::Config;
pub use enums::{ ApiMode, InvestmentStatus, TransactionKind, PaymentMethodType, FeeType };
pub use error::{ AppError, ApiError, Result };
pub use environment::{ EnvironmentConfig, EnvironmentResolver };
pub use client::{ ApiClient, LogicalOperation };
