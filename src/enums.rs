use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{ Deserialize, Serialize };

use crate::error::AppError;

// ─── ApiMode ─────────────────────────────────────────────────────────

/// Which backend the API client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiMode {
    /// The application's own REST backend.
    Standalone,
    /// Hosted inside a WordPress page; uses the CMS REST conventions.
    Embedded,
}

impl ApiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMode::Standalone => "standalone",
            ApiMode::Embedded => "embedded",
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── InvestmentStatus ────────────────────────────────────────────────

/// Lifecycle of an investment. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Active,
    Completed,
    Cancelled,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Active => "active",
            InvestmentStatus::Completed => "completed",
            InvestmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvestmentStatus::Active)
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(InvestmentStatus::Active),
            "completed" => Ok(InvestmentStatus::Completed),
            "cancelled" | "canceled" => Ok(InvestmentStatus::Cancelled),
            _ => Err(AppError::invalid("status", format!("Invalid investment status: {}", s))),
        }
    }
}

// ─── TransactionKind ─────────────────────────────────────────────────

/// Ledger entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Investment,
    Profit,
    Withdrawal,
    Other,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Investment => "investment",
            TransactionKind::Profit => "profit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Other => "other",
        }
    }

    /// Debits leave the user's balance and are stored negative.
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionKind::Investment | TransactionKind::Withdrawal)
    }

    /// Apply the ledger sign convention to an amount.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        if self.is_debit() { -amount.abs() } else { amount }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "investment" => Ok(TransactionKind::Investment),
            "profit" => Ok(TransactionKind::Profit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            "other" => Ok(TransactionKind::Other),
            _ => Err(AppError::invalid("type", format!("Invalid transaction type: {}", s))),
        }
    }
}

// ─── PaymentMethodType ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    BankAccount,
    CryptoWallet,
    DigitalWallet,
}

impl PaymentMethodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethodType::Card => "card",
            PaymentMethodType::BankAccount => "bank_account",
            PaymentMethodType::CryptoWallet => "crypto_wallet",
            PaymentMethodType::DigitalWallet => "digital_wallet",
        }
    }
}

impl fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethodType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" => Ok(PaymentMethodType::Card),
            "bank_account" | "bank" => Ok(PaymentMethodType::BankAccount),
            "crypto_wallet" | "crypto" => Ok(PaymentMethodType::CryptoWallet),
            "digital_wallet" => Ok(PaymentMethodType::DigitalWallet),
            _ => Err(AppError::invalid(
                "type",
                format!(
                    "Invalid payment method type: {}. Supported: card, bank_account, crypto_wallet, digital_wallet",
                    s
                )
            )),
        }
    }
}

// ─── FeeType ─────────────────────────────────────────────────────────

/// How a gateway charges. Exactly one applies per gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    Percentage,
    Fixed,
}

impl FeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeType::Percentage => "percentage",
            FeeType::Fixed => "fixed",
        }
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percentage" | "percent" => Ok(FeeType::Percentage),
            "fixed" => Ok(FeeType::Fixed),
            _ => Err(AppError::invalid("feeType", format!("Invalid fee type: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_sign_convention() {
        let amount = Decimal::new(25000, 2);
        assert_eq!(TransactionKind::Withdrawal.signed(amount), Decimal::new(-25000, 2));
        assert_eq!(TransactionKind::Investment.signed(amount), Decimal::new(-25000, 2));
        assert_eq!(TransactionKind::Profit.signed(amount), amount);
        // already negative debits are not flipped back
        assert_eq!(TransactionKind::Withdrawal.signed(-amount), -amount);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("ACTIVE".parse::<InvestmentStatus>().unwrap(), InvestmentStatus::Active);
        assert!(InvestmentStatus::Completed.is_terminal());
        assert!("matured".parse::<InvestmentStatus>().is_err());
    }

    #[test]
    fn test_payment_method_type_roundtrip_strings() {
        for kind in [
            PaymentMethodType::Card,
            PaymentMethodType::BankAccount,
            PaymentMethodType::CryptoWallet,
            PaymentMethodType::DigitalWallet,
        ] {
            assert_eq!(kind.as_str().parse::<PaymentMethodType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_fee_type_rejects_unknown() {
        let err = "tiered".parse::<FeeType>().unwrap_err();
        assert_eq!(err.field(), Some("feeType"));
    }
}
