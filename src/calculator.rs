//! Simple (non-compounding) annualized return estimates.

use rust_decimal::{ Decimal, RoundingStrategy };
use serde::{ Deserialize, Serialize };

use crate::error::{ AppError, Result };

const DAYS_PER_YEAR: i64 = 365;
const CURRENCY_DP: u32 = 2;

/// Rate and duration of a plan, as far as the calculator cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTerms {
    /// Annual percentage yield, e.g. `12.5` for 12.5%.
    pub rate: Decimal,
    pub duration_days: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Returns {
    pub estimated_return: Decimal,
    pub total_return: Decimal,
}

/// Round to cents, ties away from zero (half-up for the positive amounts we deal in).
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Stored balances hold whole cents; anything finer would be rounded away per column.
pub fn ensure_cents(field: &str, amount: Decimal) -> Result<()> {
    if amount.normalize().scale() > CURRENCY_DP {
        return Err(AppError::invalid(field, "Amount cannot have more than two decimal places"));
    }
    Ok(())
}

/// `estimated = amount * rate/100 * days/365`, rounded to cents; `total = amount + estimated`.
pub fn calculate(amount: Decimal, terms: &PlanTerms) -> Result<Returns> {
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid("amount", "Amount must be greater than zero"));
    }
    if terms.rate < Decimal::ZERO {
        return Err(AppError::invalid("rate", "Rate cannot be negative"));
    }
    if terms.duration_days <= 0 {
        return Err(AppError::invalid("durationDays", "Duration must be at least one day"));
    }

    // Multiply first, divide once: no intermediate rounding.
    let numerator = amount
        .checked_mul(terms.rate)
        .and_then(|v| v.checked_mul(Decimal::from(terms.duration_days)))
        .ok_or_else(|| AppError::invalid("amount", "Amount is too large"))?;
    let estimated_return = round_currency(numerator / Decimal::from(100 * DAYS_PER_YEAR));

    let total_return = amount
        .checked_add(estimated_return)
        .ok_or_else(|| AppError::invalid("amount", "Amount is too large"))?;

    Ok(Returns {
        estimated_return,
        total_return,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn terms(rate: &str, duration_days: i32) -> PlanTerms {
        PlanTerms { rate: dec(rate), duration_days }
    }

    #[test]
    fn test_ensure_cents() {
        assert!(ensure_cents("amount", dec("100.01")).is_ok());
        assert!(ensure_cents("amount", dec("100.010")).is_ok());
        assert!(ensure_cents("amount", dec("100")).is_ok());

        let err = ensure_cents("amount", dec("100.005")).unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_thirty_day_plan() {
        let returns = calculate(dec("1000"), &terms("12.5", 30)).unwrap();
        assert_eq!(returns.estimated_return, dec("10.27"));
        assert_eq!(returns.total_return, dec("1010.27"));
    }

    #[test]
    fn test_full_year_is_the_rate() {
        let returns = calculate(dec("2500.00"), &terms("8", 365)).unwrap();
        assert_eq!(returns.estimated_return, dec("200.00"));
        assert_eq!(returns.total_return, dec("2700.00"));
    }

    #[test]
    fn test_rounds_half_up() {
        // 100 * 1.825 * 365 / 36500 = 1.825 exactly
        let returns = calculate(dec("100"), &terms("1.825", 365)).unwrap();
        assert_eq!(returns.estimated_return, dec("1.83"));
    }

    #[test]
    fn test_zero_rate_returns_principal() {
        let returns = calculate(dec("750.50"), &terms("0", 90)).unwrap();
        assert_eq!(returns.estimated_return, Decimal::ZERO);
        assert_eq!(returns.total_return, dec("750.50"));
    }

    #[test]
    fn test_rejects_zero_amount() {
        let err = calculate(Decimal::ZERO, &terms("12.5", 30)).unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let err = calculate(dec("100"), &terms("-1", 30)).unwrap_err();
        assert_eq!(err.field(), Some("rate"));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let err = calculate(dec("100"), &terms("5", 0)).unwrap_err();
        assert_eq!(err.field(), Some("durationDays"));
    }

    #[test]
    fn test_amount_checked_before_rate() {
        let err = calculate(dec("-5"), &terms("-1", 0)).unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_is_idempotent() {
        let t = terms("7.25", 180);
        let first = calculate(dec("4321.09"), &t).unwrap();
        let second = calculate(dec("4321.09"), &t).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_serializes_as_strings() {
        let returns = calculate(dec("1000"), &terms("12.5", 30)).unwrap();
        let json = serde_json::to_value(returns).unwrap();
        assert_eq!(json["estimatedReturn"], "10.27");
        assert_eq!(json["totalReturn"], "1010.27");
    }
}
