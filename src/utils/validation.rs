//! Validation utilities

use crate::types::*;
use bigdecimal::{BigDecimal, Zero};

/// Number of digits in a card password
pub const PASSWORD_LENGTH: usize = 4;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> BankResult<()> {
    if *amount <= BigDecimal::zero() {
        Err(BankError::InvalidAmount(format!(
            "Amount must be positive, got {amount}"
        )))
    } else {
        Ok(())
    }
}

/// Validate that a limit ceiling is not negative
pub fn validate_limit_ceiling(limit: &BigDecimal) -> BankResult<()> {
    if *limit < BigDecimal::zero() {
        return Err(BankError::InvalidLimit(format!(
            "Limit cannot be negative, got {limit}"
        )));
    }

    Ok(())
}

/// Validate a card password: exactly four ASCII digits
pub fn validate_password(password: &str) -> BankResult<()> {
    if password.chars().count() != PASSWORD_LENGTH {
        return Err(BankError::InvalidPassword(format!(
            "Password must have exactly {PASSWORD_LENGTH} digits"
        )));
    }

    if !password.chars().all(|c| c.is_ascii_digit()) {
        return Err(BankError::InvalidPassword(
            "Password can only contain digits".to_string(),
        ));
    }

    Ok(())
}
