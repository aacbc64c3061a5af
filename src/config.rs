//! Bank configuration

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// What happens when a limit ceiling is lowered below the amount already used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitReductionPolicy {
    /// Apply the delta anyway; available limit goes negative
    #[default]
    AllowNegative,
    /// Refuse the update and leave the limit untouched
    Reject,
}

/// Tunables shared by every account and card of a [`Bank`](crate::Bank)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Spending limit a freshly issued card starts with
    pub initial_card_limit: BigDecimal,
    /// Years between issue and expiry; the month is kept
    pub card_validity_years: u32,
    /// How many times to ask the identity source for a fresh card number
    pub max_card_number_attempts: u32,
    pub limit_reduction_policy: LimitReductionPolicy,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            initial_card_limit: BigDecimal::from(1),
            card_validity_years: 4,
            max_card_number_attempts: 8,
            limit_reduction_policy: LimitReductionPolicy::AllowNegative,
        }
    }
}

impl BankConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> BankResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BankError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BankResult<()> {
        if self.initial_card_limit < BigDecimal::zero() {
            return Err(BankError::Config(
                "initial_card_limit cannot be negative".to_string(),
            ));
        }

        if self.max_card_number_attempts == 0 {
            return Err(BankError::Config(
                "max_card_number_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BankConfig::default();
        assert_eq!(config.initial_card_limit, BigDecimal::from(1));
        assert_eq!(config.card_validity_years, 4);
        assert_eq!(
            config.limit_reduction_policy,
            LimitReductionPolicy::AllowNegative
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BankConfig::from_json_str(r#"{"limit_reduction_policy": "reject"}"#).unwrap();
        assert_eq!(config.limit_reduction_policy, LimitReductionPolicy::Reject);
        assert_eq!(config.card_validity_years, 4);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            BankConfig::from_json_str("{not json"),
            Err(BankError::Config(_))
        ));
        assert!(matches!(
            BankConfig::from_json_str(r#"{"max_card_number_attempts": 0}"#),
            Err(BankError::Config(_))
        ));
    }
}
