//! Limit ceiling and its unused portion, shared by accounts and cards

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::LimitReductionPolicy;
use crate::types::*;
use crate::utils::validate_limit_ceiling;

/// A `(max, available)` pair. `used = max - available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLimit {
    max: BigDecimal,
    available: BigDecimal,
}

impl CreditLimit {
    pub fn new(max: BigDecimal) -> Self {
        Self {
            available: max.clone(),
            max,
        }
    }

    pub fn zero() -> Self {
        Self::new(BigDecimal::zero())
    }

    pub fn max(&self) -> &BigDecimal {
        &self.max
    }

    pub fn available(&self) -> &BigDecimal {
        &self.available
    }

    pub fn used(&self) -> BigDecimal {
        &self.max - &self.available
    }

    pub fn is_drawn(&self) -> bool {
        self.available < self.max
    }

    /// Move the ceiling, shifting `available` by the same delta
    pub fn update(
        &mut self,
        new_max: BigDecimal,
        policy: LimitReductionPolicy,
    ) -> BankResult<()> {
        validate_limit_ceiling(&new_max)?;

        let delta = &new_max - &self.max;
        let available = &self.available + &delta;
        if available < BigDecimal::zero() {
            match policy {
                LimitReductionPolicy::Reject => {
                    return Err(BankError::InvalidLimit(format!(
                        "New limit {new_max} is below the {} already in use",
                        self.used()
                    )));
                }
                LimitReductionPolicy::AllowNegative => {
                    warn!(
                        new_max = %new_max,
                        used = %self.used(),
                        available = %available,
                        "limit lowered below usage, available limit is negative"
                    );
                }
            }
        }

        self.max = new_max;
        self.available = available;
        Ok(())
    }

    pub(crate) fn draw(&mut self, value: &BigDecimal) {
        self.available -= value;
    }

    pub(crate) fn repay(&mut self, value: &BigDecimal) {
        self.available += value;
    }

    pub(crate) fn restore(&mut self) {
        self.available = self.max.clone();
    }

    #[cfg(test)]
    pub(crate) fn from_parts(max: BigDecimal, available: BigDecimal) -> Self {
        Self { max, available }
    }
}

impl Default for CreditLimit {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(n: i64) -> BigDecimal {
        BigDecimal::from(n)
    }

    #[test]
    fn test_raise_and_lower_shift_available_by_delta() {
        let mut limit = CreditLimit::new(amount(1000));
        limit.draw(&amount(300));

        limit
            .update(amount(1500), LimitReductionPolicy::AllowNegative)
            .unwrap();
        assert_eq!(limit.max(), &amount(1500));
        assert_eq!(limit.available(), &amount(1200));

        limit
            .update(amount(500), LimitReductionPolicy::AllowNegative)
            .unwrap();
        assert_eq!(limit.available(), &amount(200));
        assert_eq!(limit.used(), amount(300));
    }

    #[test]
    fn test_lowering_below_usage_allows_negative_by_default() {
        let mut limit = CreditLimit::new(amount(1000));
        limit.draw(&amount(600));

        limit
            .update(amount(400), LimitReductionPolicy::AllowNegative)
            .unwrap();
        assert_eq!(limit.available(), &amount(-200));
        assert_eq!(limit.used(), amount(600));
    }

    #[test]
    fn test_reject_policy_leaves_limit_untouched() {
        let mut limit = CreditLimit::new(amount(1000));
        limit.draw(&amount(600));

        let err = limit
            .update(amount(400), LimitReductionPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, BankError::InvalidLimit(_)));
        assert_eq!(limit.max(), &amount(1000));
        assert_eq!(limit.available(), &amount(400));
    }

    #[test]
    fn test_negative_ceiling_is_rejected() {
        let mut limit = CreditLimit::zero();
        assert!(limit
            .update(amount(-10), LimitReductionPolicy::AllowNegative)
            .is_err());
        assert_eq!(limit, CreditLimit::zero());
    }
}
