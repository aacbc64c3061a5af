//! Credit card with a spending limit independent from its account

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::config::LimitReductionPolicy;
use crate::ledger::limit::CreditLimit;
use crate::ledger::Account;
use crate::types::*;
use crate::utils::{validate_password, validate_positive_amount};

/// Generated identity of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardIdentity {
    pub number: String,
    pub security_code: String,
}

/// A credit card bound to one account.
///
/// Charges only ever consume the card's own limit; the account's balance and
/// overdraft are never touched. Nothing but [`Card::update_limit`] gives
/// spent limit back.
#[derive(Clone, PartialEq)]
pub struct Card {
    number: String,
    titular: String,
    expiry: CardExpiry,
    security_code: String,
    account_id: AccountId,
    account_number: String,
    limit: CreditLimit,
    password: String,
    history: Vec<HistoryEntry>,
}

impl Card {
    /// Issue a card against `account` and register it in the account's card set
    pub fn issue(
        identity: CardIdentity,
        titular: impl Into<String>,
        account: &mut Account,
        password: impl Into<String>,
        initial_limit: BigDecimal,
        validity_years: u32,
        issued_at: DateTime<Utc>,
    ) -> BankResult<Self> {
        let password = password.into();
        validate_password(&password)?;

        let card = Self {
            number: identity.number,
            titular: titular.into(),
            expiry: expiry_from(issued_at, validity_years),
            security_code: identity.security_code,
            account_id: account.id(),
            account_number: account.account_number().to_string(),
            limit: CreditLimit::new(initial_limit),
            password,
            history: Vec::new(),
        };
        account.register_card(&card.number);
        info!(card = %card.number, account = %card.account_id, "card issued");
        Ok(card)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn titular(&self) -> &str {
        &self.titular
    }

    pub fn expiry(&self) -> CardExpiry {
        self.expiry
    }

    pub fn security_code(&self) -> &str {
        &self.security_code
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn limit(&self) -> &CreditLimit {
        &self.limit
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn authenticate(&self, password: &str) -> bool {
        self.password == password
    }

    fn require(&self, password: &str) -> BankResult<()> {
        if self.authenticate(password) {
            Ok(())
        } else {
            warn!(card = %self.number, "card authentication failed");
            Err(BankError::AuthenticationFailed)
        }
    }

    pub fn status(&self, password: &str) -> BankResult<CardStatus> {
        self.require(password)?;
        Ok(CardStatus {
            limit_max: self.limit.max().clone(),
            limit_available: self.limit.available().clone(),
        })
    }

    pub fn invoice(&self) -> CardInvoice {
        CardInvoice {
            card_number: self.number.clone(),
            titular: self.titular.clone(),
            account_number: self.account_number.clone(),
            entries: self.history.clone(),
        }
    }

    pub fn update_limit(
        &mut self,
        new_max: BigDecimal,
        policy: LimitReductionPolicy,
    ) -> BankResult<()> {
        self.limit.update(new_max, policy)?;
        info!(
            card = %self.number,
            limit_max = %self.limit.max(),
            limit_available = %self.limit.available(),
            "card limit updated"
        );
        Ok(())
    }

    /// Spend `value` against the card limit
    pub fn charge(
        &mut self,
        value: &BigDecimal,
        description: impl Into<String>,
        password: &str,
        at: DateTime<Utc>,
    ) -> BankResult<HistoryEntry> {
        self.require(password)?;
        validate_positive_amount(value)?;

        if self.limit.available() - value < BigDecimal::zero() {
            let available = self.limit.available().clone();
            warn!(card = %self.number, value = %value, available = %available, "charge refused");
            return Err(BankError::InsufficientLimit { available });
        }

        self.limit.draw(value);
        let entry = HistoryEntry::new(EntryKind::Charge, description, value.clone(), at);
        self.history.push(entry.clone());
        info!(card = %self.number, value = %value, "charge applied");
        Ok(entry)
    }

    /// Replace the password; must be exactly four digits
    pub fn set_password(&mut self, new_password: &str) -> BankResult<()> {
        validate_password(new_password)?;
        self.password = new_password.to_string();
        Ok(())
    }

    /// Replace the password after checking the current one
    pub fn change_password(&mut self, current: &str, new_password: &str) -> BankResult<()> {
        self.require(current)?;
        self.set_password(new_password)?;
        info!(card = %self.number, "card password changed");
        Ok(())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("number", &self.number)
            .field("titular", &self.titular)
            .field("expiry", &self.expiry)
            .field("account_id", &self.account_id)
            .field("limit", &self.limit)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

fn expiry_from(issued_at: DateTime<Utc>, validity_years: u32) -> CardExpiry {
    let years = i32::try_from(validity_years).unwrap_or(i32::MAX);
    CardExpiry {
        month: issued_at.month(),
        year: issued_at.year().saturating_add(years),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn amount(n: i64) -> BigDecimal {
        BigDecimal::from(n)
    }

    fn issue_with_limit(limit: i64) -> (Account, Card) {
        let mut account = Account::new(AccountId::new(), "Adão Vieira", "965.962.267-54", "123", "76214");
        let card = Card::issue(
            CardIdentity {
                number: "4000123412341234".to_string(),
                security_code: "042".to_string(),
            },
            "Adão Vieira",
            &mut account,
            "5525",
            amount(limit),
            4,
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap(),
        )
        .unwrap();
        (account, card)
    }

    #[test]
    fn test_issue_registers_card_and_computes_expiry() {
        let (account, card) = issue_with_limit(1);

        assert_eq!(account.cards().collect::<Vec<_>>(), vec!["4000123412341234"]);
        assert_eq!(card.account_id(), account.id());
        assert_eq!(card.expiry(), CardExpiry { month: 2, year: 2028 });
        assert_eq!(card.security_code(), "042");
        assert_eq!(card.limit().max(), &amount(1));
    }

    #[test]
    fn test_issue_rejects_malformed_password() {
        let mut account = Account::new(AccountId::new(), "Ana", "1", "1", "1");
        let result = Card::issue(
            CardIdentity {
                number: "4000123412341234".to_string(),
                security_code: "042".to_string(),
            },
            "Ana",
            &mut account,
            "12a4",
            amount(0),
            4,
            Utc::now(),
        );
        assert!(matches!(result, Err(BankError::InvalidPassword(_))));
        assert_eq!(account.cards().count(), 0);
    }

    #[test]
    fn test_charge_refusal_and_exact_limit() {
        let (_, mut card) = issue_with_limit(10);

        let err = card
            .charge(&amount(15), "Notebook", "5525", Utc::now())
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientLimit { .. }));
        assert_eq!(card.limit().available(), &amount(10));
        assert!(card.history().is_empty());

        let entry = card.charge(&amount(10), "Notebook", "5525", Utc::now()).unwrap();
        assert_eq!(card.limit().available(), &amount(0));
        assert_eq!(entry.kind, EntryKind::Charge);
        assert_eq!(entry.label, "Notebook");
        assert_eq!(entry.amount, amount(10));
        assert_eq!(card.history().len(), 1);
    }

    #[test]
    fn test_wrong_password_blocks_status_and_charge() {
        let (_, mut card) = issue_with_limit(100);

        assert!(matches!(card.status("0000"), Err(BankError::AuthenticationFailed)));
        assert!(matches!(
            card.charge(&amount(5), "Coffee", "0000", Utc::now()),
            Err(BankError::AuthenticationFailed)
        ));
        assert_eq!(card.limit().available(), &amount(100));

        let status = card.status("5525").unwrap();
        assert_eq!(status.limit_max, amount(100));
        assert_eq!(status.limit_available, amount(100));
    }

    #[test]
    fn test_set_password_format_rule() {
        let (_, mut card) = issue_with_limit(1);

        assert!(matches!(card.set_password("abc1"), Err(BankError::InvalidPassword(_))));
        assert!(matches!(card.set_password("12345"), Err(BankError::InvalidPassword(_))));
        assert!(card.authenticate("5525"));

        card.set_password("1234").unwrap();
        assert!(card.authenticate("1234"));
        assert!(!card.authenticate("5525"));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let (_, card) = issue_with_limit(1);
        let debug = format!("{card:?}");
        assert!(debug.contains("4000123412341234"));
        assert!(!debug.contains("password"));
        assert!(!debug.contains("security_code"));
    }

    #[test]
    fn test_change_password_requires_current() {
        let (_, mut card) = issue_with_limit(1);

        assert!(matches!(
            card.change_password("9999", "1234"),
            Err(BankError::AuthenticationFailed)
        ));
        assert!(matches!(
            card.change_password("5525", "12"),
            Err(BankError::InvalidPassword(_))
        ));
        assert!(card.authenticate("5525"));

        card.change_password("5525", "1234").unwrap();
        assert!(card.authenticate("1234"));
    }

    #[test]
    fn test_spent_limit_only_returns_through_limit_update() {
        let (_, mut card) = issue_with_limit(1);
        card.update_limit(amount(5000), LimitReductionPolicy::AllowNegative)
            .unwrap();
        card.charge(&amount(3500), "compra notebook", "5525", Utc::now())
            .unwrap();
        assert_eq!(card.limit().available(), &amount(1500));

        card.update_limit(amount(6000), LimitReductionPolicy::AllowNegative)
            .unwrap();
        assert_eq!(card.limit().available(), &amount(2500));

        let invoice = card.invoice();
        assert_eq!(invoice.account_number, "76214");
        assert_eq!(invoice.entries.len(), 1);
    }
}
