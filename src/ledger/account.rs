//! Checking account with an overdraft limit

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::config::LimitReductionPolicy;
use crate::ledger::limit::CreditLimit;
use crate::ledger::transfer;
use crate::types::*;
use crate::utils::{format_amount, validate_positive_amount};

/// A checking account.
///
/// `balance` may go negative, but only while the overdraft limit is drawn:
/// a negative balance always mirrors the used part of the limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    holder_name: String,
    fiscal_id: String,
    routing_code: String,
    account_number: String,
    balance: BigDecimal,
    limit: CreditLimit,
    history: Vec<HistoryEntry>,
    cards: BTreeSet<String>,
}

impl Account {
    /// Open an account with zero balance and zero limit.
    ///
    /// The identity strings are opaque; their format is the caller's concern.
    pub fn new(
        id: AccountId,
        holder_name: impl Into<String>,
        fiscal_id: impl Into<String>,
        routing_code: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            id,
            holder_name: holder_name.into(),
            fiscal_id: fiscal_id.into(),
            routing_code: routing_code.into(),
            account_number: account_number.into(),
            balance: BigDecimal::zero(),
            limit: CreditLimit::zero(),
            history: Vec::new(),
            cards: BTreeSet::new(),
        }
    }

    /// Handle the bank uses for this account
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Name of the account holder
    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    /// Holder's fiscal identifier, as given at opening
    pub fn fiscal_id(&self) -> &str {
        &self.fiscal_id
    }

    /// Branch or routing code
    pub fn routing_code(&self) -> &str {
        &self.routing_code
    }

    /// Account number within the branch
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Current balance; negative only while the overdraft is drawn
    pub fn balance(&self) -> &BigDecimal {
        &self.balance
    }

    /// Overdraft limit
    pub fn limit(&self) -> &CreditLimit {
        &self.limit
    }

    /// Ledger entries, oldest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Card numbers bound to this account
    pub fn cards(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(String::as_str)
    }

    /// Money that can still leave the account: positive balance plus unused limit
    pub fn total_available(&self) -> BigDecimal {
        let cash = if self.balance > BigDecimal::zero() {
            self.balance.clone()
        } else {
            BigDecimal::zero()
        };
        cash + self.limit.available()
    }

    /// Snapshot of balance and limit figures
    pub fn status(&self) -> AccountStatus {
        AccountStatus {
            holder_name: self.holder_name.clone(),
            account_number: self.account_number.clone(),
            balance: self.balance.clone(),
            limit_max: self.limit.max().clone(),
            limit_available: self.limit.available().clone(),
            total_available: self.total_available(),
        }
    }

    /// Holder details plus the full history
    pub fn statement(&self) -> AccountStatement {
        AccountStatement {
            holder_name: self.holder_name.clone(),
            account_number: self.account_number.clone(),
            entries: self.history.clone(),
        }
    }

    /// Deposit money, repaying any drawn limit before the balance grows
    pub fn deposit(&mut self, value: &BigDecimal, at: DateTime<Utc>) -> BankResult<HistoryEntry> {
        validate_positive_amount(value)?;

        self.apply_deposit(value);
        let entry = self.record(
            EntryKind::Deposit,
            format!("Deposit: {}", format_amount(value)),
            at,
        );
        info!(account = %self.id, value = %value, balance = %self.balance, "deposit applied");
        Ok(entry)
    }

    /// Withdraw money, drawing on the limit once the balance runs out
    pub fn withdraw(&mut self, value: &BigDecimal, at: DateTime<Utc>) -> BankResult<HistoryEntry> {
        validate_positive_amount(value)?;

        self.apply_withdrawal(value)?;
        let entry = self.record(
            EntryKind::Withdrawal,
            format!("Withdrawal: -{}", format_amount(value)),
            at,
        );
        info!(account = %self.id, value = %value, balance = %self.balance, "withdrawal applied");
        Ok(entry)
    }

    /// Change the overdraft ceiling
    pub fn update_limit(
        &mut self,
        new_max: BigDecimal,
        policy: LimitReductionPolicy,
    ) -> BankResult<()> {
        self.limit.update(new_max, policy)?;
        info!(
            account = %self.id,
            limit_max = %self.limit.max(),
            limit_available = %self.limit.available(),
            "account limit updated"
        );
        Ok(())
    }

    /// Move `value` to `destination`: withdrawal here, then deposit there
    pub fn transfer(
        &mut self,
        value: &BigDecimal,
        destination: &mut Account,
        at: DateTime<Utc>,
    ) -> BankResult<TransferReceipt> {
        transfer::execute(self, destination, value, at)
    }

    /// Deposit rule without history. Cannot fail.
    pub(crate) fn apply_deposit(&mut self, value: &BigDecimal) {
        if self.limit.is_drawn() {
            let used = self.limit.used();
            if *value > used {
                let cash = if self.balance > BigDecimal::zero() {
                    self.balance.clone()
                } else {
                    BigDecimal::zero()
                };
                self.balance = cash + (value - &used);
                self.limit.restore();
            } else {
                self.limit.repay(value);
                if self.balance < BigDecimal::zero() {
                    self.balance += value;
                }
            }
        } else {
            self.balance += value;
        }
    }

    /// Withdrawal rule without history. Refusal leaves the account untouched.
    pub(crate) fn apply_withdrawal(&mut self, value: &BigDecimal) -> BankResult<()> {
        if &self.balance - value >= BigDecimal::zero() {
            self.balance -= value;
            return Ok(());
        }

        let available = self.total_available();
        if *value > available {
            warn!(account = %self.id, value = %value, available = %available, "withdrawal refused");
            return Err(BankError::InsufficientFunds { available });
        }

        let shortfall = if self.balance > BigDecimal::zero() {
            value - &self.balance
        } else {
            value.clone()
        };
        self.limit.draw(&shortfall);
        self.balance -= value;
        Ok(())
    }

    pub(crate) fn record(
        &mut self,
        kind: EntryKind,
        label: String,
        at: DateTime<Utc>,
    ) -> HistoryEntry {
        let entry = HistoryEntry::new(kind, label, self.balance.clone(), at);
        self.history.push(entry.clone());
        entry
    }

    pub(crate) fn register_card(&mut self, card_number: &str) {
        self.cards.insert(card_number.to_string());
    }

    #[cfg(test)]
    pub(crate) fn with_state(mut self, balance: BigDecimal, limit: CreditLimit) -> Self {
        self.balance = balance;
        self.limit = limit;
        self
    }
}
