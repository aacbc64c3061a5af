//! Bank registry that owns every account and card and orchestrates operations
//!
//! Each account and each card sits behind its own mutex: balance, limit and
//! history of one entity change together or not at all. Transfers lock both
//! accounts in ascending [`AccountId`] order.

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::debug;

use crate::config::BankConfig;
use crate::ledger::{transfer, Account, Card, CardIdentity};
use crate::traits::*;
use crate::types::*;
use crate::utils::{RandomIdentitySource, SystemClock};

type Shared<T> = Arc<Mutex<T>>;

/// In-process bank: the entry point for callers that share accounts across threads
pub struct Bank {
    config: BankConfig,
    clock: Arc<dyn Clock>,
    identities: Arc<dyn IdentitySource>,
    accounts: RwLock<HashMap<AccountId, Shared<Account>>>,
    cards: RwLock<HashMap<String, Shared<Card>>>,
}

impl Bank {
    /// Create a bank with the wall clock and random card identities
    pub fn new(config: BankConfig) -> BankResult<Self> {
        Self::with_collaborators(config, Arc::new(SystemClock), Arc::new(RandomIdentitySource))
    }

    /// Create a bank with injected time and identity sources
    pub fn with_collaborators(
        config: BankConfig,
        clock: Arc<dyn Clock>,
        identities: Arc<dyn IdentitySource>,
    ) -> BankResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            identities,
            accounts: RwLock::new(HashMap::new()),
            cards: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    // Account operations
    /// Open an account with zero balance and zero limit
    pub fn open_account(
        &self,
        holder_name: &str,
        fiscal_id: &str,
        routing_code: &str,
        account_number: &str,
    ) -> BankResult<AccountId> {
        let id = AccountId::new();
        let account = Account::new(id, holder_name, fiscal_id, routing_code, account_number);
        self.accounts
            .write()
            .map_err(poisoned)?
            .insert(id, Arc::new(Mutex::new(account)));
        debug!(account = %id, "account opened");
        Ok(id)
    }

    /// Deposit into an account, stamped with the bank clock
    pub fn deposit(&self, account_id: AccountId, value: &BigDecimal) -> BankResult<HistoryEntry> {
        let account = self.account_handle(account_id)?;
        let mut account = lock(&account)?;
        account.deposit(value, self.clock.now())
    }

    /// Withdraw from an account, drawing on its overdraft if needed
    pub fn withdraw(&self, account_id: AccountId, value: &BigDecimal) -> BankResult<HistoryEntry> {
        let account = self.account_handle(account_id)?;
        let mut account = lock(&account)?;
        account.withdraw(value, self.clock.now())
    }

    /// Change an account's overdraft ceiling under the configured reduction policy
    pub fn update_account_limit(
        &self,
        account_id: AccountId,
        new_max: BigDecimal,
    ) -> BankResult<()> {
        let account = self.account_handle(account_id)?;
        let mut account = lock(&account)?;
        account.update_limit(new_max, self.config.limit_reduction_policy)
    }

    /// Move money between two different accounts
    pub fn transfer(
        &self,
        source: AccountId,
        destination: AccountId,
        value: &BigDecimal,
    ) -> BankResult<TransferReceipt> {
        if source == destination {
            return Err(BankError::SelfTransfer);
        }

        let source_handle = self.account_handle(source)?;
        let destination_handle = self.account_handle(destination)?;

        let (mut source_guard, mut destination_guard) = if source < destination {
            let s = lock(&source_handle)?;
            let d = lock(&destination_handle)?;
            (s, d)
        } else {
            let d = lock(&destination_handle)?;
            let s = lock(&source_handle)?;
            (s, d)
        };

        transfer::execute(
            &mut source_guard,
            &mut destination_guard,
            value,
            self.clock.now(),
        )
    }

    pub fn account_status(&self, account_id: AccountId) -> BankResult<AccountStatus> {
        self.with_account(account_id, Account::status)
    }

    pub fn account_statement(&self, account_id: AccountId) -> BankResult<AccountStatement> {
        self.with_account(account_id, Account::statement)
    }

    /// Card numbers bound to an account
    pub fn account_cards(&self, account_id: AccountId) -> BankResult<Vec<String>> {
        self.with_account(account_id, |account| {
            account.cards().map(str::to_string).collect()
        })
    }

    /// Run a read-only closure against an account under its lock
    pub fn with_account<T>(
        &self,
        account_id: AccountId,
        f: impl FnOnce(&Account) -> T,
    ) -> BankResult<T> {
        let account = self.account_handle(account_id)?;
        let account = lock(&account)?;
        Ok(f(&account))
    }

    // Card operations
    /// Issue a card bound to an existing account.
    ///
    /// Generated numbers are checked against every card already issued and
    /// regenerated on collision.
    pub fn issue_card(
        &self,
        account_id: AccountId,
        titular: &str,
        password: &str,
    ) -> BankResult<String> {
        let account = self.account_handle(account_id)?;
        let mut cards = self.cards.write().map_err(poisoned)?;

        let number = self.allocate_card_number(&cards)?;
        let identity = CardIdentity {
            number: number.clone(),
            security_code: self.identities.security_code(),
        };

        let mut account = lock(&account)?;
        let card = Card::issue(
            identity,
            titular,
            &mut account,
            password,
            self.config.initial_card_limit.clone(),
            self.config.card_validity_years,
            self.clock.now(),
        )?;
        cards.insert(number.clone(), Arc::new(Mutex::new(card)));
        Ok(number)
    }

    pub fn update_card_limit(&self, card_number: &str, new_max: BigDecimal) -> BankResult<()> {
        let card = self.card_handle(card_number)?;
        let mut card = lock(&card)?;
        card.update_limit(new_max, self.config.limit_reduction_policy)
    }

    pub fn charge(
        &self,
        card_number: &str,
        value: &BigDecimal,
        description: &str,
        password: &str,
    ) -> BankResult<HistoryEntry> {
        let card = self.card_handle(card_number)?;
        let mut card = lock(&card)?;
        card.charge(value, description, password, self.clock.now())
    }

    pub fn card_status(&self, card_number: &str, password: &str) -> BankResult<CardStatus> {
        self.with_card(card_number, |card| card.status(password))?
    }

    pub fn change_card_password(
        &self,
        card_number: &str,
        current: &str,
        new_password: &str,
    ) -> BankResult<()> {
        let card = self.card_handle(card_number)?;
        let mut card = lock(&card)?;
        card.change_password(current, new_password)
    }

    pub fn card_invoice(&self, card_number: &str) -> BankResult<CardInvoice> {
        self.with_card(card_number, Card::invoice)
    }

    /// Run a read-only closure against a card under its lock
    pub fn with_card<T>(&self, card_number: &str, f: impl FnOnce(&Card) -> T) -> BankResult<T> {
        let card = self.card_handle(card_number)?;
        let card = lock(&card)?;
        Ok(f(&card))
    }

    fn allocate_card_number(&self, issued: &HashMap<String, Shared<Card>>) -> BankResult<String> {
        let attempts = self.config.max_card_number_attempts;
        for attempt in 1..=attempts {
            let number = self.identities.card_number();
            if !issued.contains_key(&number) {
                return Ok(number);
            }
            debug!(attempt, "card number collision, regenerating");
        }
        Err(BankError::CardNumberExhausted { attempts })
    }

    fn account_handle(&self, account_id: AccountId) -> BankResult<Shared<Account>> {
        self.accounts
            .read()
            .map_err(poisoned)?
            .get(&account_id)
            .cloned()
            .ok_or(BankError::AccountNotFound(account_id))
    }

    fn card_handle(&self, card_number: &str) -> BankResult<Shared<Card>> {
        self.cards
            .read()
            .map_err(poisoned)?
            .get(card_number)
            .cloned()
            .ok_or_else(|| BankError::CardNotFound(card_number.to_string()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> BankResult<MutexGuard<'_, T>> {
    mutex.lock().map_err(poisoned)
}

fn poisoned<E: std::fmt::Display>(err: E) -> BankError {
    BankError::Concurrency(err.to_string())
}
