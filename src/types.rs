//! Core types and data structures for the banking ledger

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque handle for an account.
///
/// Handles are totally ordered; the [`Bank`](crate::Bank) relies on that order
/// when it has to lock two accounts at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing uuid
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying uuid
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of operation produced a history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Plain deposit into an account
    Deposit,
    /// Plain withdrawal from an account
    Withdrawal,
    /// Outgoing transfer leg, tagged with the receiving account
    TransferOut { to: AccountId },
    /// Incoming transfer leg, tagged with the paying account
    TransferIn { from: AccountId },
    /// Card purchase
    Charge,
}

/// One completed operation, as recorded in an account or card history.
///
/// For accounts `amount` is the balance after the operation; for cards it is
/// the charged value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: EntryKind,
    pub label: String,
    pub amount: BigDecimal,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        kind: EntryKind,
        label: impl Into<String>,
        amount: BigDecimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            label: label.into(),
            amount,
            timestamp,
        }
    }

    /// Whether this entry belongs to a two-account transfer
    pub fn is_transfer(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::TransferIn { .. } | EntryKind::TransferOut { .. }
        )
    }
}

/// Current position of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub holder_name: String,
    pub account_number: String,
    pub balance: BigDecimal,
    pub limit_max: BigDecimal,
    pub limit_available: BigDecimal,
    /// Spendable funds: positive balance plus unused limit
    pub total_available: BigDecimal,
}

/// Ordered history of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatement {
    pub holder_name: String,
    pub account_number: String,
    pub entries: Vec<HistoryEntry>,
}

/// Spending limit of a card, only handed out against the right password
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardStatus {
    pub limit_max: BigDecimal,
    pub limit_available: BigDecimal,
}

/// Charge history of a card together with the account it is bound to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInvoice {
    pub card_number: String,
    pub titular: String,
    pub account_number: String,
    pub entries: Vec<HistoryEntry>,
}

/// Both legs of a completed transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub value: BigDecimal,
    pub source: AccountId,
    pub destination: AccountId,
    pub withdrawal: HistoryEntry,
    pub deposit: HistoryEntry,
}

/// Card expiry as printed on the plastic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardExpiry {
    pub month: u32,
    pub year: i32,
}

impl fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Errors that can occur in the banking ledger.
///
/// Every variant is a local refusal: the entity involved is left exactly as
/// it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Insufficient funds: total available {available}")]
    InsufficientFunds { available: BigDecimal },
    #[error("Card limit exceeded: limit available {available}")]
    InsufficientLimit { available: BigDecimal },
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
    #[error("Cannot transfer to the same account")]
    SelfTransfer,
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("Card not found: {0}")]
    CardNotFound(String),
    #[error("Could not allocate a unique card number after {attempts} attempts")]
    CardNumberExhausted { attempts: u32 },
    #[error("Concurrency error: {0}")]
    Concurrency(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for banking operations
pub type BankResult<T> = Result<T, BankError>;
