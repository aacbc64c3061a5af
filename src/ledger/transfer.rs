//! Two-account transfer protocol
//!
//! A transfer is the withdrawal rule on the source followed by the deposit
//! rule on the destination. The withdrawal is the only leg that can refuse;
//! once it has been applied the deposit always goes through, so no
//! compensation step exists. Any future deposit-side refusal would need one.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::ledger::Account;
use crate::types::*;
use crate::utils::{format_amount, validate_positive_amount};

/// Run a transfer between two distinct accounts.
///
/// Taking both accounts by `&mut` makes a self-transfer unrepresentable here;
/// the bank rejects it before locking.
pub fn execute(
    source: &mut Account,
    destination: &mut Account,
    value: &BigDecimal,
    at: DateTime<Utc>,
) -> BankResult<TransferReceipt> {
    validate_positive_amount(value)?;

    source.apply_withdrawal(value)?;
    let withdrawal = source.record(
        EntryKind::TransferOut {
            to: destination.id(),
        },
        format!(
            "Transfer to {}: -{}",
            destination.holder_name(),
            format_amount(value)
        ),
        at,
    );

    destination.apply_deposit(value);
    let deposit = destination.record(
        EntryKind::TransferIn { from: source.id() },
        format!(
            "Transfer from {}: {}",
            source.holder_name(),
            format_amount(value)
        ),
        at,
    );

    info!(
        source = %source.id(),
        destination = %destination.id(),
        value = %value,
        "transfer completed"
    );

    Ok(TransferReceipt {
        value: value.clone(),
        source: source.id(),
        destination: destination.id(),
        withdrawal,
        deposit,
    })
}
