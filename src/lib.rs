//! # Banking Core
//!
//! A small personal-banking ledger: checking accounts with an overdraft limit,
//! credit cards with their own spending limit, and transfers between accounts.
//!
//! ## Features
//!
//! - **Balance/limit engine**: deposits repay drawn overdraft before growing the balance,
//!   withdrawals draw on the limit once the balance runs out
//! - **Cards**: password-gated charges against an independent limit
//! - **Transfers**: withdrawal on the source, then deposit on the destination, each leg
//!   tagged with its counterparty
//! - **Concurrency**: per-entity locking with ordered acquisition for transfers
//! - **Injected collaborators**: clock and card identity sources are traits
//!
//! ## Quick Start
//!
//! ```rust
//! use banking_core::{Bank, BankConfig};
//! use bigdecimal::BigDecimal;
//!
//! let bank = Bank::new(BankConfig::default()).unwrap();
//! let adao = bank.open_account("Adão Vieira", "965.962.267-54", "123", "76214").unwrap();
//! let carin = bank.open_account("Cárin D Trisch", "524.687.542-45", "123", "76215").unwrap();
//!
//! bank.deposit(adao, &BigDecimal::from(10000)).unwrap();
//! bank.transfer(adao, carin, &BigDecimal::from(500)).unwrap();
//!
//! assert_eq!(bank.account_status(carin).unwrap().balance, BigDecimal::from(500));
//! ```

pub mod config;
pub mod ledger;
pub mod report;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use report::*;
pub use traits::*;
pub use types::*;
