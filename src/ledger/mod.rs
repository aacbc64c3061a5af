//! Ledger module containing accounts, cards, limits and the transfer protocol

pub mod account;
pub mod bank;
pub mod card;
pub mod limit;
pub mod transfer;

pub use account::*;
pub use bank::*;
pub use card::*;
pub use limit::*;
