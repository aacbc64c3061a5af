//! Collaborator traits the engine calls into
//!
//! The engine never reads the wall clock or a random number generator
//! directly. Both are injected so that a [`Bank`](crate::Bank) can be driven
//! deterministically in tests.

use chrono::{DateTime, Utc};

/// Source of "now" for history timestamps and card expiry
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Source of card identities.
///
/// Implementations are not required to guarantee uniqueness; the bank checks
/// every generated number against its registry and asks again on collision.
pub trait IdentitySource: Send + Sync {
    /// Produce a 16 digit card number
    fn card_number(&self) -> String;

    /// Produce a 3 digit security code
    fn security_code(&self) -> String;
}
