//! Card identity sources

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::traits::IdentitySource;

const CARD_NUMBER_MIN: u64 = 1_000_000_000_000_000;
const CARD_NUMBER_MAX: u64 = 9_999_999_999_999_999;

/// Uniformly random 16 digit numbers and 3 digit codes
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentitySource;

impl IdentitySource for RandomIdentitySource {
    fn card_number(&self) -> String {
        rand::thread_rng()
            .gen_range(CARD_NUMBER_MIN..=CARD_NUMBER_MAX)
            .to_string()
    }

    fn security_code(&self) -> String {
        format!("{:03}", rand::thread_rng().gen_range(0..1000u32))
    }
}

/// Sequential allocation: unique by construction within one source.
///
/// Numbers start at the lowest 16 digit value plus `offset`.
#[derive(Debug, Default)]
pub struct SequentialIdentitySource {
    next: AtomicU64,
}

impl SequentialIdentitySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(offset: u64) -> Self {
        Self {
            next: AtomicU64::new(offset),
        }
    }
}

impl IdentitySource for SequentialIdentitySource {
    fn card_number(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        (CARD_NUMBER_MIN + n % (CARD_NUMBER_MAX - CARD_NUMBER_MIN + 1)).to_string()
    }

    fn security_code(&self) -> String {
        let n = self.next.load(Ordering::Relaxed);
        format!("{:03}", n.wrapping_mul(7919) % 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_source_shapes() {
        let source = RandomIdentitySource;
        for _ in 0..50 {
            let number = source.card_number();
            assert_eq!(number.len(), 16);
            assert!(number.chars().all(|c| c.is_ascii_digit()));

            let code = source.security_code();
            assert_eq!(code.len(), 3);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_sequential_source_never_repeats() {
        let source = SequentialIdentitySource::starting_at(41);
        let first = source.card_number();
        let second = source.card_number();
        assert_eq!(first, "1000000000000041");
        assert_eq!(second, "1000000000000042");
        assert_eq!(source.security_code().len(), 3);
    }
}
