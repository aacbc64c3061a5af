//! Utility modules

pub mod clock;
pub mod identity;
pub mod validation;

pub use clock::*;
pub use identity::*;
pub use validation::*;

use bigdecimal::{BigDecimal, RoundingMode};

/// Render an amount with two decimal places, rounding half to even
pub fn format_amount(value: &BigDecimal) -> String {
    value.with_scale_round(2, RoundingMode::HalfEven).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn render(s: &str) -> String {
        format_amount(&BigDecimal::from_str(s).unwrap())
    }

    #[test]
    fn test_format_amount_rounds_sub_cent_values() {
        assert_eq!(render("10.999"), "11.00");
        assert_eq!(render("0.004"), "0.00");
        assert_eq!(render("-2.676"), "-2.68");
    }

    #[test]
    fn test_format_amount_ties_go_to_even_cent() {
        assert_eq!(render("0.125"), "0.12");
        assert_eq!(render("0.135"), "0.14");
    }

    #[test]
    fn test_format_amount_pads_whole_values() {
        assert_eq!(render("3500"), "3500.00");
        assert_eq!(render("7.5"), "7.50");
    }
}
