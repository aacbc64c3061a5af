//! Plain-text rendering of the read models
//!
//! The engine never formats anything itself; this module is the presentation
//! collaborator that turns statuses and histories into printable statements.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::types::*;
use crate::utils::format_amount;

/// How timestamps are stamped on rendered statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementFormat {
    /// `chrono` strftime pattern
    pub timestamp_pattern: String,
    /// Offset from UTC applied before formatting
    pub utc_offset_minutes: i32,
}

impl Default for StatementFormat {
    fn default() -> Self {
        Self {
            timestamp_pattern: "%d/%m/%Y %H:%M:%S".to_string(),
            utc_offset_minutes: -180,
        }
    }
}

impl StatementFormat {
    /// Parse a format from JSON and validate it; missing fields take their defaults
    pub fn from_json_str(json: &str) -> BankResult<Self> {
        let format: Self =
            serde_json::from_str(json).map_err(|e| BankError::Config(e.to_string()))?;
        format.validate()?;
        Ok(format)
    }

    /// Check that the offset is representable and the pattern parses
    pub fn validate(&self) -> BankResult<()> {
        if self.fixed_offset().is_none() {
            return Err(BankError::Config(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )));
        }

        if StrftimeItems::new(&self.timestamp_pattern).any(|item| matches!(item, Item::Error)) {
            return Err(BankError::Config(format!(
                "invalid timestamp pattern: {}",
                self.timestamp_pattern
            )));
        }

        Ok(())
    }

    fn fixed_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }

    /// Stamp a timestamp; an unusable format falls back to RFC 3339 in UTC
    pub fn timestamp(&self, at: &DateTime<Utc>) -> String {
        let offset = self.fixed_offset().unwrap_or_else(|| Utc.fix());
        let mut out = String::new();
        match write!(
            out,
            "{}",
            at.with_timezone(&offset).format(&self.timestamp_pattern)
        ) {
            Ok(()) => out,
            Err(_) => at.to_rfc3339(),
        }
    }

    pub fn account_status(&self, status: &AccountStatus) -> String {
        [
            format!(
                "Holder: {} Account: {}",
                status.holder_name, status.account_number
            ),
            format!("Balance: {}", format_amount(&status.balance)),
            format!("Limit: {}", format_amount(&status.limit_max)),
            format!("Limit available: {}", format_amount(&status.limit_available)),
            format!("Total available: {}", format_amount(&status.total_available)),
        ]
        .join("\n")
    }

    pub fn account_statement(&self, statement: &AccountStatement) -> String {
        let mut lines = vec![format!("Statement for account {}", statement.account_number)];
        lines.extend(statement.entries.iter().map(|entry| {
            format!(
                "{} | Balance: {} | {}",
                entry.label,
                format_amount(&entry.amount),
                self.timestamp(&entry.timestamp)
            )
        }));
        lines.join("\n")
    }

    pub fn card_status(&self, status: &CardStatus) -> String {
        format!(
            "Limit: {}\nLimit available: {}",
            format_amount(&status.limit_max),
            format_amount(&status.limit_available)
        )
    }

    pub fn card_invoice(&self, invoice: &CardInvoice) -> String {
        let mut lines = vec![format!(
            "Card {} Titular: {} Account: {}",
            invoice.card_number, invoice.titular, invoice.account_number
        )];
        lines.extend(invoice.entries.iter().map(|entry| {
            format!(
                "{}: {} | {}",
                entry.label,
                format_amount(&entry.amount),
                self.timestamp(&entry.timestamp)
            )
        }));
        lines.push("---- end of invoice ----".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 1, 30, 5).unwrap()
    }

    #[test]
    fn test_timestamp_is_shifted_to_configured_offset() {
        let format = StatementFormat::default();
        assert_eq!(format.timestamp(&at()), "01/01/2024 22:30:05");

        let utc = StatementFormat {
            utc_offset_minutes: 0,
            ..StatementFormat::default()
        };
        assert_eq!(utc.timestamp(&at()), "02/01/2024 01:30:05");
    }

    #[test]
    fn test_bad_pattern_is_rejected_and_never_panics() {
        let json = r#"{"timestamp_pattern": "%Q"}"#;
        assert!(matches!(
            StatementFormat::from_json_str(json),
            Err(BankError::Config(_))
        ));

        let format: StatementFormat = serde_json::from_str(json).unwrap();
        assert!(format.validate().is_err());
        assert_eq!(format.timestamp(&at()), at().to_rfc3339());
    }

    #[test]
    fn test_out_of_range_offset_is_rejected_and_never_panics() {
        let json = r#"{"utc_offset_minutes": 2000000000}"#;
        assert!(matches!(
            StatementFormat::from_json_str(json),
            Err(BankError::Config(_))
        ));

        let format: StatementFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format.timestamp(&at()), "02/01/2024 01:30:05");
    }

    #[test]
    fn test_valid_json_format_is_accepted() {
        let format =
            StatementFormat::from_json_str(r#"{"timestamp_pattern": "%Y-%m-%d %H:%M"}"#).unwrap();
        assert_eq!(format.utc_offset_minutes, -180);
        assert_eq!(format.timestamp(&at()), "2024-01-01 22:30");
    }

    #[test]
    fn test_statement_lines_follow_history_order() {
        let statement = AccountStatement {
            holder_name: "Ana".to_string(),
            account_number: "76214".to_string(),
            entries: vec![
                HistoryEntry::new(EntryKind::Deposit, "Deposit: 100.00", BigDecimal::from(100), at()),
                HistoryEntry::new(
                    EntryKind::Withdrawal,
                    "Withdrawal: -30.00",
                    BigDecimal::from(70),
                    at(),
                ),
            ],
        };

        let rendered = StatementFormat::default().account_statement(&statement);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "Statement for account 76214");
        assert_eq!(lines[1], "Deposit: 100.00 | Balance: 100.00 | 01/01/2024 22:30:05");
        assert_eq!(lines[2], "Withdrawal: -30.00 | Balance: 70.00 | 01/01/2024 22:30:05");
    }

    #[test]
    fn test_invoice_is_terminated() {
        let invoice = CardInvoice {
            card_number: "4000123412341234".to_string(),
            titular: "Ana".to_string(),
            account_number: "76214".to_string(),
            entries: vec![HistoryEntry::new(
                EntryKind::Charge,
                "compra notebook",
                BigDecimal::from(3500),
                at(),
            )],
        };

        let rendered = StatementFormat::default().card_invoice(&invoice);
        assert!(rendered.contains("compra notebook: 3500.00"));
        assert!(rendered.ends_with("---- end of invoice ----"));
    }
}
