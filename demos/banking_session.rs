//! Banking session example: two accounts, a transfer and a card purchase

use banking_core::{Bank, BankConfig, StatementFormat};
use bigdecimal::BigDecimal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let bank = Bank::new(BankConfig::default())?;
    let format = StatementFormat::default();

    // 1. Open accounts and issue a card
    let adao = bank.open_account("Adão Vieira", "965.962.267-54", "123", "76214")?;
    let carin = bank.open_account("Cárin D Trisch", "524.687.542-45", "123", "76214")?;
    let visa = bank.issue_card(adao, "Adão Vieira", "5525")?;

    // 2. Move some money
    bank.deposit(adao, &BigDecimal::from(10000))?;
    bank.transfer(adao, carin, &BigDecimal::from(500))?;

    // 3. Use the card
    bank.update_card_limit(&visa, BigDecimal::from(5000))?;
    println!("{}\n", format.card_status(&bank.card_status(&visa, "5525")?));
    bank.charge(&visa, &BigDecimal::from(3500), "compra notbook", "5525")?;

    if let Err(err) = bank.charge(&visa, &BigDecimal::from(2000), "geladeira", "5525") {
        println!("Charge refused: {err}\n");
    }

    println!("{}\n", format.card_invoice(&bank.card_invoice(&visa)?));
    println!("{}\n", format.card_status(&bank.card_status(&visa, "5525")?));

    // 4. Statements
    println!("{}\n", format.account_status(&bank.account_status(adao)?));
    println!("{}\n", format.account_statement(&bank.account_statement(adao)?));
    println!("{}", format.account_statement(&bank.account_statement(carin)?));

    Ok(())
}
