//! Configuration loading from real files.

use std::io::Write;

use goldrush::config::Config;
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

#[test]
fn load_reads_and_validates_a_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [economy]
        min_profit_percent = 3.5
        ticket_cost_gold = 0.15

        [logging]
        level = "warn"
        format = "json"

        [[items]]
        id = 3
        name = "Iron"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.economy.min_profit_percent, dec!(3.5));
    assert_eq!(config.economy.ticket_cost_gold, dec!(0.15));
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.items.len(), 1);
    // Defaults fill everything the file leaves out.
    assert_eq!(config.pools.market_workers, 6);
    assert_eq!(config.economy.fallback_npc_wage, dec!(5.0));
}

#[test]
fn load_rejects_a_missing_file() {
    assert!(Config::load("/nonexistent/goldrush.toml").is_err());
}

#[test]
fn load_rejects_invalid_values() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[pools]\nregion_workers = 0\n").unwrap();
    assert!(Config::load(file.path()).is_err());
}
