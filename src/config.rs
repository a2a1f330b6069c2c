//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; every knob has a default so
//! an empty file (or no file at all) yields a working setup.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub economy: EconomyConfig,

    #[serde(default)]
    pub pools: PoolsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Traded items to scan for cross-country arbitrage. Empty means the
    /// item passes are skipped and only currency analysis runs.
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

/// One traded item: its market id and a display name.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemSpec {
    pub id: i64,
    pub name: String,
}

/// Upstream API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the game API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token, read from `ECLESIAR_API_TOKEN` when unset here.
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.eclesiar.com".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Economic thresholds and cache lifetimes.
#[derive(Debug, Clone, Deserialize)]
pub struct EconomyConfig {
    /// Minimum profit percentage for an arbitrage pair to be reported.
    #[serde(default = "default_min_profit_percent")]
    pub min_profit_percent: Decimal,
    /// Minimum absolute spread for a currency market to be interesting.
    #[serde(default = "default_min_spread")]
    pub min_spread: Decimal,
    /// Currency rate cache TTL in minutes.
    #[serde(default = "default_rate_ttl_minutes")]
    pub rate_ttl_minutes: i64,
    /// Market offer cache TTL in minutes.
    #[serde(default = "default_offer_ttl_minutes")]
    pub offer_ttl_minutes: i64,
    /// Flight ticket cost in GOLD, used in logistics-adjusted margins.
    #[serde(default = "default_ticket_cost_gold")]
    pub ticket_cost_gold: Decimal,
    /// Wage assumed when a country exposes no NPC wage data, in GOLD.
    #[serde(default = "default_fallback_npc_wage")]
    pub fallback_npc_wage: Decimal,
    /// Divisor for country bonus aggregation.
    #[serde(default = "default_country_bonus_divisor")]
    pub country_bonus_divisor: Decimal,
}

fn default_min_profit_percent() -> Decimal {
    dec!(2.0)
}

fn default_min_spread() -> Decimal {
    dec!(0.0001)
}

const fn default_rate_ttl_minutes() -> i64 {
    15
}

const fn default_offer_ttl_minutes() -> i64 {
    5
}

fn default_ticket_cost_gold() -> Decimal {
    dec!(0.1)
}

fn default_fallback_npc_wage() -> Decimal {
    dec!(5.0)
}

fn default_country_bonus_divisor() -> Decimal {
    dec!(5)
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            min_profit_percent: default_min_profit_percent(),
            min_spread: default_min_spread(),
            rate_ttl_minutes: default_rate_ttl_minutes(),
            offer_ttl_minutes: default_offer_ttl_minutes(),
            ticket_cost_gold: default_ticket_cost_gold(),
            fallback_npc_wage: default_fallback_npc_wage(),
            country_bonus_divisor: default_country_bonus_divisor(),
        }
    }
}

/// Concurrent fetch limits per resource class.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolsConfig {
    #[serde(default = "default_market_workers")]
    pub market_workers: usize,
    #[serde(default = "default_region_workers")]
    pub region_workers: usize,
    #[serde(default = "default_war_workers")]
    pub war_workers: usize,
    #[serde(default = "default_hits_workers")]
    pub hits_workers: usize,
}

const fn default_market_workers() -> usize {
    6
}

const fn default_region_workers() -> usize {
    8
}

const fn default_war_workers() -> usize {
    4
}

const fn default_hits_workers() -> usize {
    16
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            market_workers: default_market_workers(),
            region_workers: default_region_workers(),
            war_workers: default_war_workers(),
            hits_workers: default_hits_workers(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// The API token is taken from the `ECLESIAR_API_TOKEN` environment
    /// variable when the file does not set one.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if config.api.token.is_none() {
            config.api.token = std::env::var("ECLESIAR_API_TOKEN").ok();
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging per the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if self.economy.min_profit_percent < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "min_profit_percent",
                reason: "must be non-negative".to_string(),
            }
            .into());
        }
        if self.economy.rate_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_ttl_minutes",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.economy.offer_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "offer_ttl_minutes",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.economy.country_bonus_divisor <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "country_bonus_divisor",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        for (field, value) in [
            ("market_workers", self.pools.market_workers),
            ("region_workers", self.pools.region_workers),
            ("war_workers", self.pools.war_workers),
            ("hits_workers", self.pools.hits_workers),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.economy.min_profit_percent, dec!(2.0));
        assert_eq!(config.economy.rate_ttl_minutes, 15);
        assert_eq!(config.economy.offer_ttl_minutes, 5);
        assert_eq!(config.economy.ticket_cost_gold, dec!(0.1));
        assert_eq!(config.pools.market_workers, 6);
        assert_eq!(config.pools.region_workers, 8);
        assert_eq!(config.logging.level, "info");
        assert!(config.items.is_empty());
    }

    #[test]
    fn items_parse_as_an_array_of_tables() {
        let toml = r#"
            [[items]]
            id = 3
            name = "Iron"

            [[items]]
            id = 7
            name = "Weapon"
        "#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items[0].name, "Iron");
    }

    #[test]
    fn overrides_are_honored() {
        let toml = r#"
            [economy]
            min_profit_percent = 5.0
            rate_ttl_minutes = 30

            [pools]
            market_workers = 2

            [logging]
            level = "debug"
            format = "json"
        "#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.economy.min_profit_percent, dec!(5.0));
        assert_eq!(config.economy.rate_ttl_minutes, 30);
        assert_eq!(config.pools.market_workers, 2);
        assert_eq!(config.logging.format, "json");
        // Untouched knobs keep their defaults.
        assert_eq!(config.economy.offer_ttl_minutes, 5);
        assert_eq!(config.pools.hits_workers, 16);
    }

    #[test]
    fn invalid_knobs_are_rejected() {
        assert!(Config::parse_toml("[economy]\nmin_profit_percent = -1").is_err());
        assert!(Config::parse_toml("[economy]\nrate_ttl_minutes = 0").is_err());
        assert!(Config::parse_toml("[economy]\ncountry_bonus_divisor = 0").is_err());
        assert!(Config::parse_toml("[pools]\nmarket_workers = 0").is_err());
        assert!(Config::parse_toml("[api]\nbase_url = \"\"").is_err());
    }
}
