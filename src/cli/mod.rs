//! Command-line interface definitions.

pub mod output;
pub mod run;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::domain::Commodity;

/// Goldrush - game-economy production and arbitrage analysis.
#[derive(Parser, Debug)]
#[command(name = "goldrush")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one full analysis cycle and print the report
    Run(RunArgs),

    /// Run one cycle and emit the report as JSON
    Report(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `goldrush check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override minimum profit percentage for arbitrage
    #[arg(long)]
    pub min_profit: Option<Decimal>,

    /// Company tier (1-5) for production calculations
    #[arg(long, default_value_t = 5)]
    pub company_tier: i64,

    /// Eco skill for production calculations
    #[arg(long, default_value_t = 0)]
    pub eco_skill: i64,

    /// Workers already hired today
    #[arg(long, default_value_t = 0)]
    pub workers: i64,

    /// Assume NPC-owned companies
    #[arg(long)]
    pub npc_owned: bool,

    /// Only show production rows for this country
    #[arg(long)]
    pub country: Option<String>,

    /// Only show production rows for this commodity (e.g. grain, weapon)
    #[arg(long, value_parser = parse_commodity)]
    pub commodity: Option<Commodity>,

    /// Rows per report table
    #[arg(long, default_value_t = 15)]
    pub top: usize,
}

fn parse_commodity(name: &str) -> Result<Commodity, String> {
    Commodity::from_name(name).ok_or_else(|| format!("unknown commodity: {name}"))
}
