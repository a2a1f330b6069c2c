//! Handler for the `run` command.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::api::ApiClient;
use crate::app::{AnalysisReport, Analyzer};
use crate::cli::{output, RunArgs};
use crate::config::Config;
use crate::domain::{ProductionFactors, SystemClock};
use crate::error::Result;

/// Execute the run command: one analysis cycle, rendered to stdout.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let (report, min_spread) = run_cycle(args).await?;
    output::render_report(&report, min_spread, args.top);
    Ok(())
}

/// Execute the report command: one analysis cycle, emitted as JSON.
pub async fn report(args: &RunArgs) -> Result<()> {
    let (report, _) = run_cycle(args).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_cycle(args: &RunArgs) -> Result<(AnalysisReport, Decimal)> {
    let mut config = Config::load(&args.config)?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(min_profit) = args.min_profit {
        config.economy.min_profit_percent = min_profit;
    }

    config.init_logging();
    info!(config = %args.config.display(), "goldrush starting");

    let factors = ProductionFactors {
        company_tier: args.company_tier,
        eco_skill: args.eco_skill,
        workers_today: args.workers,
        is_npc_owned: args.npc_owned,
        ..Default::default()
    };

    let api = ApiClient::new(&config.api)?;
    let mut analyzer = Analyzer::new(&config, Arc::new(SystemClock));
    let mut report = analyzer.run_cycle(&api, &factors).await?;

    if let Some(ref country) = args.country {
        report
            .production
            .retain(|r| r.country_name.eq_ignore_ascii_case(country));
    }
    if let Some(commodity) = args.commodity {
        report.production.retain(|r| r.commodity == commodity);
    }

    Ok((report, analyzer.min_spread()))
}

/// Validate a configuration file and report the effective knobs.
pub fn check_config(path: &std::path::Path) -> Result<()> {
    let config = Config::load(path)?;
    println!("config OK: {}", path.display());
    println!(
        "  min profit {}%, rate TTL {}m, offer TTL {}m, {} items",
        config.economy.min_profit_percent,
        config.economy.rate_ttl_minutes,
        config.economy.offer_ttl_minutes,
        config.items.len(),
    );
    Ok(())
}
