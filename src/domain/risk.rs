//! Risk scoring for arbitrage opportunities.
//!
//! Five weighted buckets, each independently thresholded, summed and
//! clamped into [0,1]. Higher is riskier.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const SPREAD_WEIGHT: Decimal = dec!(0.30);
const LIQUIDITY_WEIGHT: Decimal = dec!(0.25);
const EXECUTION_WEIGHT: Decimal = dec!(0.20);
const IMPACT_WEIGHT: Decimal = dec!(0.15);
const COUNTERPARTY_WEIGHT: Decimal = dec!(0.10);

/// Inputs the scorer needs from an opportunity, already aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    pub profit_percent: Decimal,
    /// Pair liquidity in [0,1], the mean of both sides' scores.
    pub liquidity_score: Decimal,
    /// Estimated execution time in seconds.
    pub execution_time_secs: Decimal,
    /// Executable volume relative to a 1000-unit reference, capped at 1.
    pub volume_score: Decimal,
}

/// Derive a volume score from an executable amount: min(1, amount/1000).
pub fn volume_score(executable_amount: Decimal) -> Decimal {
    (executable_amount / dec!(1000)).min(Decimal::ONE).max(Decimal::ZERO)
}

/// Estimated execution time: a 60s floor plus 10s per resting offer on
/// either side of the pair.
pub fn execution_time_secs(buy_offer_count: usize, sell_offer_count: usize) -> Decimal {
    dec!(60) + dec!(10) * Decimal::from((buy_offer_count + sell_offer_count) as u64)
}

/// Score an opportunity. Always within [0,1].
pub fn score(inputs: &RiskInputs) -> Decimal {
    let mut risk = Decimal::ZERO;

    // Thin profit margins leave no room for the spread to move.
    risk += if inputs.profit_percent < Decimal::ONE {
        dec!(0.8) * SPREAD_WEIGHT
    } else if inputs.profit_percent < dec!(2) {
        dec!(0.4) * SPREAD_WEIGHT
    } else {
        dec!(0.1) * SPREAD_WEIGHT
    };

    risk += if inputs.liquidity_score < dec!(0.3) {
        LIQUIDITY_WEIGHT
    } else if inputs.liquidity_score < dec!(0.6) {
        dec!(0.5) * LIQUIDITY_WEIGHT
    } else {
        dec!(0.1) * LIQUIDITY_WEIGHT
    };

    risk += if inputs.execution_time_secs > dec!(300) {
        EXECUTION_WEIGHT
    } else if inputs.execution_time_secs > dec!(60) {
        dec!(0.5) * EXECUTION_WEIGHT
    } else {
        dec!(0.1) * EXECUTION_WEIGHT
    };

    risk += if inputs.volume_score < dec!(0.3) {
        IMPACT_WEIGHT
    } else if inputs.volume_score < dec!(0.6) {
        dec!(0.5) * IMPACT_WEIGHT
    } else {
        dec!(0.1) * IMPACT_WEIGHT
    };

    // Fixed counterparty baseline, always charged in full.
    risk += COUNTERPARTY_WEIGHT;

    risk.clamp(Decimal::ZERO, Decimal::ONE)
}
