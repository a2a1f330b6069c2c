//! Arbitrage detection over aggregated market state.
//!
//! Currency arbitrage scans every ordered pair of currency markets; item
//! arbitrage scans country pairs for a single item. Both emit only pairs
//! whose profit percentage clears the configured threshold, sorted
//! descending by profit.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::ids::{CountryId, CurrencyId, ItemId};
use super::market::CurrencyMarket;
use super::risk::{self, RiskInputs};

/// What a detected opportunity trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArbitragePair {
    Currency {
        from_id: CurrencyId,
        from_name: String,
        to_id: CurrencyId,
        to_name: String,
    },
    Item {
        item_id: ItemId,
        item_name: String,
        buy_country_id: CountryId,
        buy_country: String,
        sell_country_id: CountryId,
        sell_country: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub pair: ArbitragePair,
    pub buy_rate: Decimal,
    pub sell_rate: Decimal,
    pub profit_percent: Decimal,
    /// Depth-limited amount both sides can absorb.
    pub executable_amount: Decimal,
    /// Profit on the executable amount, in GOLD.
    pub estimated_profit_gold: Decimal,
    /// Profit after logistics. For item pairs this deducts a round trip of
    /// flight tickets; for currency pairs it equals the gross figure.
    pub net_profit_gold: Decimal,
    pub risk_score: Decimal,
}

/// The cheapest GOLD price for one item in one country, with book depth
/// for risk estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryItemPrice {
    pub country_id: CountryId,
    pub country_name: String,
    pub cheapest_price_gold: Decimal,
    pub available_amount: Decimal,
    pub offer_count: usize,
}

#[derive(Debug, Clone)]
pub struct ArbitrageDetector {
    pub min_profit_percent: Decimal,
    /// One flight ticket in GOLD; item pairs pay a round trip.
    pub ticket_cost_gold: Decimal,
}

impl Default for ArbitrageDetector {
    fn default() -> Self {
        Self {
            min_profit_percent: dec!(2.0),
            ticket_cost_gold: dec!(0.1),
        }
    }
}

impl ArbitrageDetector {
    pub fn new(min_profit_percent: Decimal, ticket_cost_gold: Decimal) -> Self {
        Self {
            min_profit_percent,
            ticket_cost_gold,
        }
    }

    /// Scan every ordered pair of distinct currency markets: buy into A at
    /// its best buy rate, sell out of B at its best sell rate.
    pub fn find_currency_arbitrage(&self, markets: &[CurrencyMarket]) -> Vec<ArbitrageOpportunity> {
        let mut opportunities = Vec::new();

        for a in markets {
            for b in markets {
                if a.currency_id == b.currency_id {
                    continue;
                }
                if a.best_buy_rate <= Decimal::ZERO || a.best_buy_rate >= b.best_sell_rate {
                    continue;
                }
                let profit_percent =
                    (b.best_sell_rate - a.best_buy_rate) / a.best_buy_rate * dec!(100);
                if profit_percent < self.min_profit_percent {
                    continue;
                }

                let executable_amount = a.top_buy_amount.min(b.top_sell_amount);
                let estimated_profit_gold =
                    executable_amount * (b.best_sell_rate - a.best_buy_rate);
                let net_profit_gold = estimated_profit_gold;

                let pair_liquidity = (a.liquidity_score + b.liquidity_score) / dec!(2);
                let risk_score = risk::score(&RiskInputs {
                    profit_percent,
                    liquidity_score: pair_liquidity,
                    execution_time_secs: risk::execution_time_secs(
                        a.buy_offer_count,
                        b.sell_offer_count,
                    ),
                    volume_score: risk::volume_score(executable_amount),
                });

                opportunities.push(ArbitrageOpportunity {
                    pair: ArbitragePair::Currency {
                        from_id: a.currency_id,
                        from_name: a.currency_name.clone(),
                        to_id: b.currency_id,
                        to_name: b.currency_name.clone(),
                    },
                    buy_rate: a.best_buy_rate,
                    sell_rate: b.best_sell_rate,
                    profit_percent,
                    executable_amount,
                    estimated_profit_gold,
                    net_profit_gold,
                    risk_score,
                });
            }
        }

        sort_by_profit(&mut opportunities);
        opportunities
    }

    /// Scan country pairs for one item: buy where it is cheap, sell where
    /// it is dear.
    pub fn find_item_arbitrage(
        &self,
        item_id: ItemId,
        item_name: &str,
        country_prices: &[CountryItemPrice],
    ) -> Vec<ArbitrageOpportunity> {
        let mut opportunities = Vec::new();

        for buy in country_prices {
            for sell in country_prices {
                if buy.country_id == sell.country_id {
                    continue;
                }
                if buy.cheapest_price_gold <= Decimal::ZERO
                    || buy.cheapest_price_gold >= sell.cheapest_price_gold
                {
                    continue;
                }
                let profit_percent = (sell.cheapest_price_gold - buy.cheapest_price_gold)
                    / buy.cheapest_price_gold
                    * dec!(100);
                if profit_percent < self.min_profit_percent {
                    continue;
                }

                let executable_amount = buy.available_amount.min(sell.available_amount);
                let estimated_profit_gold =
                    executable_amount * (sell.cheapest_price_gold - buy.cheapest_price_gold);
                let net_profit_gold = estimated_profit_gold - dec!(2) * self.ticket_cost_gold;

                let pair_liquidity = (liquidity_of(buy) + liquidity_of(sell)) / dec!(2);
                let risk_score = risk::score(&RiskInputs {
                    profit_percent,
                    liquidity_score: pair_liquidity,
                    execution_time_secs: risk::execution_time_secs(
                        buy.offer_count,
                        sell.offer_count,
                    ),
                    volume_score: risk::volume_score(executable_amount),
                });

                opportunities.push(ArbitrageOpportunity {
                    pair: ArbitragePair::Item {
                        item_id,
                        item_name: item_name.to_string(),
                        buy_country_id: buy.country_id,
                        buy_country: buy.country_name.clone(),
                        sell_country_id: sell.country_id,
                        sell_country: sell.country_name.clone(),
                    },
                    buy_rate: buy.cheapest_price_gold,
                    sell_rate: sell.cheapest_price_gold,
                    profit_percent,
                    executable_amount,
                    estimated_profit_gold,
                    net_profit_gold,
                    risk_score,
                });
            }
        }

        sort_by_profit(&mut opportunities);
        opportunities
    }
}

fn liquidity_of(price: &CountryItemPrice) -> Decimal {
    super::market::liquidity_score(price.offer_count)
}

/// Stable descending sort on profit percentage only.
fn sort_by_profit(opportunities: &mut [ArbitrageOpportunity]) {
    opportunities.sort_by(|a, b| b.profit_percent.cmp(&a.profit_percent));
}
