//! The full analysis cycle: rates, markets, production, arbitrage, risk.
//!
//! Every derived record is a plain value handed to the output layer; the
//! cycle owns the caches and is the single writer for each cache key.

use futures_util::{stream, StreamExt};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::GameApi;
use crate::config::{Config, ItemSpec};
use crate::domain::{
    aggregate_currency_market, analyze_item_market, rate_from_offers, ArbitrageDetector,
    ArbitrageOpportunity, Clock, CoinOffer, Commodity, CountryId, CountryItemPrice, Currency,
    CurrencyExtremes, CurrencyMarket, GoldPricedOffer, ItemId, ItemMarketAnalysis, ItemOffer,
    OfferCache, ProductionEngine, ProductionFactors, ProductionResult, RateCache,
};
use crate::error::{Error, Result};

use super::snapshot::{load_snapshot, EconomySnapshot};

/// Everything one cycle derives, ready for rendering.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AnalysisReport {
    pub currency_markets: Vec<CurrencyMarket>,
    pub currency_extremes: Option<CurrencyExtremes>,
    pub currency_arbitrage: Vec<ArbitrageOpportunity>,
    pub item_markets: Vec<ItemMarketAnalysis>,
    pub item_arbitrage: Vec<ArbitrageOpportunity>,
    pub production: Vec<ProductionResult>,
}

impl AnalysisReport {
    /// Currency markets whose spread clears the configured floor, the ones
    /// worth a second look in the summary.
    pub fn notable_markets(&self, min_spread: Decimal) -> Vec<&CurrencyMarket> {
        self.currency_markets
            .iter()
            .filter(|m| m.spread.abs() >= min_spread)
            .collect()
    }

    /// Best production rows across all commodities.
    pub fn top_regions(&self, limit: usize) -> &[ProductionResult] {
        &self.production[..self.production.len().min(limit)]
    }

    /// Production rows for one country, rank order preserved.
    pub fn production_for_country(&self, country_name: &str) -> Vec<&ProductionResult> {
        self.production
            .iter()
            .filter(|r| r.country_name.eq_ignore_ascii_case(country_name))
            .collect()
    }

    /// Production rows for one commodity, rank order preserved.
    pub fn production_for_commodity(&self, commodity: Commodity) -> Vec<&ProductionResult> {
        self.production
            .iter()
            .filter(|r| r.commodity == commodity)
            .collect()
    }
}

/// Runs analysis cycles against one API client, holding the caches across
/// cycles so TTLs actually matter.
pub struct Analyzer {
    rate_ttl_minutes: i64,
    offer_cache: OfferCache,
    engine: ProductionEngine,
    detector: ArbitrageDetector,
    min_spread: Decimal,
    pools: crate::config::PoolsConfig,
    items: Vec<ItemSpec>,
    clock: Arc<dyn Clock>,
    rates: Option<RateCache>,
}

impl Analyzer {
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            rate_ttl_minutes: config.economy.rate_ttl_minutes,
            offer_cache: OfferCache::new(config.economy.offer_ttl_minutes, clock.clone()),
            engine: ProductionEngine::new(
                config.economy.country_bonus_divisor,
                config.economy.fallback_npc_wage,
            ),
            detector: ArbitrageDetector::new(
                config.economy.min_profit_percent,
                config.economy.ticket_cost_gold,
            ),
            min_spread: config.economy.min_spread,
            pools: config.pools.clone(),
            items: config.items.clone(),
            clock,
            rates: None,
        }
    }

    pub fn min_spread(&self) -> Decimal {
        self.min_spread
    }

    /// Run one full cycle.
    pub async fn run_cycle(
        &mut self,
        api: &dyn GameApi,
        factors: &ProductionFactors,
    ) -> Result<AnalysisReport> {
        let snapshot = load_snapshot(api, &self.pools).await?;
        let gold_id = snapshot
            .gold_id()
            .ok_or(Error::MissingReferenceData("gold currency"))?;

        // The cache survives across cycles unless the GOLD anchor moved.
        if self.rates.as_ref().map(RateCache::gold_id) != Some(gold_id) {
            self.rates = Some(RateCache::new(gold_id, self.rate_ttl_minutes, self.clock.clone()));
        }

        let offer_books = self.fetch_coin_offers(api, &snapshot, gold_id).await;
        self.refresh_rates(&offer_books);
        let rates = self.rates.as_ref().ok_or(Error::MissingReferenceData("rates"))?;

        let currency_markets = build_currency_markets(&offer_books);
        let currency_arbitrage = self.detector.find_currency_arbitrage(&currency_markets);

        let (item_markets, item_arbitrage) = self.analyze_items(api, &snapshot, rates).await;

        let production = self
            .engine
            .analyze_all_regions(&snapshot.regions, factors, &snapshot.npc_wages);

        info!(
            markets = currency_markets.len(),
            currency_pairs = currency_arbitrage.len(),
            item_pairs = item_arbitrage.len(),
            production_rows = production.len(),
            "cycle complete"
        );

        Ok(AnalysisReport {
            currency_extremes: rates.extremes(),
            currency_markets,
            currency_arbitrage,
            item_markets,
            item_arbitrage,
            production,
        })
    }

    /// Fetch every non-GOLD currency's offer book with the market pool.
    /// Each task owns exactly one currency id, so keyed results never race.
    async fn fetch_coin_offers(
        &self,
        api: &dyn GameApi,
        snapshot: &EconomySnapshot,
        gold_id: crate::domain::CurrencyId,
    ) -> Vec<(Currency, Vec<CoinOffer>)> {
        let targets: Vec<Currency> = snapshot
            .currencies
            .iter()
            .filter(|c| c.id != gold_id)
            .cloned()
            .collect();

        stream::iter(targets)
            .map(|currency| async move {
                let offers = api.coin_offers(currency.id).await.unwrap_or_default();
                (currency, offers)
            })
            .buffered(self.pools.market_workers.max(1))
            .collect()
            .await
    }

    /// Derive and store a rate per currency. A book with no usable SELL
    /// offers leaves the previous rate in place (fail-open).
    fn refresh_rates(&self, offer_books: &[(Currency, Vec<CoinOffer>)]) {
        let Some(rates) = self.rates.as_ref() else {
            return;
        };
        for (currency, offers) in offer_books {
            match rate_from_offers(offers) {
                Some(rate) => rates.insert(currency.id, rate),
                None => {
                    if rates.rate(currency.id).is_some() {
                        debug!(currency = %currency.name, "no sell offers, keeping stale rate");
                    } else {
                        warn!(currency = %currency.name, "no sell offers and no cached rate");
                    }
                }
            }
        }
    }

    /// Item passes: per-item cross-country market analysis plus arbitrage.
    async fn analyze_items(
        &self,
        api: &dyn GameApi,
        snapshot: &EconomySnapshot,
        rates: &RateCache,
    ) -> (Vec<ItemMarketAnalysis>, Vec<ArbitrageOpportunity>) {
        let mut item_markets = Vec::new();
        let mut item_arbitrage = Vec::new();

        for item in &self.items {
            let item_id = ItemId::new(item.id);
            let books = self.fetch_item_offers(api, snapshot, item_id).await;

            let gold_offers = price_in_gold(snapshot, rates, &books);
            if let Some(analysis) = analyze_item_market(item_id, &item.name, &gold_offers) {
                item_markets.push(analysis);
            }

            let country_prices = cheapest_per_country(&books, &gold_offers);
            item_arbitrage.extend(self.detector.find_item_arbitrage(
                item_id,
                &item.name,
                &country_prices,
            ));
        }

        // Items are scanned independently; merge and re-rank.
        item_arbitrage.sort_by(|a, b| b.profit_percent.cmp(&a.profit_percent));
        (item_markets, item_arbitrage)
    }

    /// Per-country offer books for one item, served from the offer cache
    /// when fresh.
    async fn fetch_item_offers(
        &self,
        api: &dyn GameApi,
        snapshot: &EconomySnapshot,
        item_id: ItemId,
    ) -> Vec<(CountryId, Vec<ItemOffer>)> {
        let mut cached = Vec::new();
        let mut to_fetch = Vec::new();
        for country in &snapshot.countries {
            match self.offer_cache.get_fresh(item_id, country.id) {
                Some(offers) => cached.push((country.id, offers)),
                None => to_fetch.push(country.id),
            }
        }

        let fetched: Vec<(CountryId, Vec<ItemOffer>)> = stream::iter(to_fetch)
            .map(|country_id| async move {
                let offers = api.item_offers(item_id, country_id).await.unwrap_or_default();
                (country_id, offers)
            })
            .buffered(self.pools.market_workers.max(1))
            .collect()
            .await;

        for (country_id, offers) in &fetched {
            self.offer_cache.insert(item_id, *country_id, offers.clone());
        }

        cached.extend(fetched);
        cached
    }
}

/// Aggregate one market summary per currency with a two-sided book.
fn build_currency_markets(offer_books: &[(Currency, Vec<CoinOffer>)]) -> Vec<CurrencyMarket> {
    offer_books
        .iter()
        .filter_map(|(currency, offers)| {
            aggregate_currency_market(currency.id, &currency.name, offers)
        })
        .collect()
}

/// Convert a set of per-country books into GOLD-priced offers, dropping
/// countries whose currency has no usable rate.
fn price_in_gold(
    snapshot: &EconomySnapshot,
    rates: &RateCache,
    books: &[(CountryId, Vec<ItemOffer>)],
) -> Vec<GoldPricedOffer> {
    let mut priced = Vec::new();
    for (country_id, offers) in books {
        let Some(country) = snapshot.country(*country_id) else {
            continue;
        };
        for offer in offers {
            let Some(price_gold) = rates.convert_to_gold(offer.price_local, country.currency_id)
            else {
                continue;
            };
            priced.push(GoldPricedOffer {
                country_id: *country_id,
                country_name: country.name.clone(),
                price_gold,
                amount: offer.amount,
            });
        }
    }
    priced
}

/// Fold GOLD-priced offers into the cheapest listing per country, keeping
/// book depth for risk estimation.
fn cheapest_per_country(
    books: &[(CountryId, Vec<ItemOffer>)],
    gold_offers: &[GoldPricedOffer],
) -> Vec<CountryItemPrice> {
    let offer_counts: HashMap<CountryId, usize> = books
        .iter()
        .map(|(country_id, offers)| (*country_id, offers.len()))
        .collect();

    let mut per_country: HashMap<CountryId, CountryItemPrice> = HashMap::new();
    for offer in gold_offers {
        let entry = per_country
            .entry(offer.country_id)
            .or_insert_with(|| CountryItemPrice {
                country_id: offer.country_id,
                country_name: offer.country_name.clone(),
                cheapest_price_gold: offer.price_gold,
                available_amount: Decimal::ZERO,
                offer_count: offer_counts.get(&offer.country_id).copied().unwrap_or(0),
            });
        entry.cheapest_price_gold = entry.cheapest_price_gold.min(offer.price_gold);
        entry.available_amount += Decimal::from(offer.amount);
    }

    let mut prices: Vec<CountryItemPrice> = per_country.into_values().collect();
    prices.sort_by(|a, b| a.country_id.cmp(&b.country_id));
    prices
}
