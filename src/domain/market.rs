//! Market offer aggregation.
//!
//! Turns raw offer books into per-currency summaries and per-item
//! cross-country analyses, plus a short-lived offer cache so a full
//! analysis cycle never fetches the same book twice.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::prelude::MathematicalOps;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::clock::Clock;
use super::entity::{CoinOffer, ItemOffer, OfferSide};
use super::ids::{CountryId, ItemId};

/// Aggregated view of one currency's order book.
///
/// The spread is best sell minus best buy and may be negative when the
/// book is crossed; a negative spread is itself a signal, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMarket {
    pub currency_id: super::ids::CurrencyId,
    pub currency_name: String,
    pub best_buy_rate: Decimal,
    pub best_sell_rate: Decimal,
    pub spread: Decimal,
    pub volume: Decimal,
    pub volatility: Decimal,
    pub liquidity_score: Decimal,
    pub buy_offer_count: usize,
    pub sell_offer_count: usize,
    pub top_buy_amount: Decimal,
    pub top_sell_amount: Decimal,
}

/// Summarize one currency's offers. `None` when either side of the book
/// is empty; a one-sided book has no spread to speak of.
pub fn aggregate_currency_market(
    currency_id: super::ids::CurrencyId,
    currency_name: &str,
    offers: &[CoinOffer],
) -> Option<CurrencyMarket> {
    let buys: Vec<&CoinOffer> = offers.iter().filter(|o| o.side == OfferSide::Buy).collect();
    let sells: Vec<&CoinOffer> = offers.iter().filter(|o| o.side == OfferSide::Sell).collect();
    if buys.is_empty() || sells.is_empty() {
        return None;
    }

    let best_buy = buys.iter().max_by_key(|o| o.rate)?;
    let best_sell = sells.iter().min_by_key(|o| o.rate)?;

    let volume: Decimal = offers.iter().map(|o| o.amount).sum();
    let rates: Vec<Decimal> = offers.iter().map(|o| o.rate).collect();

    Some(CurrencyMarket {
        currency_id,
        currency_name: currency_name.to_string(),
        best_buy_rate: best_buy.rate,
        best_sell_rate: best_sell.rate,
        spread: best_sell.rate - best_buy.rate,
        volume,
        volatility: std_deviation(&rates),
        liquidity_score: liquidity_score(offers.len()),
        buy_offer_count: buys.len(),
        sell_offer_count: sells.len(),
        top_buy_amount: best_buy.amount,
        top_sell_amount: best_sell.amount,
    })
}

/// Offer-count liquidity proxy, saturating at 100 offers.
pub fn liquidity_score(offer_count: usize) -> Decimal {
    (Decimal::from(offer_count as u64) / Decimal::from(100)).min(Decimal::ONE)
}

/// Sample standard deviation (n - 1). Zero for fewer than two values.
pub fn std_deviation(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len() as u64);
    let mean: Decimal = values.iter().copied().sum::<Decimal>() / n;
    let variance: Decimal = values
        .iter()
        .map(|v| {
            let d = *v - mean;
            d * d
        })
        .sum::<Decimal>()
        / (n - Decimal::ONE);
    variance.sqrt().unwrap_or(Decimal::ZERO)
}

/// An item offer with its price already converted into GOLD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldPricedOffer {
    pub country_id: CountryId,
    pub country_name: String,
    pub price_gold: Decimal,
    pub amount: i64,
}

/// Cross-country view of one item's market, all prices in GOLD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMarketAnalysis {
    pub item_id: ItemId,
    pub item_name: String,
    pub total_offers: usize,
    pub cheapest: GoldPricedOffer,
    pub most_expensive: GoldPricedOffer,
    pub average_price: Decimal,
    pub median_price: Decimal,
    /// Up to five countries by ascending average price.
    pub best_countries: Vec<(String, Decimal)>,
    pub market_depth: i64,
    pub price_volatility: Decimal,
}

/// Analyze one item across every country it trades in. `None` on an empty
/// offer set.
pub fn analyze_item_market(
    item_id: ItemId,
    item_name: &str,
    offers: &[GoldPricedOffer],
) -> Option<ItemMarketAnalysis> {
    if offers.is_empty() {
        return None;
    }

    let cheapest = offers.iter().min_by_key(|o| o.price_gold)?.clone();
    let most_expensive = offers.iter().max_by_key(|o| o.price_gold)?.clone();

    let mut prices: Vec<Decimal> = offers.iter().map(|o| o.price_gold).collect();
    prices.sort();
    let average_price = prices.iter().copied().sum::<Decimal>() / Decimal::from(prices.len() as u64);
    let median_price = if prices.len() % 2 == 1 {
        prices[prices.len() / 2]
    } else {
        (prices[prices.len() / 2 - 1] + prices[prices.len() / 2]) / Decimal::from(2)
    };

    let mut by_country: HashMap<&str, (Decimal, u64)> = HashMap::new();
    for offer in offers {
        let entry = by_country
            .entry(offer.country_name.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += offer.price_gold;
        entry.1 += 1;
    }
    let mut best_countries: Vec<(String, Decimal)> = by_country
        .into_iter()
        .map(|(name, (sum, count))| (name.to_string(), sum / Decimal::from(count)))
        .collect();
    best_countries.sort_by(|a, b| a.1.cmp(&b.1));
    best_countries.truncate(5);

    Some(ItemMarketAnalysis {
        item_id,
        item_name: item_name.to_string(),
        total_offers: offers.len(),
        cheapest,
        most_expensive,
        average_price,
        median_price,
        best_countries,
        market_depth: offers.iter().map(|o| o.amount).sum(),
        price_volatility: std_deviation(&prices),
    })
}

struct OfferEntry {
    offers: Vec<ItemOffer>,
    fetched_at: DateTime<Utc>,
}

/// Short-lived cache of per-(item, country) offer books. Unlike the rate
/// cache this one fails closed: a stale book is not returned.
pub struct OfferCache {
    entries: RwLock<HashMap<(ItemId, CountryId), OfferEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl OfferCache {
    pub fn new(ttl_minutes: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::minutes(ttl_minutes),
            clock,
        }
    }

    pub fn get_fresh(&self, item_id: ItemId, country_id: CountryId) -> Option<Vec<ItemOffer>> {
        let entries = self.entries.read();
        let entry = entries.get(&(item_id, country_id))?;
        if self.clock.now() - entry.fetched_at >= self.ttl {
            return None;
        }
        Some(entry.offers.clone())
    }

    pub fn insert(&self, item_id: ItemId, country_id: CountryId, offers: Vec<ItemOffer>) {
        self.entries.write().insert(
            (item_id, country_id),
            OfferEntry {
                offers,
                fetched_at: self.clock.now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::ids::CurrencyId;
    use rust_decimal_macros::dec;

    fn offer(rate: Decimal, amount: Decimal, side: OfferSide) -> CoinOffer {
        CoinOffer { rate, amount, side }
    }

    #[test]
    fn best_rates_and_spread() {
        let offers = vec![
            offer(dec!(0.018), dec!(100), OfferSide::Buy),
            offer(dec!(0.019), dec!(50), OfferSide::Buy),
            offer(dec!(0.021), dec!(200), OfferSide::Sell),
            offer(dec!(0.022), dec!(80), OfferSide::Sell),
        ];
        let market = aggregate_currency_market(CurrencyId::new(7), "EUR", &offers).unwrap();

        assert_eq!(market.best_buy_rate, dec!(0.019));
        assert_eq!(market.best_sell_rate, dec!(0.021));
        assert_eq!(market.spread, dec!(0.002));
        assert_eq!(market.volume, dec!(430));
        assert_eq!(market.buy_offer_count, 2);
        assert_eq!(market.sell_offer_count, 2);
        assert_eq!(market.top_buy_amount, dec!(50));
        assert_eq!(market.top_sell_amount, dec!(200));
    }

    #[test]
    fn crossed_book_yields_negative_spread() {
        let offers = vec![
            offer(dec!(0.025), dec!(10), OfferSide::Buy),
            offer(dec!(0.020), dec!(10), OfferSide::Sell),
        ];
        let market = aggregate_currency_market(CurrencyId::new(7), "EUR", &offers).unwrap();
        assert_eq!(market.spread, dec!(-0.005));
    }

    #[test]
    fn one_sided_book_is_skipped() {
        let offers = vec![offer(dec!(0.02), dec!(10), OfferSide::Buy)];
        assert!(aggregate_currency_market(CurrencyId::new(7), "EUR", &offers).is_none());
        assert!(aggregate_currency_market(CurrencyId::new(7), "EUR", &[]).is_none());
    }

    #[test]
    fn liquidity_saturates_at_one_hundred_offers() {
        assert_eq!(liquidity_score(0), Decimal::ZERO);
        assert_eq!(liquidity_score(50), dec!(0.5));
        assert_eq!(liquidity_score(100), Decimal::ONE);
        assert_eq!(liquidity_score(250), Decimal::ONE);
    }

    #[test]
    fn single_rate_has_zero_volatility() {
        assert_eq!(std_deviation(&[dec!(0.02)]), Decimal::ZERO);
        assert_eq!(std_deviation(&[]), Decimal::ZERO);
    }

    #[test]
    fn identical_rates_have_zero_volatility() {
        assert_eq!(
            std_deviation(&[dec!(0.02), dec!(0.02), dec!(0.02)]),
            Decimal::ZERO
        );
    }

    fn gold_offer(country: &str, price: Decimal, amount: i64) -> GoldPricedOffer {
        GoldPricedOffer {
            country_id: CountryId::new(1),
            country_name: country.to_string(),
            price_gold: price,
            amount,
        }
    }

    #[test]
    fn item_analysis_median_and_country_ranking() {
        let offers = vec![
            gold_offer("Iceland", dec!(0.30), 10),
            gold_offer("Iceland", dec!(0.40), 20),
            gold_offer("Norway", dec!(0.20), 5),
            gold_offer("Norway", dec!(0.25), 15),
        ];
        let analysis = analyze_item_market(ItemId::new(3), "Iron", &offers).unwrap();

        assert_eq!(analysis.total_offers, 4);
        assert_eq!(analysis.cheapest.price_gold, dec!(0.20));
        assert_eq!(analysis.most_expensive.price_gold, dec!(0.40));
        // sorted: 0.20 0.25 0.30 0.40 -> median 0.275
        assert_eq!(analysis.median_price, dec!(0.275));
        assert_eq!(analysis.market_depth, 50);

        // Norway averages 0.225, Iceland 0.35.
        assert_eq!(analysis.best_countries[0].0, "Norway");
        assert_eq!(analysis.best_countries[1].0, "Iceland");
    }

    #[test]
    fn item_analysis_requires_offers() {
        assert!(analyze_item_market(ItemId::new(3), "Iron", &[]).is_none());
    }

    #[test]
    fn offer_cache_expires_stale_books() {
        let clock = ManualClock::default();
        let cache = OfferCache::new(5, Arc::new(clock.clone()));
        let item = ItemId::new(3);
        let country = CountryId::new(1);

        let offers = vec![ItemOffer {
            item_id: item,
            country_id: country,
            price_local: dec!(12.5),
            amount: 40,
        }];
        cache.insert(item, country, offers.clone());
        assert_eq!(cache.get_fresh(item, country), Some(offers));

        clock.advance(Duration::minutes(6));
        assert_eq!(cache.get_fresh(item, country), None);
    }
}
