//! Currency-to-GOLD rate cache.
//!
//! GOLD is the anchor currency with an implicit rate of exactly 1. Every
//! other rate is learned from market SELL offers and expires after a TTL;
//! a stale entry keeps serving its last value until replaced (fail-open).

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::clock::Clock;
use super::entity::{CoinOffer, OfferSide};
use super::ids::CurrencyId;

#[derive(Debug, Clone, Copy)]
struct RateEntry {
    rate: Decimal,
    fetched_at: DateTime<Utc>,
}

/// Highest- and lowest-valued known currencies against GOLD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CurrencyExtremes {
    pub highest: (CurrencyId, Decimal),
    pub lowest: (CurrencyId, Decimal),
}

/// Thread-safe cache of currency rates expressed in GOLD per unit.
pub struct RateCache {
    rates: RwLock<HashMap<CurrencyId, RateEntry>>,
    gold_id: CurrencyId,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    pub fn new(gold_id: CurrencyId, ttl_minutes: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            rates: RwLock::new(HashMap::new()),
            gold_id,
            ttl: Duration::minutes(ttl_minutes),
            clock,
        }
    }

    pub fn gold_id(&self) -> CurrencyId {
        self.gold_id
    }

    /// Last known rate for a currency, stale or not. GOLD is always 1.
    pub fn rate(&self, currency_id: CurrencyId) -> Option<Decimal> {
        if currency_id == self.gold_id {
            return Some(Decimal::ONE);
        }
        self.rates.read().get(&currency_id).map(|e| e.rate)
    }

    /// Whether the entry is missing or older than the TTL. GOLD is never
    /// stale.
    pub fn is_stale(&self, currency_id: CurrencyId) -> bool {
        if currency_id == self.gold_id {
            return false;
        }
        match self.rates.read().get(&currency_id) {
            Some(entry) => self.clock.now() - entry.fetched_at >= self.ttl,
            None => true,
        }
    }

    /// Store a rate. Rejects GOLD itself and non-positive rates.
    pub fn insert(&self, currency_id: CurrencyId, rate: Decimal) {
        if currency_id == self.gold_id || rate <= Decimal::ZERO {
            return;
        }
        self.rates.write().insert(
            currency_id,
            RateEntry {
                rate,
                fetched_at: self.clock.now(),
            },
        );
    }

    /// Convert a local-currency amount into GOLD. `None` when no usable
    /// rate is known.
    pub fn convert_to_gold(&self, amount: Decimal, currency_id: CurrencyId) -> Option<Decimal> {
        if currency_id == self.gold_id {
            return Some(amount);
        }
        let rate = self.rate(currency_id)?;
        if rate <= Decimal::ZERO {
            return None;
        }
        Some(amount * rate)
    }

    /// Snapshot of all known rates, GOLD included at exactly 1.
    pub fn build_rates_map(&self) -> HashMap<CurrencyId, Decimal> {
        let mut map: HashMap<CurrencyId, Decimal> = self
            .rates
            .read()
            .iter()
            .map(|(id, entry)| (*id, entry.rate))
            .collect();
        map.insert(self.gold_id, Decimal::ONE);
        map
    }

    /// Strongest and weakest non-GOLD currencies, or `None` when the cache
    /// holds no foreign rates yet.
    pub fn extremes(&self) -> Option<CurrencyExtremes> {
        let rates = self.rates.read();
        let mut iter = rates.iter();
        let (first_id, first) = iter.next()?;
        let mut highest = (*first_id, first.rate);
        let mut lowest = highest;
        for (id, entry) in iter {
            if entry.rate > highest.1 {
                highest = (*id, entry.rate);
            }
            if entry.rate < lowest.1 {
                lowest = (*id, entry.rate);
            }
        }
        Some(CurrencyExtremes { highest, lowest })
    }

    pub fn len(&self) -> usize {
        self.rates.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.read().is_empty()
    }
}

/// Derive a currency's GOLD rate from its market offers: the lowest
/// positively priced SELL offer, the price a buyer would actually pay.
pub fn rate_from_offers(offers: &[CoinOffer]) -> Option<Decimal> {
    offers
        .iter()
        .filter(|o| o.side == OfferSide::Sell && o.rate > Decimal::ZERO)
        .map(|o| o.rate)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use rust_decimal_macros::dec;

    const GOLD: CurrencyId = CurrencyId::new(1);
    const EUR: CurrencyId = CurrencyId::new(7);

    fn cache_with_clock() -> (RateCache, ManualClock) {
        let clock = ManualClock::default();
        let cache = RateCache::new(GOLD, 15, Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn gold_rate_is_always_one() {
        let (cache, _clock) = cache_with_clock();
        assert_eq!(cache.rate(GOLD), Some(Decimal::ONE));
        assert!(!cache.is_stale(GOLD));
        assert_eq!(cache.convert_to_gold(dec!(42), GOLD), Some(dec!(42)));
    }

    #[test]
    fn convert_multiplies_by_the_cached_rate() {
        let (cache, _clock) = cache_with_clock();
        cache.insert(EUR, dec!(0.02));
        assert_eq!(cache.convert_to_gold(dec!(500), EUR), Some(dec!(10.00)));
    }

    #[test]
    fn convert_fails_without_a_rate() {
        let (cache, _clock) = cache_with_clock();
        assert_eq!(cache.convert_to_gold(dec!(500), EUR), None);
    }

    #[test]
    fn entries_go_stale_but_keep_their_value() {
        let (cache, clock) = cache_with_clock();
        cache.insert(EUR, dec!(0.02));
        assert!(!cache.is_stale(EUR));

        clock.advance(Duration::minutes(16));
        assert!(cache.is_stale(EUR));
        assert_eq!(cache.rate(EUR), Some(dec!(0.02)));
        assert_eq!(cache.convert_to_gold(dec!(100), EUR), Some(dec!(2.00)));
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let (cache, _clock) = cache_with_clock();
        cache.insert(EUR, Decimal::ZERO);
        cache.insert(EUR, dec!(-0.5));
        assert_eq!(cache.rate(EUR), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn gold_cannot_be_overwritten() {
        let (cache, _clock) = cache_with_clock();
        cache.insert(GOLD, dec!(2));
        assert_eq!(cache.rate(GOLD), Some(Decimal::ONE));
        assert!(cache.is_empty());
    }

    #[test]
    fn rates_map_includes_gold() {
        let (cache, _clock) = cache_with_clock();
        cache.insert(EUR, dec!(0.02));
        let map = cache.build_rates_map();
        assert_eq!(map.get(&GOLD), Some(&Decimal::ONE));
        assert_eq!(map.get(&EUR), Some(&dec!(0.02)));
    }

    #[test]
    fn extremes_track_highest_and_lowest() {
        let (cache, _clock) = cache_with_clock();
        assert!(cache.extremes().is_none());

        cache.insert(EUR, dec!(0.02));
        cache.insert(CurrencyId::new(8), dec!(0.5));
        cache.insert(CurrencyId::new(9), dec!(0.001));

        let extremes = cache.extremes().unwrap();
        assert_eq!(extremes.highest, (CurrencyId::new(8), dec!(0.5)));
        assert_eq!(extremes.lowest, (CurrencyId::new(9), dec!(0.001)));
    }

    #[test]
    fn rate_comes_from_the_lowest_positive_sell_offer() {
        let offers = vec![
            CoinOffer {
                rate: dec!(0.020),
                amount: dec!(100),
                side: OfferSide::Sell,
            },
            CoinOffer {
                rate: dec!(0.015),
                amount: dec!(50),
                side: OfferSide::Sell,
            },
            CoinOffer {
                rate: dec!(0.001),
                amount: dec!(10),
                side: OfferSide::Buy,
            },
            CoinOffer {
                rate: Decimal::ZERO,
                amount: dec!(10),
                side: OfferSide::Sell,
            },
        ];
        assert_eq!(rate_from_offers(&offers), Some(dec!(0.015)));
    }

    #[test]
    fn no_sell_offers_means_no_rate() {
        let offers = vec![CoinOffer {
            rate: dec!(0.02),
            amount: dec!(100),
            side: OfferSide::Buy,
        }];
        assert_eq!(rate_from_offers(&offers), None);
    }
}
