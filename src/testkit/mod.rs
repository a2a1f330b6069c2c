//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via the `testkit` feature, which the crate's own dev-dependency
//! turns on during `cargo test`.
//!
//! Provides concise factory functions for reference entities and offers,
//! plus [`StubApi`], a scripted [`GameApi`] with per-endpoint call counts.

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::GameApi;
use crate::domain::{
    CoinOffer, Country, CountryId, Currency, CurrencyId, ItemId, ItemOffer, JobOffer, OfferSide,
    Region, RegionId,
};

/// Create a [`Country`] paying in the given currency.
pub fn country(id: i64, name: &str, currency_id: i64) -> Country {
    Country {
        id: CountryId::new(id),
        name: name.to_string(),
        currency_id: CurrencyId::new(currency_id),
    }
}

/// Create a [`Currency`].
pub fn currency(id: i64, name: &str, code: &str) -> Currency {
    Currency {
        id: CurrencyId::new(id),
        name: name.to_string(),
        code: code.to_string(),
    }
}

/// Create a [`Region`] with a bonus descriptor and pollution.
pub fn region(
    id: i64,
    name: &str,
    country_id: i64,
    country_name: &str,
    pollution: Decimal,
    bonus: &str,
) -> Region {
    Region {
        id: RegionId::new(id),
        name: name.to_string(),
        country_id: CountryId::new(country_id),
        country_name: country_name.to_string(),
        pollution,
        bonus_descriptor: bonus.to_string(),
    }
}

/// Create a [`CoinOffer`].
pub fn coin_offer(rate: Decimal, amount: Decimal, side: OfferSide) -> CoinOffer {
    CoinOffer { rate, amount, side }
}

/// Create an [`ItemOffer`] priced in the country's local currency.
pub fn item_offer(item_id: i64, country_id: i64, price_local: Decimal, amount: i64) -> ItemOffer {
    ItemOffer {
        item_id: ItemId::new(item_id),
        country_id: CountryId::new(country_id),
        price_local,
        amount,
    }
}

/// Create a [`JobOffer`] with a wage in GOLD.
pub fn job_offer(country_id: i64, wage_gold: Decimal) -> JobOffer {
    JobOffer {
        country_id: CountryId::new(country_id),
        wage_gold,
    }
}

/// Scripted [`GameApi`]: endpoints answer from fixed tables, unseeded
/// endpoints answer `None`. Counts item-offer calls so cache behavior is
/// observable.
#[derive(Default, Clone)]
pub struct StubApi {
    countries: Option<Vec<Country>>,
    currencies: Option<Vec<Currency>>,
    regions: Option<Vec<Region>>,
    coin_offers: HashMap<CurrencyId, Vec<CoinOffer>>,
    item_offers: HashMap<(ItemId, CountryId), Vec<ItemOffer>>,
    job_offers: HashMap<CountryId, Vec<JobOffer>>,
    item_offer_calls: Arc<Mutex<usize>>,
}

impl StubApi {
    pub fn with_countries(mut self, countries: Vec<Country>) -> Self {
        self.countries = Some(countries);
        self
    }

    pub fn with_currencies(mut self, currencies: Vec<Currency>) -> Self {
        self.currencies = Some(currencies);
        self
    }

    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn with_coin_offers(mut self, currency_id: CurrencyId, offers: Vec<CoinOffer>) -> Self {
        self.coin_offers.insert(currency_id, offers);
        self
    }

    pub fn with_item_offers(
        mut self,
        item_id: ItemId,
        country_id: CountryId,
        offers: Vec<ItemOffer>,
    ) -> Self {
        self.item_offers.insert((item_id, country_id), offers);
        self
    }

    pub fn with_job_offers(mut self, country_id: CountryId, offers: Vec<JobOffer>) -> Self {
        self.job_offers.insert(country_id, offers);
        self
    }

    /// How many times `item_offers` hit this stub instead of a cache.
    pub fn item_offer_calls(&self) -> usize {
        *self.item_offer_calls.lock()
    }
}

#[async_trait]
impl GameApi for StubApi {
    async fn countries(&self) -> Option<Vec<Country>> {
        self.countries.clone()
    }

    async fn currencies(&self) -> Option<Vec<Currency>> {
        self.currencies.clone()
    }

    async fn regions(&self) -> Option<Vec<Region>> {
        self.regions.clone()
    }

    async fn coin_offers(&self, currency_id: CurrencyId) -> Option<Vec<CoinOffer>> {
        self.coin_offers.get(&currency_id).cloned()
    }

    async fn item_offers(
        &self,
        item_id: ItemId,
        country_id: CountryId,
    ) -> Option<Vec<ItemOffer>> {
        *self.item_offer_calls.lock() += 1;
        self.item_offers.get(&(item_id, country_id)).cloned()
    }

    async fn job_offers(&self, country_id: CountryId) -> Option<Vec<JobOffer>> {
        self.job_offers.get(&country_id).cloned()
    }
}
