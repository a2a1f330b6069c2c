//! Upstream game API access.
//!
//! All endpoints share a `{code, data}` envelope. Anything other than a
//! 200 code, a transport failure, or a malformed payload is degraded to
//! "no data" here, so the calculation layer never sees a fetch error.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::domain::{
    CoinOffer, Country, CountryId, Currency, CurrencyId, ItemId, ItemOffer, JobOffer, Region,
};

pub use client::ApiClient;

/// Read access to the game's reference and market endpoints.
///
/// `None` uniformly means "no data for this entity right now", never a
/// hard failure.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn countries(&self) -> Option<Vec<Country>>;
    async fn currencies(&self) -> Option<Vec<Currency>>;
    async fn regions(&self) -> Option<Vec<Region>>;
    async fn coin_offers(&self, currency_id: CurrencyId) -> Option<Vec<CoinOffer>>;
    async fn item_offers(&self, item_id: ItemId, country_id: CountryId)
        -> Option<Vec<ItemOffer>>;
    async fn job_offers(&self, country_id: CountryId) -> Option<Vec<JobOffer>>;
}
