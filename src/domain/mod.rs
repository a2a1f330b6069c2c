//! Pure calculation core: no I/O, no global state.
//!
//! Everything here is a value transformation over snapshot data. The only
//! stateful pieces are the two caches, which take an injected [`Clock`] so
//! expiry is deterministic under test.

pub mod arbitrage;
pub mod bonus;
pub mod clock;
pub mod commodity;
pub mod entity;
pub mod ids;
pub mod market;
pub mod production;
pub mod rates;
pub mod risk;

pub use arbitrage::{ArbitrageDetector, ArbitrageOpportunity, ArbitragePair, CountryItemPrice};
pub use bonus::{
    parse_bonus_descriptor, region_efficiency_score, resolve_country_bonus,
    resolve_regional_bonus, BonusType, ParsedBonuses, ResolvedBonus,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use commodity::{BuildingType, Commodity, QualityTier};
pub use entity::{CoinOffer, Country, Currency, ItemOffer, JobOffer, OfferSide, Region};
pub use ids::{CountryId, CurrencyId, ItemId, RegionId};
pub use market::{
    aggregate_currency_market, analyze_item_market, CurrencyMarket, GoldPricedOffer,
    ItemMarketAnalysis, OfferCache,
};
pub use production::{
    clamp_level, ProductionEngine, ProductionFactors, ProductionResult, TierYields,
};
pub use rates::{rate_from_offers, CurrencyExtremes, RateCache};
pub use risk::RiskInputs;
