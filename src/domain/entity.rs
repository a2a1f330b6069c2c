//! Canonical reference-entity records.
//!
//! Every entity fetched from upstream is normalized into exactly one record
//! type here. Downstream code never sees raw JSON maps; a field either made
//! it into the record during snapshot loading or it does not exist for this
//! cycle.
//!
//! All records are plain values owned by the calculation run that produced
//! them. A refresh cycle supersedes them wholesale; nothing is mutated in
//! place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{CountryId, CurrencyId, ItemId, RegionId};

/// A game currency. GOLD is the reference currency and always converts 1:1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub name: String,
    pub code: String,
}

/// A country and the currency its markets trade in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub currency_id: CurrencyId,
}

/// A region snapshot: ownership, pollution and the raw bonus descriptor.
///
/// The descriptor stays unparsed here; `bonus::parse_bonus_descriptor`
/// turns it into typed values at the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub country_id: CountryId,
    pub country_name: String,
    /// Pollution in the 0-100 range.
    pub pollution: Decimal,
    /// Space-separated `TYPE:VALUE` tokens, e.g. `"WEAPONS:20 TICKETS:15"`.
    pub bonus_descriptor: String,
}

/// Which side of a market an offer sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfferSide {
    Buy,
    Sell,
}

/// A single offer on a currency market, priced in GOLD per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinOffer {
    pub rate: Decimal,
    pub amount: Decimal,
    pub side: OfferSide,
}

impl CoinOffer {
    pub fn new(rate: Decimal, amount: Decimal, side: OfferSide) -> Self {
        Self { rate, amount, side }
    }
}

/// A sell offer for an item on one country's goods market, priced in the
/// country's local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOffer {
    pub item_id: ItemId,
    pub country_id: CountryId,
    pub price_local: Decimal,
    pub amount: i64,
}

/// A job offer, used to derive the NPC baseline wage per country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub country_id: CountryId,
    pub wage_gold: Decimal,
}
