//! Wire representations of the game API payloads.
//!
//! Raw DTOs stay in this module; everything past the client boundary works
//! with the domain types they convert into.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{
    CoinOffer, Country, CountryId, Currency, CurrencyId, ItemId, ItemOffer, JobOffer, OfferSide,
    Region, RegionId,
};

/// Common `{code, data}` response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct RawCountry {
    pub id: i64,
    pub name: String,
    pub currency_id: i64,
}

impl RawCountry {
    pub fn into_domain(self) -> Country {
        Country {
            id: CountryId::new(self.id),
            name: self.name,
            currency_id: CurrencyId::new(self.currency_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawCurrency {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

impl RawCurrency {
    pub fn into_domain(self) -> Currency {
        Currency {
            id: CurrencyId::new(self.id),
            name: self.name,
            code: self.code,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawRegion {
    pub id: i64,
    pub name: String,
    pub country_id: i64,
    pub country_name: String,
    #[serde(default)]
    pub pollution: Decimal,
    /// Space-separated `TYPE:VALUE` tokens, e.g. `"GRAIN:15 IRON:5"`.
    #[serde(default, alias = "bonus_description")]
    pub bonus: String,
}

impl RawRegion {
    pub fn into_domain(self) -> Region {
        Region {
            id: RegionId::new(self.id),
            name: self.name,
            country_id: CountryId::new(self.country_id),
            country_name: self.country_name,
            pollution: self.pollution,
            bonus_descriptor: self.bonus,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawCoinOffer {
    pub rate: Decimal,
    pub amount: Decimal,
    pub side: OfferSide,
}

impl RawCoinOffer {
    pub fn into_domain(self) -> CoinOffer {
        CoinOffer {
            rate: self.rate,
            amount: self.amount,
            side: self.side,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawItemOffer {
    pub item_id: i64,
    pub country_id: i64,
    #[serde(alias = "price")]
    pub price_local: Decimal,
    pub amount: i64,
}

impl RawItemOffer {
    pub fn into_domain(self) -> ItemOffer {
        ItemOffer {
            item_id: ItemId::new(self.item_id),
            country_id: CountryId::new(self.country_id),
            price_local: self.price_local,
            amount: self.amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawJobOffer {
    pub country_id: i64,
    /// Wage already expressed in GOLD.
    #[serde(alias = "salary_gold")]
    pub wage_gold: Decimal,
}

impl RawJobOffer {
    pub fn into_domain(self) -> JobOffer {
        JobOffer {
            country_id: CountryId::new(self.country_id),
            wage_gold: self.wage_gold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn envelope_with_data() {
        let json = r#"{"code": 200, "data": [{"id": 7, "name": "Euro", "code": "EUR"}]}"#;
        let env: Envelope<Vec<RawCurrency>> = serde_json::from_str(json).unwrap();
        assert_eq!(env.code, 200);
        let currencies: Vec<Currency> = env
            .data
            .unwrap()
            .into_iter()
            .map(RawCurrency::into_domain)
            .collect();
        assert_eq!(currencies[0].id, CurrencyId::new(7));
        assert_eq!(currencies[0].code, "EUR");
    }

    #[test]
    fn envelope_without_data() {
        let json = r#"{"code": 404, "data": null}"#;
        let env: Envelope<Vec<RawCurrency>> = serde_json::from_str(json).unwrap();
        assert_eq!(env.code, 404);
        assert!(env.data.is_none());
    }

    #[test]
    fn region_bonus_field_aliases() {
        let json = r#"{
            "id": 1, "name": "Alpha", "country_id": 2, "country_name": "Iceland",
            "pollution": "12.5", "bonus_description": "GRAIN:15 IRON:5"
        }"#;
        let region = serde_json::from_str::<RawRegion>(json).unwrap().into_domain();
        assert_eq!(region.pollution, dec!(12.5));
        assert_eq!(region.bonus_descriptor, "GRAIN:15 IRON:5");
    }

    #[test]
    fn offer_side_uses_uppercase_wire_names() {
        let json = r#"{"rate": "0.02", "amount": "100", "side": "SELL"}"#;
        let offer = serde_json::from_str::<RawCoinOffer>(json).unwrap().into_domain();
        assert_eq!(offer.side, OfferSide::Sell);
    }
}
