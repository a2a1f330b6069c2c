//! One refresh cycle starts from an immutable snapshot of reference data.
//!
//! Countries and currencies are the only fatal fetches; regions and job
//! offers degrade to empty, shrinking coverage instead of failing the run.

use futures_util::{stream, StreamExt};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::api::GameApi;
use crate::config::PoolsConfig;
use crate::domain::{Country, CountryId, Currency, CurrencyId, Region};
use crate::error::{Error, Result};

/// Immutable reference data for one analysis cycle.
#[derive(Debug, Clone)]
pub struct EconomySnapshot {
    pub countries: Vec<Country>,
    pub currencies: Vec<Currency>,
    pub regions: Vec<Region>,
    /// Lowest job-offer wage per country, in GOLD.
    pub npc_wages: HashMap<CountryId, Decimal>,
}

impl EconomySnapshot {
    /// The GOLD currency id, matched by code first and name second.
    pub fn gold_id(&self) -> Option<CurrencyId> {
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case("gold") || c.name.eq_ignore_ascii_case("gold"))
            .map(|c| c.id)
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }
}

/// Fetch a full snapshot. Job-offer lookups fan out with a bounded pool;
/// results collect in input order, so the wage map is deterministic.
pub async fn load_snapshot(api: &dyn GameApi, pools: &PoolsConfig) -> Result<EconomySnapshot> {
    let (countries, currencies, regions) =
        tokio::join!(api.countries(), api.currencies(), api.regions());

    let countries = countries.ok_or(Error::MissingReferenceData("countries"))?;
    let currencies = currencies.ok_or(Error::MissingReferenceData("currencies"))?;
    let regions = regions.unwrap_or_else(|| {
        warn!("regions unavailable, production analysis will be empty");
        Vec::new()
    });

    let npc_wages = load_npc_wages(api, &countries, pools.region_workers).await;

    info!(
        countries = countries.len(),
        currencies = currencies.len(),
        regions = regions.len(),
        wages = npc_wages.len(),
        "snapshot loaded"
    );

    Ok(EconomySnapshot {
        countries,
        currencies,
        regions,
        npc_wages,
    })
}

/// Cheapest job offer per country, in GOLD. Countries with no offers are
/// simply absent; the production engine falls back to its configured wage.
async fn load_npc_wages(
    api: &dyn GameApi,
    countries: &[Country],
    workers: usize,
) -> HashMap<CountryId, Decimal> {
    let results: Vec<(CountryId, Option<Decimal>)> = stream::iter(countries.iter().map(|c| c.id))
        .map(|country_id| async move {
            let wage = api
                .job_offers(country_id)
                .await
                .and_then(|offers| offers.iter().map(|o| o.wage_gold).min());
            (country_id, wage)
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    results
        .into_iter()
        .filter_map(|(id, wage)| wage.map(|w| (id, w)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::StubApi;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn missing_countries_is_fatal() {
        let api = StubApi::default().with_currencies(vec![]);
        let err = load_snapshot(&api, &PoolsConfig::default()).await;
        assert!(matches!(err, Err(Error::MissingReferenceData("countries"))));
    }

    #[tokio::test]
    async fn missing_regions_degrades_to_empty() {
        let api = StubApi::default()
            .with_countries(vec![crate::testkit::country(1, "Iceland", 1)])
            .with_currencies(vec![crate::testkit::currency(1, "Gold", "GOLD")]);
        let snapshot = load_snapshot(&api, &PoolsConfig::default()).await.unwrap();
        assert!(snapshot.regions.is_empty());
        assert_eq!(snapshot.gold_id(), Some(CurrencyId::new(1)));
    }

    #[tokio::test]
    async fn npc_wage_is_the_cheapest_offer() {
        let country = crate::testkit::country(1, "Iceland", 1);
        let api = StubApi::default()
            .with_countries(vec![country])
            .with_currencies(vec![crate::testkit::currency(1, "Gold", "GOLD")])
            .with_job_offers(
                CountryId::new(1),
                vec![
                    crate::testkit::job_offer(1, dec!(4.0)),
                    crate::testkit::job_offer(1, dec!(2.5)),
                ],
            );
        let snapshot = load_snapshot(&api, &PoolsConfig::default()).await.unwrap();
        assert_eq!(snapshot.npc_wages.get(&CountryId::new(1)), Some(&dec!(2.5)));
    }
}
