use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{
    Envelope, RawCoinOffer, RawCountry, RawCurrency, RawItemOffer, RawJobOffer, RawRegion,
};
use super::GameApi;
use crate::config::ApiConfig;
use crate::domain::{
    CoinOffer, Country, CountryId, Currency, CurrencyId, ItemId, ItemOffer, JobOffer, Region,
};
use crate::error::{FetchError, Result};

/// HTTP client over the game API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Fetch one endpoint and unwrap the envelope. Every failure mode is
    /// logged and collapsed into `None` so a single flaky endpoint cannot
    /// abort a whole analysis cycle.
    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Option<T> {
        match self.try_fetch(endpoint).await {
            Ok(data) => data,
            Err(err) => {
                warn!(endpoint, error = %err, "fetch failed");
                None
            }
        }
    }

    async fn try_fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> std::result::Result<Option<T>, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "fetching");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let envelope: Envelope<T> =
            response
                .json()
                .await
                .map_err(|err| FetchError::MalformedPayload {
                    endpoint: endpoint.to_string(),
                    reason: err.to_string(),
                })?;

        if envelope.code != 200 {
            return Err(FetchError::BadStatus {
                endpoint: endpoint.to_string(),
                code: envelope.code,
            });
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl GameApi for ApiClient {
    async fn countries(&self) -> Option<Vec<Country>> {
        let raw: Vec<RawCountry> = self.fetch("countries").await?;
        Some(raw.into_iter().map(RawCountry::into_domain).collect())
    }

    async fn currencies(&self) -> Option<Vec<Currency>> {
        let raw: Vec<RawCurrency> = self.fetch("currencies").await?;
        Some(raw.into_iter().map(RawCurrency::into_domain).collect())
    }

    async fn regions(&self) -> Option<Vec<Region>> {
        let raw: Vec<RawRegion> = self.fetch("regions").await?;
        Some(raw.into_iter().map(RawRegion::into_domain).collect())
    }

    async fn coin_offers(&self, currency_id: CurrencyId) -> Option<Vec<CoinOffer>> {
        let endpoint = format!("market/coin/get?currency_id={currency_id}");
        let raw: Vec<RawCoinOffer> = self.fetch(&endpoint).await?;
        Some(raw.into_iter().map(RawCoinOffer::into_domain).collect())
    }

    async fn item_offers(
        &self,
        item_id: ItemId,
        country_id: CountryId,
    ) -> Option<Vec<ItemOffer>> {
        let endpoint = format!("market/get?item_id={item_id}&country_id={country_id}");
        let raw: Vec<RawItemOffer> = self.fetch(&endpoint).await?;
        Some(raw.into_iter().map(RawItemOffer::into_domain).collect())
    }

    async fn job_offers(&self, country_id: CountryId) -> Option<Vec<JobOffer>> {
        let endpoint = format!("market/jobs/get?country_id={country_id}");
        let raw: Vec<RawJobOffer> = self.fetch(&endpoint).await?;
        Some(raw.into_iter().map(RawJobOffer::into_domain).collect())
    }
}
