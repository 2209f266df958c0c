//! External data gateway: country reference data and USD exchange rates.
//!
//! Both feeds sit behind the [`CountrySources`] trait so the refresh pipeline
//! can be exercised without the network.

use crate::config::AppConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

pub const COUNTRIES_SOURCE: &str = "Countries API";
pub const EXCHANGE_SOURCE: &str = "Exchange Rate API";

/// Country entry as the countries source provides it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub population: i64,
    pub flag: Option<String>,
    pub currencies: Option<Vec<RawCurrency>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrency {
    pub code: Option<String>,
}

#[async_trait]
pub trait CountrySources: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ApiError>;
    async fn fetch_exchange_rates(&self) -> Result<HashMap<String, f64>, ApiError>;
}

/// Fetch both feeds concurrently; either failure aborts the pair.
pub async fn fetch_all(
    sources: &dyn CountrySources,
) -> Result<(Vec<RawCountry>, HashMap<String, f64>), ApiError> {
    let (countries, rates) = tokio::join!(sources.fetch_countries(), sources.fetch_exchange_rates());
    Ok((countries?, rates?))
}

/// Live gateway over reqwest with a bounded per-request timeout.
#[derive(Clone)]
pub struct HttpSources {
    http: Client,
    countries_url: String,
    exchange_url: String,
}

#[derive(Debug, Deserialize)]
struct RatesEnvelope {
    rates: Option<HashMap<String, f64>>,
}

impl HttpSources {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| ApiError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            http,
            countries_url: config.countries_url.clone(),
            exchange_url: config.exchange_url.clone(),
        })
    }

    fn unavailable(source: &'static str, e: reqwest::Error) -> ApiError {
        let detail = if e.is_timeout() {
            "request timed out".to_string()
        } else {
            e.to_string()
        };
        ApiError::SourceUnavailable { source_name: source, detail }
    }
}

#[async_trait]
impl CountrySources for HttpSources {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ApiError> {
        let resp = self
            .http
            .get(&self.countries_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::unavailable(COUNTRIES_SOURCE, e))?;
        let countries: Vec<RawCountry> = resp
            .json()
            .await
            .map_err(|e| Self::unavailable(COUNTRIES_SOURCE, e))?;
        tracing::info!(count = countries.len(), "fetched countries");
        Ok(countries)
    }

    async fn fetch_exchange_rates(&self) -> Result<HashMap<String, f64>, ApiError> {
        let resp = self
            .http
            .get(&self.exchange_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::unavailable(EXCHANGE_SOURCE, e))?;
        let envelope: RatesEnvelope = resp
            .json()
            .await
            .map_err(|e| Self::unavailable(EXCHANGE_SOURCE, e))?;
        // A payload without a rates mapping is a malformed response, not a
        // partial success.
        let rates = envelope.rates.ok_or(ApiError::SourceUnavailable {
            source_name: EXCHANGE_SOURCE,
            detail: "invalid response format (missing rates)".to_string(),
        })?;
        tracing::info!(count = rates.len(), "fetched exchange rates");
        Ok(rates)
    }
}
