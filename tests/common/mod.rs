#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use country_currency_api::domain::Country;
use country_currency_api::error::ApiError;
use country_currency_api::sources::{CountrySources, RawCountry, EXCHANGE_SOURCE};
use country_currency_api::util::db::Db;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Notify;

/// Fresh migrated database in a scratch directory. Keep the `TempDir` alive
/// for the duration of the test.
pub async fn temp_db() -> (Db, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("test.db");
    let url = format!("sqlite:{}?mode=rwc", path.display());
    let db = Db::connect(&url, 2).await.expect("connect");
    (db, dir)
}

pub fn record(
    name: &str,
    region: Option<&str>,
    population: i64,
    currency: Option<&str>,
    rate: Option<f64>,
    gdp: Option<f64>,
) -> Country {
    Country {
        name: name.to_string(),
        capital: None,
        region: region.map(str::to_string),
        population,
        currency_code: currency.map(str::to_string),
        exchange_rate: rate,
        estimated_gdp: gdp,
        flag_url: None,
        last_refreshed_at: Utc::now(),
    }
}

pub fn raw_country(name: &str, population: i64, code: Option<&str>) -> RawCountry {
    let payload = serde_json::json!({
        "name": name,
        "population": population,
        "currencies": code.map(|c| vec![serde_json::json!({"code": c})]),
    });
    serde_json::from_value(payload).expect("raw country")
}

/// In-memory stand-in for the two external feeds.
pub struct FakeSources {
    pub countries: Vec<RawCountry>,
    pub rates: HashMap<String, f64>,
    pub fail_countries: bool,
    pub fail_rates: bool,
}

impl FakeSources {
    pub fn new(countries: Vec<RawCountry>, rates: HashMap<String, f64>) -> Self {
        Self {
            countries,
            rates,
            fail_countries: false,
            fail_rates: false,
        }
    }

    /// The Nigeria/Ghana fixture used across the refresh tests.
    pub fn two_countries() -> Self {
        Self::new(
            vec![
                raw_country("Nigeria", 206_139_589, Some("NGN")),
                raw_country("Ghana", 31_072_940, Some("GHS")),
            ],
            HashMap::from([("NGN".to_string(), 1600.23), ("GHS".to_string(), 15.34)]),
        )
    }
}

/// Parks the countries fetch until released, so a test can hold one refresh
/// mid-flight while issuing another.
pub struct GatedSources {
    inner: FakeSources,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedSources {
    pub fn new(inner: FakeSources) -> Self {
        Self {
            inner,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl CountrySources for GatedSources {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ApiError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.fetch_countries().await
    }

    async fn fetch_exchange_rates(&self) -> Result<HashMap<String, f64>, ApiError> {
        self.inner.fetch_exchange_rates().await
    }
}

#[async_trait]
impl CountrySources for FakeSources {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ApiError> {
        if self.fail_countries {
            return Err(ApiError::SourceUnavailable {
                source_name: country_currency_api::sources::COUNTRIES_SOURCE,
                detail: "request timed out".to_string(),
            });
        }
        Ok(self.countries.clone())
    }

    async fn fetch_exchange_rates(&self) -> Result<HashMap<String, f64>, ApiError> {
        if self.fail_rates {
            return Err(ApiError::SourceUnavailable {
                source_name: EXCHANGE_SOURCE,
                detail: "request timed out".to_string(),
            });
        }
        Ok(self.rates.clone())
    }
}
