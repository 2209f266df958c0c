//! Derivation of the synthetic estimated-GDP figure.
//!
//! The multiplier is drawn per country from an injected RNG so the server can
//! use an OS-seeded generator while tests pin a seed and assert exact values.

use crate::domain::Country;
use crate::sources::RawCountry;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;

/// `population * uniform(1000, 2000) / rate`; None when no usable rate.
pub fn estimated_gdp<R: Rng + ?Sized>(
    population: i64,
    exchange_rate: Option<f64>,
    rng: &mut R,
) -> Option<f64> {
    let rate = exchange_rate?;
    if rate == 0.0 {
        return None;
    }
    let multiplier = rng.gen_range(1000.0..2000.0);
    Some(population as f64 * multiplier / rate)
}

/// First currency code from the source-provided list, uppercased; None if the
/// list is empty or its first entry carries no code.
pub fn resolve_currency(raw: &RawCountry) -> Option<String> {
    raw.currencies
        .as_ref()
        .and_then(|list| list.first())
        .and_then(|c| c.code.as_ref())
        .map(|code| code.to_ascii_uppercase())
}

/// Join one fetched country against the rates mapping and stamp it with the
/// shared refresh timestamp.
pub fn build_record<R: Rng + ?Sized>(
    raw: &RawCountry,
    rates: &HashMap<String, f64>,
    refreshed_at: DateTime<Utc>,
    rng: &mut R,
) -> Country {
    let currency_code = resolve_currency(raw);
    let exchange_rate = currency_code
        .as_ref()
        .and_then(|code| rates.get(code))
        .copied();
    let estimated_gdp = estimated_gdp(raw.population, exchange_rate, rng);

    Country {
        name: raw.name.clone(),
        capital: raw.capital.clone(),
        region: raw.region.clone(),
        population: raw.population,
        currency_code,
        exchange_rate,
        estimated_gdp,
        flag_url: raw.flag.clone(),
        last_refreshed_at: refreshed_at,
    }
}
