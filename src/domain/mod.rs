//! Core record types shared by the store, orchestrator, and API surface.

pub mod gdp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One nation's current snapshot. `name` is the unique identity key;
/// lookups against it are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Country {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    pub last_refreshed_at: DateTime<Utc>,
}
