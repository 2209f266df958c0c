// API request/response models (DTOs)

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /countries`.
#[derive(Debug, Default, Deserialize)]
pub struct CountriesQuery {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub total_countries: usize,
    pub last_refreshed_at: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub total_countries: i64,
    pub last_refreshed_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}
