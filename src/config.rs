//! Process configuration, sourced from the environment (with .env support).

use crate::util::env as env_util;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
const DEFAULT_EXCHANGE_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub countries_url: String,
    pub exchange_url: String,
    pub fetch_timeout: Duration,
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub cache_dir: PathBuf,
    pub allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        env_util::init_env();

        let countries_url = env_util::env_opt("COUNTRIES_API_URL")
            .unwrap_or_else(|| DEFAULT_COUNTRIES_URL.to_string());
        let exchange_url = env_util::env_opt("EXCHANGE_RATE_API_URL")
            .unwrap_or_else(|| DEFAULT_EXCHANGE_URL.to_string());
        let fetch_timeout = Duration::from_millis(env_util::env_parse("API_TIMEOUT_MS", 10_000u64));
        let database_url = env_util::env_opt("DATABASE_URL")
            .unwrap_or_else(|| "sqlite:data/countries.db?mode=rwc".to_string());
        let db_max_connections = env_util::env_parse("DB_MAX_CONNS", 5u32);
        let host = env_util::env_opt("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = env_util::env_parse("API_PORT", 8080u16);
        let cache_dir = PathBuf::from(env_util::env_opt("CACHE_DIR").unwrap_or_else(|| "cache".to_string()));
        let allowed_origins = env_util::env_opt("ALLOWED_ORIGINS");

        Self {
            countries_url,
            exchange_url,
            fetch_timeout,
            database_url,
            db_max_connections,
            host,
            port,
            cache_dir,
            allowed_origins,
        }
    }
}
