// HTTP API server binary for country-currency-api

use anyhow::Result;
use country_currency_api::api::{ApiServer, AppState};
use country_currency_api::config::AppConfig;
use country_currency_api::refresh::Refresher;
use country_currency_api::sources::HttpSources;
use country_currency_api::util::db::Db;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<()> {
    country_currency_api::tracing::init_tracing("info,sqlx=warn")?;

    tracing::info!("Initializing country-currency-api server");

    let config = AppConfig::from_env();

    let db = Db::connect(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database connected successfully");

    let sources = Arc::new(
        HttpSources::new(&config).map_err(|e| anyhow::anyhow!("sources client: {e}"))?,
    );
    let refresher = Refresher::new(db.clone(), sources, config.cache_dir.clone());

    let state = AppState {
        db,
        refresher,
        cache_dir: config.cache_dir.clone(),
    };

    ApiServer::new(&config).run(state).await?;

    Ok(())
}
