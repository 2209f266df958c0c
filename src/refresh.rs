//! Refresh orchestration: fetch both sources, derive, persist, re-render.

use crate::domain::{gdp, Country};
use crate::error::ApiError;
use crate::render;
use crate::sources::{self, CountrySources};
use crate::store::{CountryStore, MetadataStore};
use crate::util::db::Db;
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub total: usize,
    pub timestamp: DateTime<Utc>,
}

pub struct Refresher {
    db: Db,
    sources: Arc<dyn CountrySources>,
    cache_dir: PathBuf,
    // Single-flight guard; an overlapping refresh is rejected, not queued.
    in_flight: Mutex<()>,
}

impl Refresher {
    pub fn new(db: Db, sources: Arc<dyn CountrySources>, cache_dir: PathBuf) -> Self {
        Self {
            db,
            sources,
            cache_dir,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn run(&self) -> Result<RefreshOutcome, ApiError> {
        self.run_with(StdRng::from_entropy()).await
    }

    /// Full refresh with a caller-provided RNG (tests pin a seed here).
    ///
    /// Steps 1-2 are all-or-nothing; the batch upsert in step 3 is one
    /// transaction. A render failure in step 5 still surfaces as an error,
    /// but the store and metadata legitimately keep the new data: the
    /// artifact is eventually consistent with the store.
    pub async fn run_with<R: Rng>(&self, mut rng: R) -> Result<RefreshOutcome, ApiError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ApiError::Conflict("refresh already in progress".to_string()))?;

        info!("refresh: fetching source data");
        let (raw_countries, rates) = sources::fetch_all(self.sources.as_ref()).await?;

        let timestamp = Utc::now();
        info!(
            countries = raw_countries.len(),
            rates = rates.len(),
            "refresh: deriving records"
        );
        let records: Vec<Country> = raw_countries
            .iter()
            .map(|raw| gdp::build_record(raw, &rates, timestamp, &mut rng))
            .collect();

        info!(count = records.len(), "refresh: persisting batch");
        CountryStore::new(&self.db).upsert_all(&records).await?;
        MetadataStore::new(&self.db)
            .set_last_refreshed(timestamp)
            .await?;

        info!("refresh: regenerating summary artifact");
        render::generate_summary_image(&self.db, timestamp, &self.cache_dir).await?;

        info!(total = records.len(), %timestamp, "refresh complete");
        Ok(RefreshOutcome {
            total: records.len(),
            timestamp,
        })
    }
}
