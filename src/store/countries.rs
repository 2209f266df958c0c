use crate::domain::Country;
use crate::error::ApiError;
use crate::util::db::Db;
use sqlx::{QueryBuilder, Sqlite};
use tracing::instrument;

const SELECT_COLUMNS: &str = "SELECT name, capital, region, population, currency_code, \
     exchange_rate, estimated_gdp, flag_url, last_refreshed_at FROM countries";

// SQLite's default host-parameter budget comfortably covers 200 rows x 9 binds.
const UPSERT_CHUNK: usize = 200;

/// Accepted `sort` values for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    PopulationAsc,
    PopulationDesc,
    GdpAsc,
    GdpDesc,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name_asc" => Some(Self::NameAsc),
            "name_desc" => Some(Self::NameDesc),
            "population_asc" => Some(Self::PopulationAsc),
            "population_desc" => Some(Self::PopulationDesc),
            "gdp_asc" => Some(Self::GdpAsc),
            "gdp_desc" => Some(Self::GdpDesc),
            _ => None,
        }
    }

    fn order_clause(self) -> &'static str {
        match self {
            Self::NameAsc => " ORDER BY name COLLATE NOCASE ASC",
            Self::NameDesc => " ORDER BY name COLLATE NOCASE DESC",
            Self::PopulationAsc => " ORDER BY population ASC",
            Self::PopulationDesc => " ORDER BY population DESC",
            // Records without a derived GDP always sort after the rest.
            Self::GdpAsc => " ORDER BY estimated_gdp ASC NULLS LAST",
            Self::GdpDesc => " ORDER BY estimated_gdp DESC NULLS LAST",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountryFilter {
    /// Partial, case-insensitive region match.
    pub region: Option<String>,
    /// Exact, case-insensitive currency code match.
    pub currency: Option<String>,
}

pub struct CountryStore<'a> {
    db: &'a Db,
}

impl<'a> CountryStore<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Insert-or-overwrite the whole batch keyed by name, as one transaction.
    /// Rows absent from the batch are left untouched.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn upsert_all(&self, records: &[Country]) -> Result<(), ApiError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut tx = self.db.pool.begin().await?;
        for chunk in records.chunks(UPSERT_CHUNK) {
            let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
                "INSERT INTO countries (name, capital, region, population, currency_code, \
                 exchange_rate, estimated_gdp, flag_url, last_refreshed_at) ",
            );
            qb.push_values(chunk, |mut b, r| {
                b.push_bind(&r.name)
                    .push_bind(&r.capital)
                    .push_bind(&r.region)
                    .push_bind(r.population)
                    .push_bind(&r.currency_code)
                    .push_bind(r.exchange_rate)
                    .push_bind(r.estimated_gdp)
                    .push_bind(&r.flag_url)
                    .push_bind(r.last_refreshed_at);
            });
            qb.push(
                " ON CONFLICT(name) DO UPDATE SET \
                 capital = excluded.capital, \
                 region = excluded.region, \
                 population = excluded.population, \
                 currency_code = excluded.currency_code, \
                 exchange_rate = excluded.exchange_rate, \
                 estimated_gdp = excluded.estimated_gdp, \
                 flag_url = excluded.flag_url, \
                 last_refreshed_at = excluded.last_refreshed_at",
            );
            qb.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn list(
        &self,
        filter: &CountryFilter,
        sort: SortKey,
    ) -> Result<Vec<Country>, ApiError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        qb.push(" WHERE 1=1");
        if let Some(region) = &filter.region {
            // LIKE is case-insensitive for ASCII in SQLite.
            qb.push(" AND region LIKE ").push_bind(format!("%{region}%"));
        }
        if let Some(currency) = &filter.currency {
            qb.push(" AND currency_code = ")
                .push_bind(currency.to_ascii_uppercase());
        }
        qb.push(sort.order_clause());
        let rows = qb
            .build_query_as::<Country>()
            .fetch_all(&self.db.pool)
            .await?;
        Ok(rows)
    }

    /// Case-insensitive exact match (the name column collates NOCASE).
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Country>, ApiError> {
        let row = sqlx::query_as::<_, Country>(&format!("{SELECT_COLUMNS} WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(row)
    }

    /// Returns whether a record was removed.
    pub async fn delete_by_name(&self, name: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM countries WHERE name = ?")
            .bind(name)
            .execute(&self.db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, ApiError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.db.pool)
            .await?;
        Ok(total)
    }

    /// Top records by non-null derived GDP, descending.
    pub async fn top_by_gdp(&self, limit: i64) -> Result<Vec<Country>, ApiError> {
        let rows = sqlx::query_as::<_, Country>(&format!(
            "{SELECT_COLUMNS} WHERE estimated_gdp IS NOT NULL ORDER BY estimated_gdp DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.db.pool)
        .await?;
        Ok(rows)
    }
}
