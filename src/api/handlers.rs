// HTTP request handlers for API endpoints

use crate::api::models::*;
use crate::api::server::AppState;
use crate::error::ApiError;
use crate::render;
use crate::store::{CountryFilter, CountryStore, MetadataStore, SortKey};
use actix_web::{web, HttpResponse};
use chrono::SecondsFormat;

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    // Quick database connectivity check
    let db_status = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db.pool)
        .await
    {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        database: db_status.to_string(),
    }))
}

/// POST /countries/refresh
pub async fn refresh_countries(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let outcome = state.refresher.run().await?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        message: "Countries data refreshed successfully".to_string(),
        total_countries: outcome.total,
        last_refreshed_at: outcome
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// GET /countries?region=&currency=&sort=
pub async fn list_countries(
    query: web::Query<CountriesQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let sort = match query.sort.as_deref() {
        Some(raw) => SortKey::parse(raw)
            .ok_or_else(|| ApiError::validation("sort", "Invalid sort parameter"))?,
        None => SortKey::default(),
    };

    let currency = match query.currency.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => {
            if code.len() != 3 {
                return Err(ApiError::validation(
                    "currency",
                    "Currency code must be 3 characters",
                ));
            }
            Some(code.to_string())
        }
        _ => None,
    };

    let filter = CountryFilter {
        region: query
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        currency,
    };

    let countries = CountryStore::new(&state.db).list(&filter, sort).await?;
    Ok(HttpResponse::Ok().json(countries))
}

/// GET /countries/{name}
pub async fn get_country(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let country = CountryStore::new(&state.db)
        .get_by_name(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("Country"))?;
    Ok(HttpResponse::Ok().json(country))
}

/// DELETE /countries/{name}
pub async fn delete_country(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let deleted = CountryStore::new(&state.db).delete_by_name(&name).await?;
    if !deleted {
        return Err(ApiError::not_found("Country"));
    }
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Country deleted successfully".to_string(),
    }))
}

/// GET /status
pub async fn get_status(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let total_countries = CountryStore::new(&state.db).count().await?;
    let last_refreshed_at = MetadataStore::new(&state.db).last_refreshed().await?;

    Ok(HttpResponse::Ok().json(StatusResponse {
        total_countries,
        last_refreshed_at,
    }))
}

/// GET /countries/image — raw bytes of the latest summary artifact.
pub async fn summary_image(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let path = render::artifact_path(&state.cache_dir);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(HttpResponse::Ok().content_type("image/png").body(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::not_found("Summary image"))
        }
        Err(e) => Err(e.into()),
    }
}
