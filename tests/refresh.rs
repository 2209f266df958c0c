mod common;

use common::{temp_db, FakeSources, GatedSources};
use country_currency_api::error::ApiError;
use country_currency_api::refresh::Refresher;
use country_currency_api::render;
use country_currency_api::store::{CountryStore, MetadataStore};
use std::sync::Arc;
use tempfile::TempDir;

#[actix_web::test]
async fn refresh_persists_derives_and_renders() {
    let (db, _dir) = temp_db().await;
    let cache = TempDir::new().unwrap();
    let refresher = Refresher::new(
        db.clone(),
        Arc::new(FakeSources::two_countries()),
        cache.path().to_path_buf(),
    );

    let outcome = refresher.run().await.unwrap();
    assert_eq!(outcome.total, 2);

    let store = CountryStore::new(&db);
    assert_eq!(store.count().await.unwrap(), 2);
    for name in ["Nigeria", "Ghana"] {
        let row = store.get_by_name(name).await.unwrap().unwrap();
        assert!(row.estimated_gdp.is_some(), "{name} should have derived GDP");
        assert!(row.exchange_rate.is_some());
        // Compare at millisecond precision; the TEXT round-trip may truncate.
        assert_eq!(
            row.last_refreshed_at.timestamp_millis(),
            outcome.timestamp.timestamp_millis()
        );
    }

    let meta = MetadataStore::new(&db).last_refreshed().await.unwrap();
    assert!(meta.is_some());

    assert!(render::artifact_path(cache.path()).exists());
}

#[actix_web::test]
async fn source_failure_aborts_with_no_partial_persistence() {
    let (db, _dir) = temp_db().await;
    let cache = TempDir::new().unwrap();
    let mut sources = FakeSources::two_countries();
    sources.fail_rates = true;
    let refresher = Refresher::new(db.clone(), Arc::new(sources), cache.path().to_path_buf());

    let err = refresher.run().await.unwrap_err();
    assert!(matches!(err, ApiError::SourceUnavailable { .. }), "got {err:?}");

    assert_eq!(CountryStore::new(&db).count().await.unwrap(), 0);
    assert!(MetadataStore::new(&db).last_refreshed().await.unwrap().is_none());
    assert!(!render::artifact_path(cache.path()).exists());
}

#[actix_web::test]
async fn repeated_refresh_keeps_cardinality() {
    let (db, _dir) = temp_db().await;
    let cache = TempDir::new().unwrap();
    let refresher = Refresher::new(
        db.clone(),
        Arc::new(FakeSources::two_countries()),
        cache.path().to_path_buf(),
    );

    refresher.run().await.unwrap();
    let second = refresher.run().await.unwrap();

    assert_eq!(second.total, 2);
    assert_eq!(CountryStore::new(&db).count().await.unwrap(), 2);
}

#[actix_web::test]
async fn missing_rate_leaves_gdp_null() {
    let (db, _dir) = temp_db().await;
    let cache = TempDir::new().unwrap();
    let mut sources = FakeSources::two_countries();
    sources.rates.remove("GHS");
    let refresher = Refresher::new(db.clone(), Arc::new(sources), cache.path().to_path_buf());

    refresher.run().await.unwrap();

    let store = CountryStore::new(&db);
    let ghana = store.get_by_name("Ghana").await.unwrap().unwrap();
    assert_eq!(ghana.currency_code.as_deref(), Some("GHS"));
    assert_eq!(ghana.exchange_rate, None);
    assert_eq!(ghana.estimated_gdp, None);

    let nigeria = store.get_by_name("Nigeria").await.unwrap().unwrap();
    assert!(nigeria.estimated_gdp.is_some());
}

#[actix_web::test]
async fn zero_rate_leaves_gdp_null() {
    let (db, _dir) = temp_db().await;
    let cache = TempDir::new().unwrap();
    let mut sources = FakeSources::two_countries();
    sources.rates.insert("NGN".to_string(), 0.0);
    let refresher = Refresher::new(db.clone(), Arc::new(sources), cache.path().to_path_buf());

    refresher.run().await.unwrap();

    let nigeria = CountryStore::new(&db)
        .get_by_name("Nigeria")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(nigeria.exchange_rate, Some(0.0));
    assert_eq!(nigeria.estimated_gdp, None);
}

#[actix_web::test]
async fn overlapping_refresh_is_rejected() {
    let (db, _dir) = temp_db().await;
    let cache = TempDir::new().unwrap();
    let sources = GatedSources::new(FakeSources::two_countries());
    let entered = sources.entered.clone();
    let release = sources.release.clone();
    let refresher = Refresher::new(db.clone(), Arc::new(sources), cache.path().to_path_buf());

    // Park the first run inside its fetch, then try a second one.
    let first = refresher.run();
    let second = async {
        entered.notified().await;
        let err = refresher.run().await.unwrap_err();
        release.notify_one();
        err
    };
    let (first_outcome, err) = tokio::join!(first, second);

    assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
    assert_eq!(first_outcome.unwrap().total, 2);
    assert_eq!(CountryStore::new(&db).count().await.unwrap(), 2);
}

#[actix_web::test]
async fn render_failure_after_persistence_keeps_the_batch() {
    let (db, _dir) = temp_db().await;
    // A regular file where the cache directory should be makes the artifact
    // write fail after the batch has already landed.
    let scratch = TempDir::new().unwrap();
    let blocker = scratch.path().join("cache");
    std::fs::write(&blocker, b"in the way").unwrap();
    let refresher = Refresher::new(
        db.clone(),
        Arc::new(FakeSources::two_countries()),
        blocker,
    );

    let err = refresher.run().await.unwrap_err();
    assert!(matches!(err, ApiError::Internal(_)), "got {err:?}");

    // The store and the refresh timestamp keep the new batch; only the
    // artifact is stale until the next successful refresh.
    assert_eq!(CountryStore::new(&db).count().await.unwrap(), 2);
    assert!(MetadataStore::new(&db)
        .last_refreshed()
        .await
        .unwrap()
        .is_some());
}
