mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use pulso::api::storage::StorageError;
use pulso::services::chart_service::{BAND_SERIES, CENTRAL_SERIES, HISTORICAL_SERIES};
use pulso::services::page_service::{PublishError, LOAD_ERROR_MESSAGE, TITLE};
use pulso::services::{publish, ChartView, DataService, ObjectKeys, PageShell, PageState};
use pulso::utils::DisplayLocale;
use serde_json::json;

use common::*;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

#[tokio::test]
async fn loads_and_renders_the_forecast() {
    let service = DataService::new(full_store(), ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);
    assert_eq!(page.state(), &PageState::Loading);

    page.mount(&service).await;
    assert!(matches!(page.state(), PageState::Ready(_)));

    let view = page.render();
    let header = view.header.expect("header once ready");
    assert_eq!(header.title, TITLE);
    assert_eq!(header.subtitle, "Pronóstico generado el: 2 de enero de 2025");

    let ChartView::Chart(config) = &view.body else {
        panic!("expected a chart, got {:?}", view.body);
    };
    assert_eq!(
        config.series_named(CENTRAL_SERIES).unwrap().data,
        vec![(day(2), 1010.0), (day(3), 1015.0), (day(4), 1020.0)]
    );
    assert_eq!(config.series_named(BAND_SERIES).unwrap().data.len(), 5);
    assert_eq!(config.series_named(HISTORICAL_SERIES).unwrap().data.len(), 2);
}

#[tokio::test]
async fn prediction_failure_shows_only_the_error() {
    let store = FakeStore::new()
        .with_json(HISTORICAL_KEY, historical_json())
        .failing(PREDICTION_KEY, StorageError::Request("connection reset".to_string()));
    let service = DataService::new(store, ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);

    page.mount(&service).await;

    assert_eq!(page.state(), &PageState::Error(LOAD_ERROR_MESSAGE.to_string()));
    let view = page.render();
    assert!(view.header.is_none());
    assert_eq!(view.body, ChartView::Error(LOAD_ERROR_MESSAGE.to_string()));
}

#[tokio::test]
async fn empty_history_refuses_the_chart() {
    let store = FakeStore::new()
        .with_json(HISTORICAL_KEY, json!([]))
        .with_json(PREDICTION_KEY, prediction_json());
    let service = DataService::new(store, ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);

    page.mount(&service).await;

    assert_eq!(page.state(), &PageState::Error(LOAD_ERROR_MESSAGE.to_string()));
    assert!(!matches!(page.render().body, ChartView::Chart(_)));
}

#[tokio::test]
async fn loads_exactly_once_per_mount() {
    let store = Arc::new(full_store());
    let service = DataService::new(Arc::clone(&store), ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);

    page.mount(&service).await;
    page.mount(&service).await;

    assert_eq!(store.requests().len(), 2);
    assert!(matches!(page.state(), PageState::Ready(_)));
}

#[tokio::test]
async fn empty_trajectory_shows_history_alone() {
    let store = FakeStore::new()
        .with_json(HISTORICAL_KEY, historical_json())
        .with_json(
            PREDICTION_KEY,
            json!({"prediction_generated_on": "2025-01-02", "anchor_price": 1010.0, "trajectory": []}),
        );
    let service = DataService::new(store, ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);

    page.mount(&service).await;

    let ChartView::Chart(config) = page.render().body else {
        panic!("expected a chart");
    };
    assert_eq!(config.series.len(), 1);
    assert_eq!(config.series[0].name, HISTORICAL_SERIES);
}

#[tokio::test]
async fn publishes_config_and_svg() {
    let service = DataService::new(full_store(), ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);
    page.mount(&service).await;
    let view = page.render();

    let dir = tempfile::tempdir().unwrap();
    let files = publish(&view, dir.path(), 640, 320).unwrap();

    let config: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&files.config).unwrap()).unwrap();
    assert_eq!(config["series"][0]["name"], HISTORICAL_SERIES);
    assert_eq!(config["dataZoom"]["endValue"], "2025-01-04");

    let svg = std::fs::read_to_string(&files.image).unwrap();
    assert!(svg.contains("<svg"));
}

#[tokio::test]
async fn nothing_to_publish_in_error_state() {
    let service = DataService::new(FakeStore::new(), ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);
    page.mount(&service).await;

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        publish(&page.render(), dir.path(), 640, 320),
        Err(PublishError::NoChart)
    ));
}

#[tokio::test]
async fn stale_forecast_never_reaches_ready() {
    let store = FakeStore::new()
        .with_json(
            HISTORICAL_KEY,
            json!([
                {"fecha_dato": "2025-01-03", "dolar_oficial": 1020.0},
                {"fecha_dato": "2025-01-05", "dolar_oficial": 1030.0}
            ]),
        )
        .with_json(PREDICTION_KEY, prediction_json());
    let service = DataService::new(store, ObjectKeys::default());
    let mut page = PageShell::new(DisplayLocale::EsAr);

    page.mount(&service).await;

    assert_eq!(page.state(), &PageState::Error(LOAD_ERROR_MESSAGE.to_string()));
}
