use crate::helpers::{get, get_json, mock_with_latest, spawn_app, MockClimateAccess};
use axum::http::StatusCode;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use surfsup::{db, PrecipitationReading, TemperatureObservation, TemperatureStats};
use time::macros::date;

#[tokio::test]
async fn cutoff_is_computed_once_at_startup() {
    let test_app = spawn_app(Arc::new(mock_with_latest(date!(2017 - 08 - 23)))).await;
    assert_eq!(test_app.state.cutoff, date!(2016 - 08 - 23));
}

#[tokio::test]
async fn startup_fails_on_empty_dataset() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_latest_date()
        .times(1)
        .returning(|| Err(db::Error::EmptyDataset));

    let res = surfsup::AppState::new(Arc::new(climate_db)).await;
    assert!(matches!(res, Err(db::Error::EmptyDataset)));
}

#[tokio::test]
async fn index_lists_api_routes() {
    let test_app = spawn_app(Arc::new(mock_with_latest(date!(2017 - 08 - 23)))).await;

    let (status, html) = get(&test_app.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Available Routes:"));
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/stations"));
    assert!(html.contains("/api/v1.0/tobs"));
    assert!(html.contains("/api/v1.0/&lt;start&gt;"));
}

#[tokio::test]
async fn precipitation_queries_from_cutoff_and_keeps_nulls() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_precipitation_since()
        .withf(|since| *since == date!(2016 - 08 - 23))
        .times(1)
        .returning(|_| {
            Ok(vec![
                PrecipitationReading {
                    date: String::from("2016-08-23"),
                    prcp: Some(0.0),
                },
                PrecipitationReading {
                    date: String::from("2016-08-23"),
                    prcp: Some(0.15),
                },
                PrecipitationReading {
                    date: String::from("2016-08-24"),
                    prcp: None,
                },
            ])
        });
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"2016-08-23": 0.15, "2016-08-24": null}));
}

#[tokio::test]
async fn stations_returns_ids_in_store_order() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db.expect_station_ids().times(1).returning(|| {
        Ok(vec![
            String::from("USC00519397"),
            String::from("USC00513117"),
            String::from("USC00519397"),
        ])
    });
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["USC00519397", "USC00513117", "USC00519397"]));
}

#[tokio::test]
async fn tobs_uses_most_active_station() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_most_active_station()
        .times(1)
        .returning(|| Ok(Some(String::from("USC00519281"))));
    climate_db
        .expect_temperature_observations()
        .withf(|station, since| station == "USC00519281" && *since == date!(2016 - 08 - 23))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                TemperatureObservation {
                    date: String::from("2016-08-23"),
                    tobs: 77.0,
                },
                TemperatureObservation {
                    date: String::from("2016-08-24"),
                    tobs: 77.0,
                },
            ])
        });
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"date": "2016-08-23", "tobs": 77.0},
            {"date": "2016-08-24", "tobs": 77.0}
        ])
    );
}

#[tokio::test]
async fn tobs_without_measurements_is_not_found() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_most_active_station()
        .times(1)
        .returning(|| Ok(None));
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "no measurements available"}));
}

#[tokio::test]
async fn stats_from_start_is_open_ended() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_temperature_stats()
        .withf(|start, end| *start == date!(2017 - 01 - 01) && end.is_none())
        .times(1)
        .returning(|_, _| {
            Ok(TemperatureStats {
                tmin: Some(58.0),
                tavg: Some(74.5),
                tmax: Some(87.0),
            })
        });
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"TMIN": 58.0, "TAVG": 74.5, "TMAX": 87.0}]));
}

#[tokio::test]
async fn stats_between_passes_both_bounds() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_temperature_stats()
        .withf(|start, end| {
            *start == date!(2017 - 01 - 01) && *end == Some(date!(2017 - 01 - 02))
        })
        .times(1)
        .returning(|_, _| {
            Ok(TemperatureStats {
                tmin: Some(60.0),
                tavg: Some(65.0),
                tmax: Some(70.0),
            })
        });
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get(&test_app.app, "/api/v1.0/2017-01-01/2017-01-02").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"[{"TMIN":60.0,"TAVG":65.0,"TMAX":70.0}]"#);
}

#[tokio::test]
async fn stats_with_no_matching_rows_are_null() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_temperature_stats()
        .times(1)
        .returning(|_, _| Ok(TemperatureStats::default()));
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2030-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"TMIN": null, "TAVG": null, "TMAX": null}]));
}

#[tokio::test]
async fn malformed_dates_are_client_errors() {
    // no temperature_stats expectation: the store must not be queried
    let test_app = spawn_app(Arc::new(mock_with_latest(date!(2017 - 08 - 23)))).await;

    for (uri, param) in [
        ("/api/v1.0/2024-13-40", "start"),
        ("/api/v1.0/notadate", "start"),
        ("/api/v1.0/2024-13-40/2017-01-01", "start"),
        ("/api/v1.0/2017-01-01/notadate", "end"),
    ] {
        let (status, body) = get_json(&test_app.app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");

        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with(&format!("invalid {param} date")), "{message}");
    }
}

#[tokio::test]
async fn store_timeout_is_gateway_timeout() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_station_ids()
        .times(1)
        .returning(|| Err(db::Error::Timeout(Duration::from_secs(10))));
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body, json!({"error": "climate data query timed out"}));
}

#[tokio::test]
async fn store_failure_is_server_error() {
    let mut climate_db = mock_with_latest(date!(2017 - 08 - 23));
    climate_db
        .expect_precipitation_since()
        .times(1)
        .returning(|_| Err(db::Error::Query(sqlx::Error::PoolClosed)));
    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "failed to query climate data"}));
}
