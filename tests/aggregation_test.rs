use chrono::{Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{ingest_reading, make_authenticated_request, register_test_account, spawn_app};

fn rfc3339(ts: chrono::DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[tokio::test]
async fn weekly_summary_of_three_readings() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    // Three readings earlier today
    let base = Utc::now() - Duration::hours(1);
    for (i, (hr, spo2)) in [(72.0, 98.0), (88.0, 96.0), (65.0, 99.0)].iter().enumerate() {
        let ts = rfc3339(base + Duration::minutes(i as i64));
        let response =
            ingest_reading(&test_app, &account.device_id, *hr, *spo2, Some(&ts)).await;
        assert_eq!(201, response.status().as_u16());
    }

    let response = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/weekly", &test_app.address),
        &account.token,
        None,
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["avgHeartRate"], json!(75.0));
    assert_eq!(body["data"]["minHeartRate"], json!(65.0));
    assert_eq!(body["data"]["maxHeartRate"], json!(88.0));
}

#[tokio::test]
async fn weekly_summary_empty_window_is_zeros() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    let response = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/weekly", &test_app.address),
        &account.token,
        None,
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["avgHeartRate"], json!(0.0));
    assert_eq!(body["data"]["minHeartRate"], json!(0.0));
    assert_eq!(body["data"]["maxHeartRate"], json!(0.0));
}

#[tokio::test]
async fn weekly_summary_ignores_readings_older_than_the_window() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    // Well before the trailing window; must not show up
    let stale = rfc3339(Utc::now() - Duration::days(30));
    let response = ingest_reading(&test_app, &account.device_id, 180.0, 95.0, Some(&stale)).await;
    assert_eq!(201, response.status().as_u16());

    let fresh = rfc3339(Utc::now() - Duration::hours(2));
    let response = ingest_reading(&test_app, &account.device_id, 60.0, 98.0, Some(&fresh)).await;
    assert_eq!(201, response.status().as_u16());

    let summary = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/weekly", &test_app.address),
        &account.token,
        None,
    )
    .await;
    let body: serde_json::Value = summary.json().await.unwrap();
    assert_eq!(body["data"]["maxHeartRate"], json!(60.0));
    assert_eq!(body["data"]["avgHeartRate"], json!(60.0));
}

#[tokio::test]
async fn daily_query_orders_by_timestamp_not_arrival() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    // Buffered readings arrive out of order
    for (hr, ts) in [
        (88.0, "2024-03-05T12:00:00Z"),
        (72.0, "2024-03-05T08:00:00Z"),
        (65.0, "2024-03-05T20:00:00Z"),
    ] {
        let response = ingest_reading(&test_app, &account.device_id, hr, 98.0, Some(ts)).await;
        assert_eq!(201, response.status().as_u16());
    }

    let response = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/daily?date=2024-03-05", &test_app.address),
        &account.token,
        None,
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let readings = body["data"].as_array().unwrap();
    assert_eq!(readings.len(), 3);
    let heart_rates: Vec<f64> = readings
        .iter()
        .map(|r| r["heartRate"].as_f64().unwrap())
        .collect();
    assert_eq!(heart_rates, vec![72.0, 88.0, 65.0]);
}

#[tokio::test]
async fn daily_window_is_half_open_and_utc_anchored() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    // One tick before midnight belongs to the first day, midnight itself to
    // the second
    for (hr, ts) in [
        (70.0, "2024-01-01T23:59:59Z"),
        (80.0, "2024-01-02T00:00:00Z"),
    ] {
        let response = ingest_reading(&test_app, &account.device_id, hr, 98.0, Some(ts)).await;
        assert_eq!(201, response.status().as_u16());
    }

    let first_day = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/daily?date=2024-01-01", &test_app.address),
        &account.token,
        None,
    )
    .await;
    let body: serde_json::Value = first_day.json().await.unwrap();
    let readings = body["data"].as_array().unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0]["heartRate"], json!(70.0));

    let second_day = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/daily?date=2024-01-02", &test_app.address),
        &account.token,
        None,
    )
    .await;
    let body: serde_json::Value = second_day.json().await.unwrap();
    let readings = body["data"].as_array().unwrap();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0]["heartRate"], json!(80.0));
}

#[tokio::test]
async fn daily_query_requires_date_parameter() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    let response = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/daily", &test_app.address),
        &account.token,
        None,
    )
    .await;
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let response = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/daily?date=yesterday", &test_app.address),
        &account.token,
        None,
    )
    .await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn daily_query_with_no_readings_is_an_empty_list() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    let response = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/daily?date=2024-06-01", &test_app.address),
        &account.token,
        None,
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn accounts_only_see_their_own_measurements() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let first = register_test_account(&test_app.address).await;
    let second = register_test_account(&test_app.address).await;

    let ts = "2024-03-05T10:00:00Z";
    let response = ingest_reading(&test_app, &first.device_id, 72.0, 98.0, Some(ts)).await;
    assert_eq!(201, response.status().as_u16());

    let response = make_authenticated_request(
        &client,
        reqwest::Method::GET,
        &format!("{}/measurements/daily?date=2024-03-05", &test_app.address),
        &second.token,
        None,
    )
    .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
