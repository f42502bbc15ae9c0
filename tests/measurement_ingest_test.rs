use reqwest::Client;
use serde_json::json;
use sqlx::Row;

mod common;
use common::utils::{ingest_reading, register_test_account, spawn_app};

#[tokio::test]
async fn ingest_measurement_working() {
    let test_app = spawn_app().await;

    let account = register_test_account(&test_app.address).await;

    let response = ingest_reading(&test_app, &account.device_id, 72.5, 98.0, None).await;
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["deviceId"], json!(account.device_id));
    assert_eq!(body["data"]["heartRate"], json!(72.5));
    assert_eq!(body["data"]["spo2"], json!(98.0));

    let saved = sqlx::query(
        "SELECT heart_rate, spo2 FROM measurements WHERE device_id = $1",
    )
    .bind(&account.device_id)
    .fetch_one(&test_app.db_pool)
    .await
    .expect("Failed to fetch saved measurement.");
    let heart_rate: f32 = saved.get("heart_rate");
    let spo2: f32 = saved.get("spo2");
    assert_eq!(heart_rate, 72.5);
    assert_eq!(spo2, 98.0);
}

#[tokio::test]
async fn ingest_tags_measurement_with_device_owner() {
    let test_app = spawn_app().await;

    let account = register_test_account(&test_app.address).await;

    let response = ingest_reading(&test_app, &account.device_id, 64.0, 97.0, None).await;
    assert_eq!(201, response.status().as_u16());

    let owner = sqlx::query(
        r#"
        SELECT m.user_id AS measurement_owner, u.id AS account_id
        FROM measurements m
        JOIN users u ON u.email = $2
        WHERE m.device_id = $1
        "#,
    )
    .bind(&account.device_id)
    .bind(&account.email)
    .fetch_one(&test_app.db_pool)
    .await
    .unwrap();
    let measurement_owner: uuid::Uuid = owner.get("measurement_owner");
    let account_id: uuid::Uuid = owner.get("account_id");
    assert_eq!(measurement_owner, account_id);
}

#[tokio::test]
async fn ingest_rejects_bad_api_key() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    // Wrong key
    let response = client
        .post(format!("{}/ingest/measurement", test_app.address))
        .header("x-api-key", "wrong-key")
        .json(&json!({"deviceId": account.device_id, "heartRate": 70, "spo2": 98}))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    // Missing key
    let response = client
        .post(format!("{}/ingest/measurement", test_app.address))
        .json(&json!({"deviceId": account.device_id, "heartRate": 70, "spo2": 98}))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM measurements")
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn ingest_unregistered_device_is_not_found_and_writes_nothing() {
    let test_app = spawn_app().await;

    register_test_account(&test_app.address).await;

    let response = ingest_reading(&test_app, "GHOST-DEVICE", 70.0, 98.0, None).await;
    assert_eq!(404, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM measurements")
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn ingest_rejects_missing_required_fields() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    for body in [
        json!({"deviceId": account.device_id, "spo2": 98}),
        json!({"deviceId": account.device_id, "heartRate": 70}),
        json!({"heartRate": 70, "spo2": 98}),
    ] {
        let response = client
            .post(format!("{}/ingest/measurement", test_app.address))
            .header("x-api-key", test_app.device_api_key.clone())
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(400, response.status().as_u16(), "payload: {}", body);
    }
}

#[tokio::test]
async fn ingest_stores_implausible_values_unjudged() {
    let test_app = spawn_app().await;

    let account = register_test_account(&test_app.address).await;

    // This subsystem records values, it does not judge them
    let response = ingest_reading(&test_app, &account.device_id, 900.0, 150.0, None).await;
    assert_eq!(201, response.status().as_u16());

    let saved = sqlx::query("SELECT heart_rate FROM measurements WHERE device_id = $1")
        .bind(&account.device_id)
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    let heart_rate: f32 = saved.get("heart_rate");
    assert_eq!(heart_rate, 900.0);
}

#[tokio::test]
async fn session_token_cannot_ingest() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let account = register_test_account(&test_app.address).await;

    // A session credential is not a device credential
    let response = client
        .post(format!("{}/ingest/measurement", test_app.address))
        .header("Authorization", format!("Bearer {}", account.token))
        .json(&json!({"deviceId": account.device_id, "heartRate": 70, "spo2": 98}))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());
}
