use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use uuid::Uuid;

use vitalsync_backend::config::settings::{
    get_config, get_device_settings, get_jwt_settings, DatabaseSettings,
};
use vitalsync_backend::run;
use vitalsync_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub device_api_key: String,
}

pub struct TestAccount {
    pub token: String,
    pub email: String,
    pub device_id: String,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    // One throwaway database per test
    configuration.database.db_name = Uuid::new_v4().to_string();
    let connection_pool = configure_db(&configuration.database).await;

    let jwt_settings = get_jwt_settings(&configuration);
    let device_settings = get_device_settings(&configuration);
    let device_api_key = configuration.device.api_key.expose_secret().to_string();

    let server = run(listener, connection_pool.clone(), jwt_settings, device_settings)
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        device_api_key,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Register a fresh account (with its initial device) and hand back the
/// session token.
pub async fn register_test_account(app_address: &str) -> TestAccount {
    let client = Client::new();
    let email = format!("user{}@example.com", Uuid::new_v4().simple());
    let device_id = format!("DEV{}", Uuid::new_v4().simple());
    let password = "password123";

    let response = client
        .post(format!("{}/register_user", app_address))
        .json(&json!({
            "email": email,
            "password": password,
            "deviceId": device_id
        }))
        .send()
        .await
        .expect("Failed to register account.");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response.");
    let token = body["token"]
        .as_str()
        .expect("Registration response carries a token")
        .to_string();

    TestAccount {
        token,
        email,
        device_id,
    }
}

pub async fn make_authenticated_request(
    client: &Client,
    method: reqwest::Method,
    url: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> reqwest::Response {
    let mut request = client
        .request(method, url)
        .header("Authorization", format!("Bearer {}", token));
    if let Some(body) = body {
        request = request.json(&body);
    }
    request.send().await.expect("Failed to execute request.")
}

/// Post one reading through the device ingestion endpoint.
pub async fn ingest_reading(
    app: &TestApp,
    device_id: &str,
    heart_rate: f64,
    spo2: f64,
    timestamp: Option<&str>,
) -> reqwest::Response {
    let client = Client::new();
    let mut payload = json!({
        "deviceId": device_id,
        "heartRate": heart_rate,
        "spo2": spo2
    });
    if let Some(ts) = timestamp {
        payload["timestamp"] = json!(ts);
    }
    client
        .post(format!("{}/ingest/measurement", app.address))
        .header("x-api-key", app.device_api_key.clone())
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request.")
}
