use crate::helpers::spawn_app;
use serde_json::Value as JsonValue;

#[tokio::test(flavor = "multi_thread")]
async fn health_check_works() {
    // Arranges
    let app = spawn_app().await;

    // Acts
    let response = app
        .api_client
        .get(&format!("{}/health", &app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Asserts
    assert!(response.status().is_success());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "1.0.0");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn the_root_path_is_a_health_check_too() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(&format!("{}/", &app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test(flavor = "multi_thread")]
async fn health_check_is_not_rate_limited() {
    let app = spawn_app().await;

    for _ in 0..40 {
        let response = app
            .api_client
            .get(&format!("{}/health", &app.address))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(200, response.status().as_u16());
    }
}
