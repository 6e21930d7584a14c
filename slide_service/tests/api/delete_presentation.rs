use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::helpers::{spawn_app, spawn_app_with};

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_presentation() {
    // Arranges
    let app = spawn_app().await;
    let id = app.generate(&json!({ "topic": "Docker" })).await;
    let file_path = app.output_dir.path().join(format!("{}.pptx", id));
    assert!(file_path.exists());

    // Acts
    let response = app.delete_presentation(&id).await;

    // Asserts
    assert_eq!(200, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["message"], "Presentation deleted successfully");
    assert_eq!(body["presentation_id"], id);

    assert!(!file_path.exists());
    assert_eq!(404, app.get_download(&id).await.status().as_u16());
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_twice_returns_a_404() {
    let app = spawn_app().await;
    let id = app.generate(&json!({ "topic": "Docker" })).await;

    let first = app.delete_presentation(&id).await;
    let second = app.delete_presentation(&id).await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(404, second.status().as_u16());
    let body: JsonValue = second.json().await.unwrap();
    assert_eq!(body["error"], "NotFound");
    assert_eq!(body["details"]["presentation_id"], id);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_returns_a_404_for_an_unknown_presentation() {
    let app = spawn_app().await;

    for presentation_id in [Uuid::new_v4().to_string(), "nope".to_string()] {
        let response = app.delete_presentation(&presentation_id).await;

        assert_eq!(404, response.status().as_u16());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_one_presentation_keeps_the_others() {
    let app = spawn_app().await;
    let kept = app.generate(&json!({ "topic": "Kept" })).await;
    let deleted = app.generate(&json!({ "topic": "Deleted" })).await;

    let response = app.delete_presentation(&deleted).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(200, app.get_download(&kept).await.status().as_u16());
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_is_rate_limited() {
    let app = spawn_app_with(|c| c.rate_limits.delete_per_minute = 1).await;

    let first = app.delete_presentation(&Uuid::new_v4().to_string()).await;
    let second = app.delete_presentation(&Uuid::new_v4().to_string()).await;

    assert_eq!(404, first.status().as_u16());
    assert_eq!(429, second.status().as_u16());
}

#[tokio::test(flavor = "multi_thread")]
async fn stored_presentations_survive_a_restart() {
    let first_app = spawn_app().await;
    let id = first_app.generate(&json!({ "topic": "Docker" })).await;

    // A second instance sharing the same output directory
    let output_dir = first_app.output_dir.path().to_path_buf();
    let second_app = spawn_app_with(move |c| c.storage.output_dir = output_dir).await;

    assert_eq!(200, second_app.get_download(&id).await.status().as_u16());
    assert_eq!(200, second_app.delete_presentation(&id).await.status().as_u16());
}
