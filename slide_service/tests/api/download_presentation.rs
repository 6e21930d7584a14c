use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::helpers::{count_slides, read_package_part, spawn_app, spawn_app_with};

#[tokio::test(flavor = "multi_thread")]
async fn download_returns_the_generated_pptx() {
    // Arranges
    let app = spawn_app().await;
    let id = app
        .generate(&json!({ "topic": "Docker", "num_slides": 4 }))
        .await;

    // Acts
    let response = app.get_download(&id).await;

    // Asserts
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.headers()["Content-Type"],
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    );
    let disposition = response.headers()["Content-Disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(&format!("presentation_{}.pptx", id)));

    let package = response.bytes().await.unwrap();
    assert_eq!(count_slides(&package), 4);
    assert!(read_package_part(&package, "[Content_Types].xml").is_some());
    let title_slide = read_package_part(&package, "ppt/slides/slide1.xml").unwrap();
    assert!(title_slide.contains("Docker"));
}

#[tokio::test(flavor = "multi_thread")]
async fn downloading_twice_gives_the_same_file() {
    let app = spawn_app().await;
    let id = app.generate(&json!({ "topic": "Docker" })).await;

    let first = app.get_download(&id).await.bytes().await.unwrap();
    let second = app.get_download(&id).await.bytes().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn download_returns_a_404_for_an_unknown_presentation() {
    let app = spawn_app().await;
    let test_cases = vec![
        (Uuid::new_v4().to_string(), "unknown id"),
        ("not-a-uuid".to_string(), "malformed id"),
    ];

    for (presentation_id, description) in test_cases {
        let response = app.get_download(&presentation_id).await;

        assert_eq!(404, response.status().as_u16(), "{}", description);
        let body: JsonValue = response.json().await.unwrap();
        assert_eq!(body["error"], "NotFound", "{}", description);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn a_presentation_missing_on_disk_is_not_found() {
    let app = spawn_app().await;
    let id = app.generate(&json!({ "topic": "Docker" })).await;
    std::fs::remove_file(app.output_dir.path().join(format!("{}.pptx", id))).unwrap();

    let response = app.get_download(&id).await;

    assert_eq!(404, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["details"]["presentation_id"], id);
}

#[tokio::test(flavor = "multi_thread")]
async fn download_is_rate_limited() {
    let app = spawn_app_with(|c| c.rate_limits.download_per_minute = 1).await;
    let id = Uuid::new_v4().to_string();

    let first = app.get_download(&id).await;
    let second = app.get_download(&id).await;

    assert_eq!(404, first.status().as_u16());
    assert_eq!(429, second.status().as_u16());
    assert!(second.headers().contains_key("Retry-After"));
}
