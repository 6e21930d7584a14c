use fake::{faker::lorem::en::Sentence, Fake};
use serde_json::{json, Value as JsonValue};

use crate::helpers::{
    count_slides, read_package_part, spawn_app, spawn_app_with, spawn_app_with_language_model,
    spawn_language_model,
};

/// Wraps a model answer the way the responses API does
fn language_model_answer(answer: &JsonValue) -> JsonValue {
    json!({
        "output": [{
            "type": "message",
            "content": [{ "type": "output_text", "text": answer.to_string() }]
        }]
    })
}

fn bullet_slide(title: &str) -> JsonValue {
    json!({
        "layout": "bullet_points",
        "title": title,
        "bullet_points": ["First point", "Second point", "Third point"]
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_returns_a_200_with_the_fallback_content_when_no_model_is_configured() {
    // Arranges
    let app = spawn_app().await;
    let body = json!({ "topic": "Docker", "num_slides": 3 });

    // Acts
    let response = app.post_generate(&body).await;

    // Asserts
    assert_eq!(200, response.status().as_u16());

    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["topic"], "Docker");
    assert_eq!(body["num_slides"], 3);
    assert_eq!(body["citations"], JsonValue::Null);
    assert!(body["generation_time_seconds"].as_f64().unwrap() >= 0.0);

    let slides = body["slides"].as_array().unwrap();
    let layouts: Vec<_> = slides.iter().map(|s| s["layout"].as_str().unwrap()).collect();
    assert_eq!(layouts, vec!["title", "bullet_points", "two_column"]);
    assert_eq!(slides[0]["title"], "Docker");
    assert_eq!(slides[0]["content"], "A comprehensive overview of Docker");
    assert_eq!(slides[1]["bullet_points"].as_array().unwrap().len(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn the_fallback_content_is_deterministic() {
    let app = spawn_app().await;
    let topic: String = Sentence(2..6).fake();
    let body = json!({ "topic": topic, "num_slides": 6 });

    let first: JsonValue = app.post_generate(&body).await.json().await.unwrap();
    let second: JsonValue = app.post_generate(&body).await.json().await.unwrap();

    assert_eq!(first["slides"], second["slides"]);
    assert_ne!(first["presentation_id"], second["presentation_id"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_stores_the_presentation_file() {
    let app = spawn_app().await;

    let response = app
        .post_generate(&json!({ "topic": "Rust ownership" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    // 5 slides by default
    assert_eq!(body["num_slides"], 5);

    let id = body["presentation_id"].as_str().unwrap();
    let file_path = std::path::PathBuf::from(body["file_path"].as_str().unwrap());
    assert!(file_path.ends_with(format!("{}.pptx", id)));
    assert!(app.output_dir.path().join(format!("{}.pptx", id)).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_content_is_used_as_is() {
    let app = spawn_app().await;
    let body = json!({
        "topic": "Quarterly review",
        "num_slides": 12,
        "include_citations": true,
        "custom_content": [
            { "layout": "title", "title": "Quarterly review", "content": "Q3 2024" },
            bullet_slide("Highlights"),
            {
                "layout": "two_column",
                "title": "Before / After",
                "left_column": "Manual deployments",
                "right_column": "Continuous delivery"
            },
            {
                "layout": "content_with_image",
                "title": "Architecture",
                "content": "Services & queues",
                "image_description": "Diagram <of> the services"
            }
        ]
    });

    let response = app.post_generate(&body).await;

    assert_eq!(200, response.status().as_u16());
    let response: JsonValue = response.json().await.unwrap();
    // `num_slides` does not apply to custom content
    assert_eq!(response["num_slides"], 4);
    assert_eq!(response["citations"], JsonValue::Null);
    assert_eq!(response["slides"][0]["title"], "Quarterly review");
    assert_eq!(response["slides"][1]["bullet_points"][2], "Third point");
    assert_eq!(response["slides"][2]["right_column"], "Continuous delivery");
    assert_eq!(
        response["slides"][3]["image_description"],
        "Diagram <of> the services"
    );

    let id = response["presentation_id"].as_str().unwrap();
    let package = app.get_download(id).await.bytes().await.unwrap();
    assert_eq!(count_slides(&package), 4);
    let slide = read_package_part(&package, "ppt/slides/slide4.xml").unwrap();
    assert!(slide.contains("[Image: Diagram &lt;of&gt; the services]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn an_empty_custom_content_is_ignored() {
    let app = spawn_app().await;

    let response = app
        .post_generate(&json!({ "topic": "Docker", "num_slides": 2, "custom_content": [] }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["num_slides"], 2);
    assert_eq!(body["slides"][0]["layout"], "title");
}

#[tokio::test(flavor = "multi_thread")]
async fn a_bullet_points_slide_with_2_bullets_is_rejected() {
    let app = spawn_app().await;
    let body = json!({
        "topic": "Docker",
        "custom_content": [{
            "layout": "bullet_points",
            "title": "Too short",
            "bullet_points": ["One", "Two"]
        }]
    });

    let response = app.post_generate(&body).await;

    assert_eq!(400, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["error"], "ValidationError");
    assert_eq!(body["details"]["field"], "bullet_points");
    assert_eq!(body["details"]["provided"], 2);
    assert_eq!(body["details"]["required"], "3-5");
    assert_eq!(body["details"]["custom_content_index"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_returns_a_400_for_invalid_requests() {
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({}), "topic", "missing topic"),
        (json!({ "topic": "ab" }), "topic", "topic too short"),
        (json!({ "topic": "a".repeat(501) }), "topic", "topic too long"),
        (json!({ "topic": "Docker", "num_slides": 0 }), "num_slides", "no slide"),
        (json!({ "topic": "Docker", "num_slides": 21 }), "num_slides", "too many slides"),
        (
            json!({ "topic": "Docker", "aspect_ratio": "21:9" }),
            "aspect_ratio",
            "unknown aspect ratio",
        ),
        (
            json!({ "topic": "Docker", "theme": { "primary_color": "blue" } }),
            "primary_color",
            "not a hex color",
        ),
        (
            json!({ "topic": "Docker", "custom_content": [{ "layout": "chart", "title": "x" }] }),
            "layout",
            "unknown layout",
        ),
        (
            json!({ "topic": "Docker", "custom_content": [{ "layout": "title", "title": "t".repeat(201) }] }),
            "title",
            "slide title too long",
        ),
    ];

    for (invalid_body, field, error_message) in test_cases {
        let response = app.post_generate(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was: {}",
            error_message
        );
        let body: JsonValue = response.json().await.unwrap();
        assert_eq!(body["error"], "ValidationError", "{}", error_message);
        assert_eq!(body["details"]["field"], field, "{}", error_message);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_returns_a_400_for_a_malformed_json_body() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(&format!("{}/api/v1/generate", &app.address))
        .header("Content-Type", "application/json")
        .body(r#"{"topic": "Docker""#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["error"], "ValidationError");
    assert_eq!(body["details"]["field"], "body");
}

#[tokio::test(flavor = "multi_thread")]
async fn a_wrongly_typed_value_is_reported_with_its_field() {
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({ "topic": "Docker", "num_slides": "five" }), "num_slides", None),
        (json!({ "topic": "Docker", "aspect_ratio": 43 }), "aspect_ratio", None),
        (json!({ "topic": ["Docker"] }), "topic", None),
        (
            json!({ "topic": "Docker", "theme": { "font_size_title": "large" } }),
            "font_size_title",
            None,
        ),
        (
            json!({
                "topic": "Docker",
                "custom_content": [
                    bullet_slide("Fine"),
                    { "layout": "bullet_points", "title": "Broken", "bullet_points": "a, b, c" }
                ]
            }),
            "bullet_points",
            Some(1),
        ),
    ];

    for (invalid_body, field, custom_content_index) in test_cases {
        let response = app.post_generate(&invalid_body).await;

        assert_eq!(400, response.status().as_u16(), "{}", invalid_body);
        let body: JsonValue = response.json().await.unwrap();
        assert_eq!(body["error"], "ValidationError", "{}", invalid_body);
        assert_eq!(body["details"]["field"], field, "{}", invalid_body);
        if let Some(index) = custom_content_index {
            assert_eq!(body["details"]["custom_content_index"], index);
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn the_language_model_content_and_citations_are_used() {
    // Arranges
    let answer = json!({
        "slides": [
            { "layout": "title", "title": "Kubernetes", "content": "Orchestrating containers" },
            bullet_slide("Core objects"),
        ],
        "citations": [
            { "source": "kubernetes.io", "title": "Concepts", "date": "2024" },
            { "source": "CNCF annual survey" }
        ]
    });
    let model = spawn_language_model(200, language_model_answer(&answer)).await;
    let app = spawn_app_with_language_model(&model).await;

    // Acts
    let response = app
        .post_generate(&json!({
            "topic": "Kubernetes",
            "num_slides": 2,
            "include_citations": true
        }))
        .await;

    // Asserts
    assert_eq!(200, response.status().as_u16());
    assert_eq!(model.received_requests(), 1);
    let request = model.last_request().unwrap();
    assert!(request["input"].as_str().unwrap().contains("Kubernetes"));

    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["num_slides"], 2);
    assert_eq!(body["slides"][1]["title"], "Core objects");
    assert_eq!(body["citations"][0]["source"], "kubernetes.io");
    assert_eq!(body["citations"][1]["title"], JsonValue::Null);

    // The references slide follows the content slides
    let id = body["presentation_id"].as_str().unwrap();
    let package = app.get_download(id).await.bytes().await.unwrap();
    assert_eq!(count_slides(&package), 3);
    let references = read_package_part(&package, "ppt/slides/slide3.xml").unwrap();
    assert!(references.contains("References"));
    assert!(references.contains("kubernetes.io - Concepts (2024)"));
    assert!(references.contains("CNCF annual survey"));
}

#[tokio::test(flavor = "multi_thread")]
async fn citations_are_dropped_when_not_requested() {
    let answer = json!({
        "slides": [{ "layout": "title", "title": "Kubernetes" }],
        "citations": [{ "source": "kubernetes.io" }]
    });
    let model = spawn_language_model(200, language_model_answer(&answer)).await;
    let app = spawn_app_with_language_model(&model).await;

    let response = app
        .post_generate(&json!({ "topic": "Kubernetes", "num_slides": 1 }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body["citations"], JsonValue::Null);

    let id = body["presentation_id"].as_str().unwrap();
    let package = app.get_download(id).await.bytes().await.unwrap();
    assert_eq!(count_slides(&package), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn a_failing_language_model_falls_back_to_the_template_content() {
    let test_cases = vec![
        (500, json!({ "error": "internal" }), "server error"),
        (200, json!({ "unexpected": true }), "no answer text"),
        (
            200,
            language_model_answer(&json!({ "slides": [bullet_slide("Only one")] })),
            "not enough slides",
        ),
        (
            200,
            language_model_answer(&json!({
                "slides": [
                    { "layout": "bullet_points", "title": "Bad", "bullet_points": ["a"] },
                    bullet_slide("Fine")
                ]
            })),
            "invalid slide",
        ),
    ];

    for (status, answer, description) in test_cases {
        let model = spawn_language_model(status, answer).await;
        let app = spawn_app_with_language_model(&model).await;

        let response = app
            .post_generate(&json!({ "topic": "Docker", "num_slides": 2, "include_citations": true }))
            .await;

        assert_eq!(200, response.status().as_u16(), "{}", description);
        assert_eq!(model.received_requests(), 1, "{}", description);
        let body: JsonValue = response.json().await.unwrap();
        assert_eq!(body["slides"][0]["title"], "Docker", "{}", description);
        assert_eq!(
            body["slides"][0]["content"], "A comprehensive overview of Docker",
            "{}",
            description
        );
        assert_eq!(body["citations"], JsonValue::Null, "{}", description);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_content_does_not_call_the_language_model() {
    let model = spawn_language_model(200, json!({})).await;
    let app = spawn_app_with_language_model(&model).await;

    let response = app
        .post_generate(&json!({ "topic": "Docker", "custom_content": [bullet_slide("Mine")] }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(model.received_requests(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn the_theme_and_aspect_ratio_are_applied() {
    let app = spawn_app().await;
    let body = json!({
        "topic": "Docker",
        "num_slides": 2,
        "aspect_ratio": "4:3",
        "theme": {
            "primary_color": "#FF0000",
            "secondary_color": "#00ff00",
            "font_name": "Arial",
            "font_size_title": 40
        }
    });

    let id = app.generate(&body).await;
    let package = app.get_download(&id).await.bytes().await.unwrap();

    let presentation = read_package_part(&package, "ppt/presentation.xml").unwrap();
    assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));
    let title_slide = read_package_part(&package, "ppt/slides/slide1.xml").unwrap();
    assert!(title_slide.contains("FF0000"));
    assert!(title_slide.contains("00FF00"));
    assert!(title_slide.contains(r#"typeface="Arial""#));
    assert!(title_slide.contains(r#"sz="4000""#));
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_is_rate_limited_per_client() {
    // Arranges
    let app = spawn_app_with(|c| c.rate_limits.generate_per_minute = 2).await;
    let body = json!({ "topic": "Docker", "num_slides": 1 });

    // Acts
    let first = app.post_generate(&body).await;
    let second = app.post_generate(&body).await;
    let third = app.post_generate(&body).await;

    // Asserts
    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());
    assert_eq!(429, third.status().as_u16());

    let retry_after: u64 = third
        .headers()
        .get("Retry-After")
        .expect("Missing Retry-After header")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let body: JsonValue = third.json().await.unwrap();
    assert_eq!(body["error"], "RateLimitExceeded");
    assert_eq!(body["details"]["retry_after"], retry_after);

    // Other routes have their own budget
    let download = app.get_download(&uuid::Uuid::new_v4().to_string()).await;
    assert_eq!(404, download.status().as_u16());
}
