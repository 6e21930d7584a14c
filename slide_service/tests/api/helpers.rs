use std::{
    io::{Cursor, Read},
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use actix_web::{web, App, HttpResponse, HttpServer};
use common::telemetry::{get_tracing_subscriber, init_tracing_subscriber};
use once_cell::sync::Lazy;
use secrecy::Secret;
use serde_json::Value as JsonValue;
use slide_service::{
    configuration::{get_configuration, Settings},
    startup::Application,
};
use tempfile::TempDir;

// Ensures that the `tracing` stack is only initialized once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // We cannot assign the output of `get_tracing_subscriber` to a variable based on the value of `TEST_LOG`
    // because the sink is part of the type returned by `get_tracing_subscriber`, therefore they are not the
    // same type.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_tracing_subscriber(subscriber).expect("Failed to init tracing");
    } else {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_tracing_subscriber(subscriber).expect("Failed to init tracing");
    };
});

pub struct TestApp {
    pub address: String,
    /// Where the application stores presentations, removed when the test ends
    pub output_dir: TempDir,
    pub api_client: reqwest::Client,
}

/// A test API client / test suite
impl TestApp {
    pub async fn post_generate(&self, body: &JsonValue) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/v1/generate", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Generates a presentation and returns its id
    pub async fn generate(&self, body: &JsonValue) -> String {
        let response = self.post_generate(body).await;
        assert_eq!(200, response.status().as_u16());

        let body: JsonValue = response.json().await.unwrap();
        body["presentation_id"].as_str().unwrap().to_string()
    }

    pub async fn get_download(&self, presentation_id: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/api/v1/download/{}", &self.address, presentation_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_presentation(&self, presentation_id: &str) -> reqwest::Response {
        self.api_client
            .delete(&format!(
                "{}/api/v1/presentations/{}",
                &self.address, presentation_id
            ))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Spawns the application with its content generator disabled
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawns the application in the background, on a random port and with its own output directory
///
/// `customize` can change the settings before the application is built.
/// When a tokio runtime is shut down all tasks spawned on it are dropped: the application
/// stops with the test.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let output_dir = tempfile::tempdir().expect("Failed to create the output directory");

    // Randomizes configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Port 0 lets the OS pick a free port
        c.application.port = 0;
        c.application.host = "127.0.0.1".to_string();
        c.storage.output_dir = output_dir.path().to_path_buf();
        // Never call a real model from tests
        c.content_generator.api_key = Secret::new(String::new());
        customize(&mut c);
        c
    };

    let application = Application::build(configuration, Some(1))
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        output_dir,
        api_client: reqwest::Client::new(),
    }
}

/// Stand-in for the language model HTTP API, answering every request the same way
pub struct MockLanguageModel {
    pub url: String,
    received_requests: Arc<AtomicUsize>,
    last_request: Arc<std::sync::Mutex<Option<JsonValue>>>,
}

impl MockLanguageModel {
    pub fn received_requests(&self) -> usize {
        self.received_requests.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<JsonValue> {
        self.last_request.lock().unwrap().clone()
    }
}

struct MockAnswer {
    status: u16,
    body: JsonValue,
    received_requests: Arc<AtomicUsize>,
    last_request: Arc<std::sync::Mutex<Option<JsonValue>>>,
}

async fn answer(answer: web::Data<MockAnswer>, request: web::Json<JsonValue>) -> HttpResponse {
    answer.received_requests.fetch_add(1, Ordering::SeqCst);
    *answer.last_request.lock().unwrap() = Some(request.into_inner());

    HttpResponse::build(actix_web::http::StatusCode::from_u16(answer.status).unwrap())
        .json(&answer.body)
}

pub async fn spawn_language_model(status: u16, body: JsonValue) -> MockLanguageModel {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind a random port");
    let port = listener.local_addr().unwrap().port();

    let received_requests = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(std::sync::Mutex::new(None));
    let mock_answer = web::Data::new(MockAnswer {
        status,
        body,
        received_requests: received_requests.clone(),
        last_request: last_request.clone(),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(mock_answer.clone())
            .route("/v1/responses", web::post().to(answer))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let _ = tokio::spawn(server);

    MockLanguageModel {
        url: format!("http://127.0.0.1:{}/v1/responses", port),
        received_requests,
        last_request,
    }
}

/// Points the application to a mocked language model
pub async fn spawn_app_with_language_model(model: &MockLanguageModel) -> TestApp {
    let url = model.url.clone();
    spawn_app_with(move |c| {
        c.content_generator.api_url = url;
        c.content_generator.api_key = Secret::new("sk-test".to_string());
        c.content_generator.timeout_seconds = 5;
    })
    .await
}

/// Reads one part of a `.pptx` package
pub fn read_package_part(package: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).expect("Not a zip archive");
    let mut part = archive.by_name(name).ok()?;
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    Some(xml)
}

pub fn count_slides(package: &[u8]) -> usize {
    let archive = zip::ZipArchive::new(Cursor::new(package)).expect("Not a zip archive");
    archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .count()
}
