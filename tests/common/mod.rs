#![allow(dead_code)]

use axum_test::TestServer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::mpsc;

use qr_shortener::application::services::ShortenerService;
use qr_shortener::domain::click_event::{ClickEvent, ClickRecorder};
use qr_shortener::infrastructure::cache::MemoryCache;
use qr_shortener::infrastructure::persistence::MemoryUrlRepository;
use qr_shortener::routes::router;
use qr_shortener::state::AppState;
use qr_shortener::utils::code_generator::{CodeGenerator, RetryPolicy};

pub const BASE_URL: &str = "https://sho.rt";

/// Everything a handler test needs to drive and inspect the service.
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<MemoryUrlRepository>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_state(
    base_url: Option<&str>,
    click_capacity: usize,
) -> (AppState, Arc<MemoryUrlRepository>, mpsc::Receiver<ClickEvent>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let (recorder, rx) = ClickRecorder::channel(click_capacity);

    let generator = CodeGenerator::with_rng(StdRng::seed_from_u64(42), RetryPolicy::default());
    let service = ShortenerService::new(
        repository.clone(),
        Arc::new(MemoryCache::new()),
        generator,
        recorder,
    );

    let state = AppState::new(Arc::new(service), base_url.map(str::to_string));

    (state, repository, rx)
}

pub fn test_app() -> TestApp {
    test_app_with(Some(BASE_URL), 100)
}

pub fn test_app_with(base_url: Option<&str>, click_capacity: usize) -> TestApp {
    let (state, repository, clicks) = create_test_state(base_url, click_capacity);
    let server = TestServer::new(router(state, &[])).unwrap();

    TestApp {
        server,
        repository,
        clicks,
    }
}

/// Creates a short link through the API and returns its code.
pub async fn create_link(server: &TestServer, url: &str) -> String {
    let response = server
        .post("/api/v1/urls")
        .json(&serde_json::json!({ "original_url": url }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Decodes a `data:image/png;base64,` URL and returns the image dimensions.
pub fn png_dimensions(data_url: &str) -> (u32, u32) {
    use base64::Engine;
    use image::GenericImageView;

    let encoded = data_url
        .strip_prefix("data:image/png;base64,")
        .expect("not a PNG data URL");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();

    image::load_from_memory(&bytes).unwrap().dimensions()
}
