//! Landing page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Template for the landing page.
///
/// Renders `templates/home.html` with the list of public endpoints.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub version: &'static str,
}

/// Renders the landing page.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler() -> impl IntoResponse {
    HomeTemplate {
        version: env!("CARGO_PKG_VERSION"),
    }
}
