//! Cross-origin resource sharing policy.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer from the configured origin list.
///
/// An empty list or a `*` entry allows any origin. Credentials are never
/// allowed. Entries that are not valid header values are skipped.
pub fn layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    base.allow_origin(allow_origin(allowed_origins))
}

fn allow_origin(allowed_origins: &[String]) -> AllowOrigin {
    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}
