//! Cross-origin policy for the browser frontend.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use crate::{Error, Result};

/// Build a CORS layer admitting a single origin, or any origin for `*`.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let origin = origin.trim();
    if origin == "*" {
        tracing::warn!("CORS allows any origin");
        return Ok(layer.allow_origin(Any));
    }

    let value = HeaderValue::from_str(origin)
        .map_err(|_| Error::config(format!("invalid CORS origin '{origin}'")))?;
    tracing::debug!(origin, "CORS origin configured");
    Ok(layer.allow_origin(value))
}
