//! CORS policy

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Any origin may post to the API; preflights are answered by the layer.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
